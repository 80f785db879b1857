use super::{print_instance, print_json};
use crate::pool::Pool;
use colored::Colorize;

pub async fn handle_claim(pool: &Pool, recipe: &str, json: bool) -> anyhow::Result<bool> {
    let Some(instance) = pool.allocator.claim_free_instance(recipe).await? else {
        if json {
            println!("null");
        } else {
            println!("{} {}", "No free instance of recipe".yellow(), recipe.cyan());
        }
        return Ok(false);
    };

    if json {
        print_json(&instance)?;
    } else {
        println!("{}", "✓ Claimed instance:".green().bold());
        print_instance(
            &instance.id,
            &instance.name,
            &instance.connection_address,
            instance.state,
            &instance.recipe.name,
            &instance.recipe.id,
        );
    }
    Ok(true)
}

pub async fn handle_release(pool: &Pool, id: &str) -> anyhow::Result<bool> {
    if pool.allocator.release(id).await? {
        println!("{} {}", "✓ Released".green(), id.cyan());
        Ok(true)
    } else {
        println!("{} {}", "Not claimed:".yellow(), id.cyan());
        Ok(false)
    }
}
