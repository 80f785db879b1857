use super::{print_instance, print_json};
use crate::pool::Pool;
use colored::Colorize;

pub async fn handle_find(pool: &Pool, recipe: &str, json: bool) -> anyhow::Result<bool> {
    let found = pool.lookup.find_free_instance(recipe).await?;

    match found {
        Some(instance) if json => {
            print_json(&instance)?;
            Ok(true)
        }
        Some(instance) => {
            println!("{}", "Free instance:".green().bold());
            print_instance(
                &instance.id,
                &instance.name,
                &instance.connection_address,
                instance.state,
                &instance.recipe.name,
                &instance.recipe.id,
            );
            Ok(true)
        }
        None if json => {
            println!("null");
            Ok(false)
        }
        None => {
            println!("{} {}", "No free instance of recipe".yellow(), recipe.cyan());
            Ok(false)
        }
    }
}

pub async fn handle_get(pool: &Pool, id: &str, json: bool) -> anyhow::Result<bool> {
    let found = pool.lookup.get_instance(id).await?;

    match found {
        Some(instance) if json => {
            print_json(&instance)?;
            Ok(true)
        }
        Some(instance) => {
            print_instance(
                &instance.id,
                &instance.name,
                &instance.connection_address,
                instance.state,
                &instance.recipe.name,
                &instance.recipe.id,
            );
            Ok(true)
        }
        None if json => {
            println!("null");
            Ok(false)
        }
        None => {
            println!("{} {}", "Instance not found:".yellow(), id.cyan());
            Ok(false)
        }
    }
}
