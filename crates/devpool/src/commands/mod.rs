pub mod busy;
pub mod claim;
pub mod lookup;

use colored::Colorize;
use devpool_core::InstanceState;

/// Print one instance as `key: value` lines
pub(crate) fn print_instance(
    id: &str,
    name: &str,
    address: &str,
    state: InstanceState,
    recipe_name: &str,
    recipe_id: &str,
) {
    let state_colored = match state {
        InstanceState::Online => state.to_string().green(),
        InstanceState::Error | InstanceState::Deleted | InstanceState::Recycled => {
            state.to_string().red()
        }
        _ => state.to_string().yellow(),
    };
    let address = if devpool_core::is_disconnected(address) {
        "(not connected)".dimmed()
    } else {
        address.normal()
    };

    println!("  {:<8} {}", "uuid:".bold(), id.cyan());
    println!("  {:<8} {}", "name:".bold(), name);
    println!("  {:<8} {}", "state:".bold(), state_colored);
    println!("  {:<8} {}", "adb:".bold(), address);
    println!("  {:<8} {} ({})", "recipe:".bold(), recipe_name, recipe_id.dimmed());
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
