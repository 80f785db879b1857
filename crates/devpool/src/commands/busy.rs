use super::print_json;
use crate::pool::Pool;
use colored::Colorize;
use devpool_core::BusyRegistry;

pub async fn handle(pool: &Pool, json: bool) -> anyhow::Result<bool> {
    let devices = pool.registry.list_busy_devices().await?;

    if json {
        print_json(&devices)?;
        return Ok(true);
    }

    println!("Registry: {}", pool.registry.path().display().to_string().dimmed());
    if devices.is_empty() {
        println!("{}", "No busy devices".dimmed());
        return Ok(true);
    }

    println!("{}", format!("{:<40} {:<30}", "UUID", "ADB").bold());
    println!("{}", "─".repeat(70).dimmed());
    for device in &devices {
        println!("{:<40} {:<30}", device.id.cyan(), device.connection_address);
    }
    Ok(true)
}
