use std::path::Path;

use colored::Colorize;
use promptloom_config::{Config, ConfigManager};

use crate::render;
use crate::ConfigCommands;

pub async fn run(command: ConfigCommands, config_path: &Path) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Get { key } => {
            let manager = ConfigManager::load(config_path).await?;
            match manager.get_value(&key).await {
                Some(value) => println!("{}", format!("{} = {}", key, value).green()),
                None => {
                    render::failure(format!("Key not found: {}", key));
                    std::process::exit(1);
                }
            }
        }
        ConfigCommands::Set { key, value } => {
            let manager = ConfigManager::load(config_path).await?;
            if let Err(e) = manager.set_value(&key, &value).await {
                render::failure(format!("Failed to set value: {}", e));
                std::process::exit(1);
            }
            render::success(format!("Set {} = {}", key, value));
        }
        ConfigCommands::Init { force } => {
            if config_path.exists() && !force {
                println!(
                    "{}",
                    format!("⚠️  Config already exists at {:?}", config_path).yellow()
                );
                println!("{}", "Use --force to overwrite".dimmed());
                return Ok(());
            }

            let manager = ConfigManager::new(Config::default(), config_path.to_path_buf());
            manager.save().await?;
            render::success(format!("Config initialized at {:?}", config_path));
        }
        ConfigCommands::Show => {
            let manager = ConfigManager::load(config_path).await?;
            let config = manager.snapshot().await;

            println!("{}", "📋 Current Configuration:".cyan().bold());
            println!();
            for (key, value) in config.entries() {
                println!("{} = {}", key.bold(), value);
            }
        }
    }

    Ok(())
}
