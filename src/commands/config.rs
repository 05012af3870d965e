use colored::*;
use eyre::Result;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
        ConfigAction::Get { key } => get(&key, config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "Reporter Configuration".bold());
            println!();
            match config.endpoint() {
                Some(endpoint) => println!("  endpoint: {}", endpoint.cyan()),
                None => println!("  endpoint: {} (reporting disabled)", "unset".yellow()),
            }
            println!("  tag: {}", config.tag);
            println!("  log_level: {}", config.log_level.as_filter());
            println!("  log_dir: {}", Config::log_dir().display());
        }
    }

    Ok(())
}

fn lookup(key: &str, config: &Config) -> Option<String> {
    match key {
        "endpoint" => Some(config.endpoint().unwrap_or_default().to_string()),
        "tag" => Some(config.tag.clone()),
        "log_level" | "log-level" => Some(config.log_level.as_filter().to_string()),
        _ => None,
    }
}

fn get(key: &str, config: &Config) -> Result<()> {
    match lookup(key, config) {
        Some(v) => println!("{}", v),
        None => eyre::bail!("Unknown config key: {}", key),
    }

    Ok(())
}
