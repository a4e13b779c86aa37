//! Config command handlers

use crate::config::Config;
use crate::ConfigAction;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

pub fn handle(action: ConfigAction, config_path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Init { path } => {
            let target = path.as_deref().or(config_path);
            let config_path = Config::init(target)?;

            println!(
                "{} Configuration initialized at: {}",
                "✓".green().bold(),
                config_path.display().to_string().cyan()
            );
            Ok(())
        }

        ConfigAction::Show => {
            let config_path = target_path(config_path)?;

            if !config_path.exists() {
                println!(
                    "{} No configuration file found. Run 'keysmith config init' first.",
                    "✗".red().bold()
                );
                return Ok(());
            }

            let config = Config::load(&config_path)?;

            println!("{}", "Configuration:".bold());
            println!("  Seed File:   {}", config.seed_file.display().to_string().cyan());
            println!("  Output File: {}", config.output_file.cyan());
            println!("  Xprv File:   {}", config.xprv_file.cyan());
            println!("  Index:       {}", config.index.to_string().cyan());
            println!();
            println!("Config file: {}", config_path.display().to_string().dimmed());

            Ok(())
        }

        ConfigAction::Set { key, value } => {
            let config_path = target_path(config_path)?;

            if !config_path.exists() {
                Config::init(Some(&config_path))?;
            }

            let mut config = Config::load(&config_path)?;
            if !apply(&mut config, &key, &value)? {
                println!("{} Unknown config key: {}", "✗".red().bold(), key.red());
                println!("Available keys: seed_file, output_file, xprv_file, index");
                return Ok(());
            }
            println!("{} Set {} = {}", "✓".green().bold(), key, value.cyan());

            config.save(&config_path)
        }
    }
}

fn target_path(config_path: Option<&Path>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::default_path(),
    }
}

/// Set `key` on `config`. Returns false for an unknown key.
fn apply(config: &mut Config, key: &str, value: &str) -> Result<bool> {
    match key {
        "seed_file" => config.seed_file = PathBuf::from(value),
        "output_file" => config.output_file = value.to_string(),
        "xprv_file" => config.xprv_file = value.to_string(),
        "index" => {
            config.index = value
                .parse()
                .with_context(|| format!("Invalid index: {}", value))?
        }
        _ => return Ok(false),
    }
    Ok(true)
}
