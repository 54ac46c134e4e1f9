//! Config command - inspect and edit the per-user configuration file.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value as Json;

use grantprep_core::models::config::GrantConfig;

use super::default_config_path;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a configuration file with the defaults
    Init {
        /// Output path (default: the per-user file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one value, addressed by a dotted key
    Get {
        /// Dotted key (e.g., "features.max_features")
        key: String,
    },

    /// Change one existing value, addressed by a dotted key
    Set {
        /// Dotted key (e.g., "text.extra_stopwords")
        key: String,
        /// New value, as JSON; bare words are taken as strings
        value: String,
    },

    /// Show the per-user configuration file path
    Path,
}

pub async fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = user_config()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommand::Init { output, force } => {
            let path = output.unwrap_or_else(default_config_path);
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            GrantConfig::default().save(&path)?;
            println!(
                "{} Created configuration file at {}",
                style("✓").green(),
                path.display()
            );
        }
        ConfigCommand::Get { key } => {
            let json = serde_json::to_value(user_config()?)?;
            println!("{}", serde_json::to_string_pretty(lookup(&json, &key)?)?);
        }
        ConfigCommand::Set { key, value } => {
            let value = parse_value(&value);
            let mut json = serde_json::to_value(user_config()?)?;
            assign(&mut json, &key, value.clone())?;

            let config: GrantConfig = serde_json::from_value(json)
                .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;
            config.validate()?;

            let path = default_config_path();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            config.save(&path)?;
            println!("{} Set {} = {}", style("✓").green(), key, value);
        }
        ConfigCommand::Path => {
            let path = default_config_path();
            println!("Configuration file: {}", path.display());
            if path.exists() {
                println!("Status: {}", style("exists").green());
            } else {
                println!("Status: {}", style("not created").yellow());
                println!();
                println!("Run 'grantprep config init' to create it.");
            }
        }
    }
    Ok(())
}

/// The per-user file, or the defaults when it does not exist.
fn user_config() -> anyhow::Result<GrantConfig> {
    let path = default_config_path();
    if path.exists() {
        Ok(GrantConfig::from_file(&path)?)
    } else {
        eprintln!(
            "{} No config file found, using defaults.",
            style("ℹ").blue()
        );
        Ok(GrantConfig::default())
    }
}

fn parse_value(raw: &str) -> Json {
    serde_json::from_str(raw).unwrap_or_else(|_| Json::String(raw.to_string()))
}

fn lookup<'a>(json: &'a Json, key: &str) -> anyhow::Result<&'a Json> {
    key.split('.').try_fold(json, |node, part| {
        node.get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))
    })
}

/// Replace the value at `key`. Only existing keys can be set, so typos fail
/// instead of being silently dropped on deserialization.
fn assign(json: &mut Json, key: &str, value: Json) -> anyhow::Result<()> {
    let slot = key.split('.').try_fold(json, |node, part| {
        node.get_mut(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))
    })?;
    *slot = value;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested_key() {
        let json = serde_json::to_value(GrantConfig::default()).unwrap();
        assert_eq!(lookup(&json, "features.max_features").unwrap(), &json!(5000));
        assert!(lookup(&json, "features.nope").is_err());
    }

    #[test]
    fn test_assign_existing_key_only() {
        let mut json = serde_json::to_value(GrantConfig::default()).unwrap();
        assign(&mut json, "extraction.min_text_length", json!(10)).unwrap();
        assert!(assign(&mut json, "extraction.min_length", json!(10)).is_err());

        let config: GrantConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.extraction.min_text_length, 10);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("12"), json!(12));
        assert_eq!(parse_value("[\"grant\"]"), json!(["grant"]));
        assert_eq!(parse_value("zero"), json!("zero"));
    }
}
