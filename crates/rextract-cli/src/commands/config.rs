//! Config command - inspect and edit the pipeline configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;
use tracing::debug;

use rextract_core::RextractConfig;

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

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one value (e.g., "sanitizer.normalize_quotes")
    Get {
        /// Dotted key path
        key: String,
    },

    /// Change one value (e.g., "projection.lenient_numbers false")
    Set {
        /// Dotted key path
        key: String,
        /// New value, as JSON or a bare string
        value: String,
    },

    /// Show the configuration file path
    Path,
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rextract")
        .join("config.json")
}

/// Load the config named by `--config`, else the default file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<RextractConfig> {
    if let Some(path) = config_path {
        return RextractConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path));
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        return RextractConfig::from_file(&default_path)
            .with_context(|| format!("Failed to load config from {}", default_path.display()));
    }

    Ok(RextractConfig::default())
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => show(&path),
        ConfigCommand::Init { force } => init(&path, force),
        ConfigCommand::Get { key } => get(&path, &key),
        ConfigCommand::Set { key, value } => set(&path, &key, &value),
        ConfigCommand::Path => show_path(&path),
    }
}

fn read_or_default(path: &Path) -> anyhow::Result<RextractConfig> {
    if path.exists() {
        Ok(RextractConfig::from_file(path)?)
    } else {
        Ok(RextractConfig::default())
    }
}

fn show(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        eprintln!(
            "{} No config file at {}, showing defaults.",
            style("ℹ").blue(),
            path.display()
        );
    }

    let config = read_or_default(path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    RextractConfig::default().save(path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        path.display()
    );

    Ok(())
}

fn get(path: &Path, key: &str) -> anyhow::Result<()> {
    let json = serde_json::to_value(read_or_default(path)?)?;
    let value = lookup(&json, key)?;

    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

fn set(path: &Path, key: &str, raw_value: &str) -> anyhow::Result<()> {
    let new_value: Value = serde_json::from_str(raw_value)
        .unwrap_or_else(|_| Value::String(raw_value.to_string()));

    let mut json = serde_json::to_value(read_or_default(path)?)?;
    assign(&mut json, key, new_value.clone())?;

    let config: RextractConfig = serde_json::from_value(json)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&new_value)?
    );

    Ok(())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'rextract config init' to create a configuration file.");
    }

    Ok(())
}

/// Follow a dotted key path through a JSON object.
fn lookup<'a>(json: &'a Value, key: &str) -> anyhow::Result<&'a Value> {
    key.split('.').try_fold(json, |current, part| {
        current
            .get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))
    })
}

/// Replace the value at an existing dotted key path, keeping its JSON type.
fn assign(json: &mut Value, key: &str, new_value: Value) -> anyhow::Result<()> {
    let slot = key.split('.').try_fold(json, |current, part| {
        current
            .get_mut(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))
    })?;

    if slot.is_object() {
        anyhow::bail!("{} is a section; set one of its keys instead", key);
    }
    if std::mem::discriminant(slot) != std::mem::discriminant(&new_value) {
        anyhow::bail!("{} expects a value like {}", key, slot);
    }

    *slot = new_value;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let json = serde_json::to_value(RextractConfig::default()).unwrap();

        assert_eq!(lookup(&json, "sanitizer.normalize_quotes").unwrap(), &Value::Bool(true));
        assert!(lookup(&json, "sanitizer.missing").is_err());
    }

    #[test]
    fn test_assign_keeps_types() {
        let mut json = serde_json::to_value(RextractConfig::default()).unwrap();

        assign(&mut json, "output.pretty_json", Value::Bool(true)).unwrap();
        assert_eq!(json["output"]["pretty_json"], Value::Bool(true));

        assert!(assign(&mut json, "output.pretty_json", Value::String("yes".into())).is_err());
        assert!(assign(&mut json, "output", Value::Bool(true)).is_err());
        assert!(assign(&mut json, "output.colour", Value::Bool(true)).is_err());
    }
}
