//! `costday config` handlers

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};

use costday_core::Config;

use crate::output::{print_json, Output, OutputFormat};

const KEYS: &[&str] = &["data_dir", "backend", "currency_symbol", "log_level"];

fn load(config_path: Option<&PathBuf>) -> Result<(Config, PathBuf)> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    let file = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    Ok((config, file))
}

/// Print the effective configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let (config, file) = load(config_path)?;

    match output.format {
        OutputFormat::Json => print_json(&config),
        OutputFormat::Quiet => println!("{}", config.data_dir.display()),
        OutputFormat::Human => {
            for key in KEYS {
                println!("{:<16} {}", format!("{}:", key), value_of(&config, key));
            }
            println!();
            println!("Config file: {}", file.display());
        }
    }
    Ok(())
}

/// Change one key and write the file back
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let file = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    let config = set_in_file(&file, &key, &value)?;

    output.success(&format!("{} = {}", key, value_of(&config, &key)));
    Ok(())
}

/// Update `key` in the file at `path`
///
/// Reads the file without `COSTDAY_*` overrides so they never get saved.
fn set_in_file(path: &Path, key: &str, value: &str) -> Result<Config> {
    let mut config =
        Config::load_from_path_with(path, |_| None).context("Failed to load configuration")?;

    apply(&mut config, key, value)?;
    config
        .save_to_path(path)
        .context("Failed to save configuration")?;
    Ok(config)
}

fn value_of(config: &Config, key: &str) -> String {
    match key {
        "data_dir" => config.data_dir.display().to_string(),
        "backend" => config.backend.to_string(),
        "currency_symbol" => config.currency_symbol.clone(),
        "log_level" => config.log_level.clone(),
        _ => String::new(),
    }
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" if value.is_empty() => bail!("data_dir cannot be empty"),
        "data_dir" => config.data_dir = PathBuf::from(value),
        "backend" => config.backend = value.parse().map_err(|e: String| anyhow!(e))?,
        "currency_symbol" => config.currency_symbol = value.to_string(),
        "log_level" if value.is_empty() => bail!("log_level cannot be empty"),
        "log_level" => config.log_level = value.to_string(),
        _ => bail!(
            "Unknown configuration key '{}'. Valid keys: {}",
            key,
            KEYS.join(", ")
        ),
    }
    Ok(())
}
