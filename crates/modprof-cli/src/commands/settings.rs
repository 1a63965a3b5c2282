//! Settings CLI commands
//!
//! Handles: modprof settings get/set/unset/list

use clap::Subcommand;
use modprof_core::SettingsStore;
use serde_json::Value;
use std::path::Path;

/// Settings commands
#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show all settings
    List,
    /// Print one setting
    Get {
        /// Setting key, e.g. include-local-mods
        key: String,
    },
    /// Change one setting
    Set {
        /// Setting key, e.g. include-local-mods
        key: String,
        /// New value; parsed as JSON, otherwise stored as text
        value: String,
    },
    /// Remove one setting
    Unset {
        /// Setting key
        key: String,
    },
}

/// Execute settings command
pub fn execute(cmd: SettingsCommands, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let settings = super::open_settings(data_dir)?;

    match cmd {
        SettingsCommands::List => {
            let entries = settings.entries();
            if entries.is_empty() {
                println!("No settings stored in {}", settings.path().display());
            }
            for (key, value) in entries {
                println!("{key} = {value}");
            }
        }
        SettingsCommands::Get { key } => match settings.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("Setting not set: {key}").into()),
        },
        SettingsCommands::Set { key, value } => {
            let value = parse_value(&value);
            println!("{key} = {value}");
            settings.set(&key, value)?;
        }
        SettingsCommands::Unset { key } => {
            if settings.remove(&key)?.is_none() {
                println!("Setting was not set: {key}");
            }
        }
    }

    Ok(())
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
