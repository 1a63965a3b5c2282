//! CLI command handlers
//!
//! Each subcommand has its own module. Shared setup (settings, export
//! configuration) lives here.

pub mod export;
pub mod list;
pub mod settings;

use modprof_core::config::SETTINGS_FILE;
use modprof_core::{ExportConfig, JsonSettings};
use std::path::{Path, PathBuf};

/// Open the settings file in the data directory
pub fn open_settings(data_dir: &Path) -> Result<JsonSettings, Box<dyn std::error::Error>> {
    Ok(JsonSettings::open(data_dir.join(SETTINGS_FILE))?)
}

/// Export configuration from settings, with an optional mods directory override
pub fn export_config(
    data_dir: &Path,
    settings: &JsonSettings,
    mods_dir: Option<PathBuf>,
) -> ExportConfig {
    let mut config = ExportConfig::from_settings(data_dir, settings);
    if let Some(dir) = mods_dir {
        config.mods_dir = dir;
    }
    config
}
