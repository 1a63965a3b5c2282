//! List CLI command
//!
//! Handles: modprof list

use clap::Args;
use modprof_core::registry::{scan_installed, sort_by_name};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct ListArgs {
    /// Mods directory (defaults to the configured one)
    #[arg(long, value_name = "DIR")]
    mods_dir: Option<PathBuf>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Execute list command
pub fn execute(args: &ListArgs, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let settings = super::open_settings(data_dir)?;
    let config = super::export_config(data_dir, &settings, args.mods_dir.clone());

    let mut mods = scan_installed(&config.mods_dir, &config.package_extension)?;
    sort_by_name(&mut mods);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&mods)?);
        return Ok(());
    }

    if mods.is_empty() {
        println!("No mods found in {}", config.mods_dir.display());
    } else {
        println!("Installed mods:");
        for m in &mods {
            match &m.version {
                Some(version) => println!("  {} - {} ({version})", m.id, m.name),
                None => println!("  {} - {}", m.id, m.name),
            }
        }
    }

    Ok(())
}
