//! Export CLI command
//!
//! Handles: modprof export

use crate::host::{ConsoleNotifier, FixedPathPicker, PromptPicker, RunSettings};
use clap::Args;
use modprof_core::registry::scan_installed;
use modprof_core::{ExportOrchestrator, ExportOutcome, FilePicker, ModList};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args)]
pub struct ExportArgs {
    /// Mod to include in the profile (can specify multiple times)
    #[arg(short, long = "enable", value_name = "ID")]
    enable: Vec<String>,
    /// Include every installed mod
    #[arg(long)]
    all: bool,
    /// Where to save; `_profile.modprofile` or `.zip` is appended. Prompts when omitted
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Bundle local packages into a zip, overriding the include-local-mods setting
    #[arg(long, conflicts_with = "links_only")]
    include_local_mods: bool,
    /// Write a manifest of index links, overriding the include-local-mods setting
    #[arg(long)]
    links_only: bool,
    /// Mods directory (defaults to the configured one)
    #[arg(long, value_name = "DIR")]
    mods_dir: Option<PathBuf>,
    /// Index host used in manifest links
    #[arg(long, value_name = "HOST")]
    index_host: Option<String>,
}

impl ExportArgs {
    fn mode_override(&self) -> Option<bool> {
        if self.include_local_mods {
            Some(true)
        } else if self.links_only {
            Some(false)
        } else {
            None
        }
    }
}

/// Execute export command
pub fn execute(args: &ExportArgs, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let settings = super::open_settings(data_dir)?;
    let mut config = super::export_config(data_dir, &settings, args.mods_dir.clone());
    if let Some(host) = &args.index_host {
        config.index_host.clone_from(host);
    }

    let installed = scan_installed(&config.mods_dir, &config.package_extension)?;
    let mut list = ModList::from_installed(&installed);
    if args.all {
        list.set_all(true);
    }
    for id in &args.enable {
        if !list.set_enabled(id, true) {
            return Err(format!("Mod not installed: {id}").into());
        }
    }

    let picker: Arc<dyn FilePicker> = match args.output.clone() {
        Some(path) => Arc::new(FixedPathPicker::new(path)),
        None => Arc::new(PromptPicker),
    };
    let orchestrator = Arc::new(ExportOrchestrator::new(
        config,
        list,
        Arc::new(RunSettings::new(settings, args.mode_override())),
        picker,
        Arc::new(ConsoleNotifier),
    ));

    let runtime = tokio::runtime::Runtime::new()?;
    let outcome = runtime.block_on(async {
        orchestrator.start_export();
        orchestrator.wait_pending().await
    });

    match outcome {
        Some(ExportOutcome::Done(report)) => {
            println!(
                "Wrote {} mod(s) to {}",
                report.exported,
                report.output_path.display()
            );
            if !report.skipped.is_empty() {
                println!(
                    "Skipped (no local package): {}",
                    report.skipped.join(", ")
                );
            }
            Ok(())
        }
        Some(ExportOutcome::Failed(e)) => Err(format!("export failed ({})", e.code()).into()),
        _ => Ok(()),
    }
}
