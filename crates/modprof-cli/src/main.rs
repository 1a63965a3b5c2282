//! modprof CLI - Command-line interface for modprof
//!
//! Provides `modprof list`, `modprof export` and `modprof settings`.

mod commands;
mod host;

use clap::{Parser, Subcommand};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;

use commands::export::ExportArgs;
use commands::list::ListArgs;
use commands::settings::SettingsCommands;

#[derive(Parser)]
#[command(name = "modprof")]
#[command(about = "modprof - Export mod profiles as link manifests or local archives")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Data directory holding settings.json and, by default, the mods folder
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List installed mods
    List(ListArgs),
    /// Export a mod profile
    Export(ExportArgs),
    /// Read or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Warning: logging disabled: {e}");
    }

    let data_dir = cli
        .data_dir
        .unwrap_or_else(modprof_core::config::default_data_dir);

    let result = match cli.command {
        Commands::List(args) => commands::list::execute(&args, &data_dir),
        Commands::Export(args) => commands::export::execute(&args, &data_dir),
        Commands::Settings { action } => commands::settings::execute(action, &data_dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
