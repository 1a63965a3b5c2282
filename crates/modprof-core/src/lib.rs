//! modprof Core - Mod profile export engine
//!
//! This crate turns the user's selection of installed mods into a portable
//! profile: either a `.modprofile` manifest of index links or a zip archive
//! bundling the local package files.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod entry;
pub mod export;
pub mod notify;
pub mod orchestrator;
pub mod picker;
pub mod registry;
pub mod resolve;
pub mod settings;

pub use config::ExportConfig;
pub use entry::{collect, Entry, ModList};
pub use export::{ExportError, ExportMode, ExportReport, ExportStage};
pub use notify::{Notification, NotificationIcon, Notifier};
pub use orchestrator::{ExportOrchestrator, ExportOutcome, ExportState};
pub use picker::{FilePicker, PickOptions, PickResult};
pub use settings::{JsonSettings, SettingsStore};
