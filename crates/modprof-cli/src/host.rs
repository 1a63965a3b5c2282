//! Terminal stand-ins for the export screen's collaborators
//!
//! The export engine talks to a picker, a notifier and a settings store; in
//! the CLI these are a path given on the command line (or typed at a
//! prompt), console output and the settings file with per-run overrides.

use async_trait::async_trait;
use modprof_core::settings::INCLUDE_LOCAL_MODS;
use modprof_core::{
    FilePicker, JsonSettings, Notification, NotificationIcon, Notifier, PickOptions, PickResult,
    SettingsStore,
};
use serde_json::Value;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Picker answering with a path given up front
pub struct FixedPathPicker {
    path: PathBuf,
}

impl FixedPathPicker {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl FilePicker for FixedPathPicker {
    async fn pick_save_path(&self, _options: &PickOptions) -> PickResult {
        PickResult::Picked(self.path.clone())
    }
}

/// Picker prompting for a path on stdin; an empty answer cancels
pub struct PromptPicker;

#[async_trait]
impl FilePicker for PromptPicker {
    async fn pick_save_path(&self, options: &PickOptions) -> PickResult {
        let prompt = prompt_text(options);
        let answer = tokio::task::spawn_blocking(move || read_answer(&prompt)).await;

        match answer {
            Ok(Ok(Some(line))) => PickResult::Picked(PathBuf::from(line)),
            Ok(Ok(None)) => PickResult::Cancelled,
            Ok(Err(e)) => {
                log::warn!("Could not read path from stdin: {e}");
                PickResult::Cancelled
            }
            Err(e) => {
                log::warn!("Path prompt did not finish: {e}");
                PickResult::Nothing
            }
        }
    }
}

fn prompt_text(options: &PickOptions) -> String {
    let filters: Vec<String> = options
        .filters
        .iter()
        .map(|f| format!("{} ({})", f.label, f.extensions.join(", ")))
        .collect();
    if filters.is_empty() {
        "Save as (empty to cancel): ".to_string()
    } else {
        format!("Save {} as (empty to cancel): ", filters.join(", "))
    }
}

fn read_answer(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let line = line.trim();
    Ok((!line.is_empty()).then(|| line.to_string()))
}

/// Notifier printing to the terminal
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.icon {
            NotificationIcon::Info => println!("{}", notification.message),
            NotificationIcon::Success => println!("✓ {}", notification.message),
            NotificationIcon::Error => eprintln!("✗ {}", notification.message),
        }
    }
}

/// Settings file with an optional export mode override for this run
pub struct RunSettings {
    file: JsonSettings,
    include_local_mods: Option<bool>,
}

impl RunSettings {
    pub fn new(file: JsonSettings, include_local_mods: Option<bool>) -> Self {
        Self {
            file,
            include_local_mods,
        }
    }
}

impl SettingsStore for RunSettings {
    fn get(&self, key: &str) -> Option<Value> {
        match (key, self.include_local_mods) {
            (INCLUDE_LOCAL_MODS, Some(value)) => Some(Value::Bool(value)),
            _ => self.file.get(key),
        }
    }
}
