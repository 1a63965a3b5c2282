//! Export orchestration
//!
//! Drives one export from the user's click to the notification: ask the
//! picker for a destination, read the export mode, collect the selection and
//! write the artifact. The orchestrator owns its pending export, so a picker
//! that completes after a newer export started, or after the orchestrator is
//! gone, never writes anything.

use crate::config::ExportConfig;
use crate::entry::ModList;
use crate::export::{export_profile, ExportError, ExportMode, ExportReport, ExportStage};
use crate::notify::{Notification, Notifier};
use crate::picker::{FilePicker, PickOptions, PickResult};
use crate::settings::SettingsStore;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;

/// Notification text for a written profile
pub const SUCCESS_MESSAGE: &str = "Success! Created Profile!";

/// Notification text for a dismissed picker
pub const CANCELLED_MESSAGE: &str = "File Operation Cancelled";

/// Where the orchestrator is in the export flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    AwaitingPath,
    ManifestWrite,
    ArchiveResolve,
    ArchiveWrite,
    Done,
    Cancelled,
    Failed,
}

impl From<ExportStage> for ExportState {
    fn from(stage: ExportStage) -> Self {
        match stage {
            ExportStage::ManifestWrite => Self::ManifestWrite,
            ExportStage::ArchiveResolve => Self::ArchiveResolve,
            ExportStage::ArchiveWrite => Self::ArchiveWrite,
        }
    }
}

/// How an export attempt ended
#[derive(Debug)]
pub enum ExportOutcome {
    /// The artifact was written
    Done(ExportReport),
    /// The user dismissed the picker; nothing was written
    Cancelled,
    /// Writing failed; the user was notified
    Failed(ExportError),
    /// A newer export started before the picker completed
    Superseded,
    /// The picker completed with neither a path nor a cancellation
    Ignored,
}

impl ExportOutcome {
    #[must_use]
    pub fn report(&self) -> Option<&ExportReport> {
        match self {
            Self::Done(report) => Some(report),
            _ => None,
        }
    }
}

/// Runs profile exports for one export screen
pub struct ExportOrchestrator {
    config: ExportConfig,
    list: Mutex<ModList>,
    settings: Arc<dyn SettingsStore>,
    picker: Arc<dyn FilePicker>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<ExportState>,
    generation: AtomicU64,
    pending: Mutex<Option<JoinHandle<ExportOutcome>>>,
}

impl ExportOrchestrator {
    #[must_use]
    pub fn new(
        config: ExportConfig,
        list: ModList,
        settings: Arc<dyn SettingsStore>,
        picker: Arc<dyn FilePicker>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            list: Mutex::new(list),
            settings,
            picker,
            notifier,
            state: Mutex::new(ExportState::Idle),
            generation: AtomicU64::new(0),
            pending: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn state(&self) -> ExportState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read or change the entry list, e.g. when the user flips a toggle
    pub fn with_list<R>(&self, f: impl FnOnce(&mut ModList) -> R) -> R {
        let mut list = self.list.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut list)
    }

    /// Identifiers currently toggled on, in display order
    #[must_use]
    pub fn selection(&self) -> Vec<String> {
        self.with_list(|list| list.selection())
    }

    /// Run one export and wait for it to finish
    pub async fn export(&self) -> ExportOutcome {
        let generation = self.begin();
        let result = self.picker.pick_save_path(&PickOptions::mod_profile()).await;
        self.complete(generation, result)
    }

    /// Start an export in the background
    ///
    /// Any export still waiting on the picker is aborted. The task holds only
    /// a weak reference, so dropping the orchestrator also drops the export.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime
    pub fn start_export(self: &Arc<Self>) {
        let generation = self.begin();
        let picker = Arc::clone(&self.picker);
        let this = Arc::downgrade(self);

        let handle = tokio::spawn(async move {
            let result = picker.pick_save_path(&PickOptions::mod_profile()).await;
            match this.upgrade() {
                Some(this) => this.complete(generation, result),
                None => ExportOutcome::Superseded,
            }
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(handle) {
            log::debug!("Aborting stale export");
            previous.abort();
        }
    }

    /// Wait for the background export, if one is pending
    ///
    /// Returns `None` if nothing was pending or the export was aborted.
    pub async fn wait_pending(&self) -> Option<ExportOutcome> {
        let handle = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            pending.take()
        }?;
        handle.await.ok()
    }

    fn begin(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_state(ExportState::AwaitingPath);
        generation
    }

    fn complete(&self, generation: u64, result: PickResult) -> ExportOutcome {
        if self.generation.load(Ordering::SeqCst) != generation {
            log::debug!("Ignoring picker result of superseded export #{generation}");
            return ExportOutcome::Superseded;
        }

        match result {
            PickResult::Cancelled => {
                self.set_state(ExportState::Cancelled);
                self.notifier.notify(Notification::error(CANCELLED_MESSAGE));
                ExportOutcome::Cancelled
            }
            PickResult::Nothing => {
                self.set_state(ExportState::Idle);
                ExportOutcome::Ignored
            }
            PickResult::Picked(path) => self.write_profile(&path),
        }
    }

    fn write_profile(&self, picked: &Path) -> ExportOutcome {
        let mode = ExportMode::from_include_local_mods(self.settings.include_local_mods());
        let selection = self.selection();
        log::info!(
            "Exporting {} mod(s) as {mode} to {}",
            selection.len(),
            picked.display()
        );

        let result = export_profile(&selection, mode, picked, &self.config, |stage| {
            self.set_state(stage.into());
        });

        match result {
            Ok(report) => {
                self.set_state(ExportState::Done);
                log::info!(
                    "Wrote {} entr(ies) to {}",
                    report.exported,
                    report.output_path.display()
                );
                self.notifier.notify(Notification::success(SUCCESS_MESSAGE));
                ExportOutcome::Done(report)
            }
            Err(e) => {
                self.set_state(ExportState::Failed);
                log::error!("Export failed ({}): {e}", e.code());
                self.notifier
                    .notify(Notification::error(format!("Failed to create profile: {e}")));
                ExportOutcome::Failed(e)
            }
        }
    }

    fn set_state(&self, next: ExportState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        log::debug!("Export state {:?} -> {next:?}", *state);
        *state = next;
    }
}

impl Drop for ExportOrchestrator {
    fn drop(&mut self) {
        let pending = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}
