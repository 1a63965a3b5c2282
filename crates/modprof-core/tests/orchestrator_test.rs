//! Export orchestrator tests
//!
//! Drive the orchestrator with scripted pickers and check what ends up on
//! disk and what the user is told.

use async_trait::async_trait;
use modprof_core::orchestrator::{CANCELLED_MESSAGE, SUCCESS_MESSAGE};
use modprof_core::settings::INCLUDE_LOCAL_MODS;
use modprof_core::{
    Entry, ExportConfig, ExportOrchestrator, ExportOutcome, ExportState, FilePicker, JsonSettings,
    ModList, Notification, NotificationIcon, PickOptions, PickResult,
};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::oneshot;

/// Picker that answers with a fixed result
struct FixedPicker {
    result: PickResult,
    requests: Mutex<Vec<PickOptions>>,
}

impl FixedPicker {
    fn new(result: PickResult) -> Arc<Self> {
        Arc::new(Self {
            result,
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl FilePicker for FixedPicker {
    async fn pick_save_path(&self, options: &PickOptions) -> PickResult {
        self.requests.lock().unwrap().push(options.clone());
        self.result.clone()
    }
}

/// Picker whose answers are sent by the test, one channel per request
struct ScriptedPicker {
    answers: Mutex<VecDeque<oneshot::Receiver<PickResult>>>,
}

impl ScriptedPicker {
    fn new(count: usize) -> (Arc<Self>, Vec<oneshot::Sender<PickResult>>) {
        let mut senders = Vec::new();
        let mut receivers = VecDeque::new();
        for _ in 0..count {
            let (tx, rx) = oneshot::channel();
            senders.push(tx);
            receivers.push_back(rx);
        }
        let picker = Arc::new(Self {
            answers: Mutex::new(receivers),
        });
        (picker, senders)
    }
}

#[async_trait]
impl FilePicker for ScriptedPicker {
    async fn pick_save_path(&self, _options: &PickOptions) -> PickResult {
        let answer = self.answers.lock().unwrap().pop_front();
        match answer {
            Some(rx) => rx.await.unwrap_or(PickResult::Nothing),
            None => PickResult::Nothing,
        }
    }
}

struct Fixture {
    dir: TempDir,
    settings: Arc<JsonSettings>,
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mods = dir.path().join("mods");
        fs::create_dir_all(&mods).unwrap();
        fs::write(mods.join("alpha.geode"), b"alpha package").unwrap();
        fs::write(mods.join("gamma.geode"), b"gamma package").unwrap();

        let settings = Arc::new(
            JsonSettings::open(dir.path().join("settings.json")).expect("Failed to open settings"),
        );
        Self {
            dir,
            settings,
            notifications: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn orchestrator(&self, picker: Arc<dyn FilePicker>) -> ExportOrchestrator {
        let list = ModList::new(vec![
            Entry::new("alpha", "Alpha").with_enabled(true),
            Entry::new("beta", "Beta"),
            Entry::new("gamma", "Gamma").with_enabled(true),
        ]);
        let sink = Arc::clone(&self.notifications);
        let notifier = Arc::new(move |n: Notification| sink.lock().unwrap().push(n));
        ExportOrchestrator::new(
            ExportConfig::new(self.path("mods")),
            list,
            self.settings.clone(),
            picker,
            notifier,
        )
    }

    fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    fn files(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

fn manifest_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("Manifest should exist")
        .lines()
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Single exports
// =============================================================================

#[tokio::test]
async fn test_export_manifest_by_default() {
    let fixture = Fixture::new();
    let picker = FixedPicker::new(PickResult::Picked(fixture.path("x")));
    let orchestrator = fixture.orchestrator(picker.clone());

    let outcome = orchestrator.export().await;

    let report = outcome.report().expect("Export should succeed");
    assert_eq!(report.output_path, fixture.path("x_profile.modprofile"));
    assert_eq!(
        manifest_lines(&report.output_path),
        vec![
            "https://api.geode-sdk.org/v1/mods/alpha",
            "https://api.geode-sdk.org/v1/mods/gamma",
        ]
    );
    assert_eq!(orchestrator.state(), ExportState::Done);
    assert_eq!(
        fixture.notifications(),
        vec![Notification::success(SUCCESS_MESSAGE)]
    );
    assert_eq!(
        picker.requests.lock().unwrap().as_slice(),
        &[PickOptions::mod_profile()]
    );
}

#[tokio::test]
async fn test_export_archive_when_local_mods_included() {
    let fixture = Fixture::new();
    fixture.settings.set(INCLUDE_LOCAL_MODS, true).unwrap();
    let orchestrator =
        fixture.orchestrator(FixedPicker::new(PickResult::Picked(fixture.path("x"))));

    let outcome = orchestrator.export().await;

    let report = outcome.report().expect("Export should succeed");
    assert_eq!(report.output_path, fixture.path("x.zip"));
    assert_eq!(report.exported, 2);
    assert!(!fixture.path("x_profile.modprofile").exists());
    assert_eq!(fixture.notifications()[0].icon, NotificationIcon::Success);
}

#[tokio::test]
async fn test_mode_is_read_per_export() {
    let fixture = Fixture::new();
    let orchestrator =
        fixture.orchestrator(FixedPicker::new(PickResult::Picked(fixture.path("x"))));

    orchestrator.export().await;
    fixture.settings.set(INCLUDE_LOCAL_MODS, true).unwrap();
    orchestrator.export().await;

    assert!(fixture.path("x_profile.modprofile").exists());
    assert!(fixture.path("x.zip").exists());
}

#[tokio::test]
async fn test_toggles_are_read_at_export_time() {
    let fixture = Fixture::new();
    let orchestrator =
        fixture.orchestrator(FixedPicker::new(PickResult::Picked(fixture.path("x"))));

    orchestrator.with_list(|list| {
        list.set_enabled("alpha", false);
        list.set_enabled("beta", true);
    });
    orchestrator.export().await;

    assert_eq!(
        manifest_lines(&fixture.path("x_profile.modprofile")),
        vec![
            "https://api.geode-sdk.org/v1/mods/beta",
            "https://api.geode-sdk.org/v1/mods/gamma",
        ]
    );
}

#[tokio::test]
async fn test_cancel_writes_nothing() {
    let fixture = Fixture::new();
    fixture.settings.set(INCLUDE_LOCAL_MODS, true).unwrap();
    let before = fixture.files();
    let orchestrator = fixture.orchestrator(FixedPicker::new(PickResult::Cancelled));

    let outcome = orchestrator.export().await;

    assert!(matches!(outcome, ExportOutcome::Cancelled));
    assert_eq!(orchestrator.state(), ExportState::Cancelled);
    assert_eq!(fixture.files(), before);
    assert_eq!(
        fixture.notifications(),
        vec![Notification::error(CANCELLED_MESSAGE)]
    );
}

#[tokio::test]
async fn test_empty_pick_is_ignored() {
    let fixture = Fixture::new();
    let before = fixture.files();
    let orchestrator = fixture.orchestrator(FixedPicker::new(PickResult::Nothing));

    let outcome = orchestrator.export().await;

    assert!(matches!(outcome, ExportOutcome::Ignored));
    assert_eq!(orchestrator.state(), ExportState::Idle);
    assert_eq!(fixture.files(), before);
    assert!(fixture.notifications().is_empty());
}

#[tokio::test]
async fn test_write_failure_is_notified() {
    let fixture = Fixture::new();
    let picked = fixture.path("no-such-dir").join("x");
    let orchestrator = fixture.orchestrator(FixedPicker::new(PickResult::Picked(picked)));

    let outcome = orchestrator.export().await;

    match outcome {
        ExportOutcome::Failed(e) => assert_eq!(e.code(), "MANIFEST_WRITE_FAILED"),
        other => panic!("Expected failure, got {other:?}"),
    }
    assert_eq!(orchestrator.state(), ExportState::Failed);
    let notifications = fixture.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].icon, NotificationIcon::Error);
    assert!(notifications[0].message.starts_with("Failed to create profile"));
}

// =============================================================================
// Pending exports
// =============================================================================

#[tokio::test]
async fn test_stale_picker_result_is_ignored() {
    let fixture = Fixture::new();
    let (picker, mut senders) = ScriptedPicker::new(2);
    let orchestrator = fixture.orchestrator(picker);

    let first = orchestrator.export();
    let second = orchestrator.export();
    tokio::pin!(first);
    tokio::pin!(second);

    // Both exports are now waiting on the picker
    assert!(tokio::time::timeout(Duration::from_millis(20), &mut first)
        .await
        .is_err());
    assert!(tokio::time::timeout(Duration::from_millis(20), &mut second)
        .await
        .is_err());
    assert_eq!(orchestrator.state(), ExportState::AwaitingPath);

    let second_tx = senders.pop().unwrap();
    let first_tx = senders.pop().unwrap();
    first_tx.send(PickResult::Picked(fixture.path("old"))).unwrap();
    second_tx.send(PickResult::Picked(fixture.path("new"))).unwrap();

    assert!(matches!(first.await, ExportOutcome::Superseded));
    assert!(second.await.report().is_some());
    assert!(!fixture.path("old_profile.modprofile").exists());
    assert!(fixture.path("new_profile.modprofile").exists());
    assert_eq!(fixture.notifications().len(), 1);
}

#[tokio::test]
async fn test_start_export_replaces_pending_export() {
    let fixture = Fixture::new();
    let (picker, mut senders) = ScriptedPicker::new(2);
    let orchestrator = Arc::new(fixture.orchestrator(picker));

    // Yield after each start so the export reaches the picker
    orchestrator.start_export();
    tokio::task::yield_now().await;
    orchestrator.start_export();
    tokio::task::yield_now().await;

    let second_tx = senders.pop().unwrap();
    let first_tx = senders.pop().unwrap();
    // The first export may already be aborted, dropping its receiver
    let _ = first_tx.send(PickResult::Picked(fixture.path("old")));
    second_tx
        .send(PickResult::Picked(fixture.path("new")))
        .unwrap();

    let outcome = orchestrator
        .wait_pending()
        .await
        .expect("Second export should complete");
    assert!(outcome.report().is_some());
    assert!(!fixture.path("old_profile.modprofile").exists());
    assert!(fixture.path("new_profile.modprofile").exists());
    assert!(orchestrator.wait_pending().await.is_none());
}

#[tokio::test]
async fn test_dropping_orchestrator_drops_pending_export() {
    let fixture = Fixture::new();
    let (picker, mut senders) = ScriptedPicker::new(1);
    let orchestrator = Arc::new(fixture.orchestrator(picker));

    orchestrator.start_export();
    drop(orchestrator);

    let tx = senders.pop().unwrap();
    let _ = tx.send(PickResult::Picked(fixture.path("late")));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!fixture.path("late_profile.modprofile").exists());
    assert!(fixture.notifications().is_empty());
}
