//! Save-file picker seam

use async_trait::async_trait;
use std::path::PathBuf;

/// A file type the picker offers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub label: String,
    /// Extensions including the leading dot
    pub extensions: Vec<String>,
}

/// Options passed to the picker
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PickOptions {
    /// Suggested path, if any
    pub default_path: Option<PathBuf>,
    pub filters: Vec<FileFilter>,
}

impl PickOptions {
    /// Options for saving a mod profile
    #[must_use]
    pub fn mod_profile() -> Self {
        Self {
            default_path: None,
            filters: vec![FileFilter {
                label: "Mod Profile".to_string(),
                extensions: vec![".modprofile".to_string()],
            }],
        }
    }
}

/// How a pick request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickResult {
    /// The user chose a path
    Picked(PathBuf),
    /// The user dismissed the picker
    Cancelled,
    /// The picker finished without a path or a cancellation
    Nothing,
}

/// Asks the user where to save
#[async_trait]
pub trait FilePicker: Send + Sync {
    async fn pick_save_path(&self, options: &PickOptions) -> PickResult;
}
