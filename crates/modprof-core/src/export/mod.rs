//! Profile export: link manifests and local archives

pub mod archive;
pub mod manifest;

use crate::config::ExportConfig;
use crate::resolve::{resolve, Resolution, ResolveError};
use archive::{create_archive, ArchiveEntry, ArchiveError};
use manifest::{write_manifest, ManifestError};
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Suffix appended to the picked path for link manifests
pub const MANIFEST_SUFFIX: &str = "_profile.modprofile";

/// Suffix appended to the picked path for local archives
pub const ARCHIVE_SUFFIX: &str = ".zip";

/// What an export produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportMode {
    /// Text manifest of index links
    Links,
    /// Zip of the local package files
    LocalArchive,
}

impl ExportMode {
    /// Mode selected by the `include-local-mods` setting
    #[must_use]
    pub fn from_include_local_mods(include_local_mods: bool) -> Self {
        if include_local_mods {
            Self::LocalArchive
        } else {
            Self::Links
        }
    }

    /// Where the artifact for a picked path is written
    #[must_use]
    pub fn output_path(self, picked: &Path) -> PathBuf {
        match self {
            Self::Links => with_suffix(picked, MANIFEST_SUFFIX),
            Self::LocalArchive => with_suffix(picked, ARCHIVE_SUFFIX),
        }
    }
}

impl std::fmt::Display for ExportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportMode::Links => write!(f, "links"),
            ExportMode::LocalArchive => write!(f, "local-archive"),
        }
    }
}

/// Append `suffix` to the last component of `path` as plain text
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Errors that end an export attempt
#[derive(Error, Debug)]
pub enum ExportError {
    /// Mods directory could not be listed
    #[error("Archive creation failed: {0}")]
    ArchiveResolveFailed(#[from] ResolveError),

    /// Destination unwritable or a package unreadable
    #[error("Archive creation failed: {0}")]
    ArchiveCreationFailed(#[from] ArchiveError),

    /// Manifest destination unwritable
    #[error("Manifest write failed: {0}")]
    ManifestWriteFailed(#[from] ManifestError),
}

impl ExportError {
    /// Get the error code for CLI/API responses
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ArchiveResolveFailed(_) | Self::ArchiveCreationFailed(_) => {
                "ARCHIVE_CREATION_FAILED"
            }
            Self::ManifestWriteFailed(_) => "MANIFEST_WRITE_FAILED",
        }
    }
}

/// Summary of a finished export
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub mode: ExportMode,
    /// Artifact that was written
    pub output_path: PathBuf,
    /// Lines in the manifest or members in the archive
    pub exported: usize,
    /// Selected mods left out because no local package was found
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

/// Write the link manifest for a selection
///
/// # Errors
/// Returns an error if the manifest cannot be written
pub fn export_links(
    selection: &[String],
    picked: &Path,
    config: &ExportConfig,
) -> Result<ExportReport, ExportError> {
    let mode = ExportMode::Links;
    let output_path = mode.output_path(picked);
    let exported = write_manifest(&output_path, &config.index_host, selection)?;
    Ok(ExportReport {
        mode,
        output_path,
        exported,
        skipped: Vec::new(),
    })
}

/// Archive the resolved packages of a selection
///
/// # Errors
/// Returns an error if a package cannot be read or the archive written
pub fn export_local_archive(
    resolution: Resolution,
    picked: &Path,
) -> Result<ExportReport, ExportError> {
    let mode = ExportMode::LocalArchive;
    let output_path = mode.output_path(picked);

    if !resolution.skipped.is_empty() {
        log::warn!(
            "{} selected mod(s) have no local package and were left out: {}",
            resolution.skipped.len(),
            resolution.skipped.join(", ")
        );
    }

    let entries: Vec<ArchiveEntry> = resolution
        .files
        .into_iter()
        .map(|f| ArchiveEntry::new(f.path, f.file_name))
        .collect();
    let exported = create_archive(&output_path, &entries)?;

    Ok(ExportReport {
        mode,
        output_path,
        exported,
        skipped: resolution.skipped,
    })
}

/// Step an export is about to take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    ManifestWrite,
    ArchiveResolve,
    ArchiveWrite,
}

/// Export a selection for the path chosen by the user
///
/// `on_stage` is called before each step, so callers can track progress.
///
/// # Errors
/// Returns an error if the artifact cannot be written or, in archive mode,
/// if the mods directory or a package file cannot be read
pub fn export_profile(
    selection: &[String],
    mode: ExportMode,
    picked: &Path,
    config: &ExportConfig,
    mut on_stage: impl FnMut(ExportStage),
) -> Result<ExportReport, ExportError> {
    match mode {
        ExportMode::Links => {
            on_stage(ExportStage::ManifestWrite);
            export_links(selection, picked, config)
        }
        ExportMode::LocalArchive => {
            on_stage(ExportStage::ArchiveResolve);
            let resolution = resolve(selection, &config.mods_dir, &config.package_extension)?;
            on_stage(ExportStage::ArchiveWrite);
            export_local_archive(resolution, picked)
        }
    }
}
