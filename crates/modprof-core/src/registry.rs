//! Installed mod discovery
//!
//! Lists the package files in the mods directory and reads the display
//! metadata bundled inside each package.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::ZipArchive;

/// Metadata file stored at the root of every mod package
const PACKAGE_METADATA_FILE: &str = "mod.json";

/// Errors while listing the mods directory
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Cannot read mods directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A mod package found in the mods directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledMod {
    /// Package name (file stem)
    pub id: String,
    /// Display name from the package metadata, or the id
    pub name: String,
    /// Version from the package metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Location of the package file
    pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct PackageMetadata {
    name: Option<String>,
    version: Option<String>,
}

/// List the installed mod packages with the given extension
///
/// A package is any regular file named `<id>.<extension>`. Packages whose
/// metadata cannot be read are still listed, named after their id.
///
/// # Errors
/// Returns an error if the directory cannot be read
pub fn scan_installed(mods_dir: &Path, extension: &str) -> Result<Vec<InstalledMod>, RegistryError> {
    let io_err = |source| RegistryError::Io {
        path: mods_dir.to_path_buf(),
        source,
    };

    let mut mods = Vec::new();
    for entry in fs::read_dir(mods_dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };

        let metadata = read_metadata(&path);
        mods.push(InstalledMod {
            name: metadata
                .as_ref()
                .and_then(|m| m.name.clone())
                .unwrap_or_else(|| id.clone()),
            version: metadata.and_then(|m| m.version),
            id,
            path,
        });
    }

    mods.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(mods)
}

/// Sort mods by display name, ties broken by id so the order is stable
pub fn sort_by_name(mods: &mut [InstalledMod]) {
    mods.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
}

fn read_metadata(package: &Path) -> Option<PackageMetadata> {
    let file = File::open(package).ok()?;
    let mut archive = match ZipArchive::new(file) {
        Ok(archive) => archive,
        Err(e) => {
            log::debug!("{} is not a readable package: {e}", package.display());
            return None;
        }
    };
    let entry = archive.by_name(PACKAGE_METADATA_FILE).ok()?;
    match serde_json::from_reader(entry) {
        Ok(metadata) => Some(metadata),
        Err(e) => {
            log::debug!("Invalid {PACKAGE_METADATA_FILE} in {}: {e}", package.display());
            None
        }
    }
}
