//! Local package resolution for archive exports

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors while resolving local package files
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Cannot read mods directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A selected mod matched to its package file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Mod identifier
    pub id: String,
    /// Absolute path of the package file
    pub path: PathBuf,
    /// Package file name, `<id>.<extension>`
    pub file_name: String,
}

/// Outcome of resolving a selection against the mods directory
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Matched packages, in selection order
    pub files: Vec<ResolvedFile>,
    /// Selected identifiers with no package file
    pub skipped: Vec<String>,
}

/// Package file name for a mod identifier
#[must_use]
pub fn package_file_name(id: &str, extension: &str) -> String {
    format!("{id}.{extension}")
}

/// Match each selected identifier to `<id>.<extension>` in `mods_dir`
///
/// The directory is listed once. Names are compared exactly and
/// case-sensitively. Identifiers without a package are reported in
/// [`Resolution::skipped`] and otherwise ignored.
///
/// # Errors
/// Returns an error if the directory cannot be listed
pub fn resolve(
    selection: &[String],
    mods_dir: &Path,
    extension: &str,
) -> Result<Resolution, ResolveError> {
    let io_err = |source| ResolveError::Io {
        path: mods_dir.to_path_buf(),
        source,
    };

    let wanted: HashSet<String> = selection
        .iter()
        .map(|id| package_file_name(id, extension))
        .collect();

    let root = mods_dir.canonicalize().map_err(io_err)?;
    let mut available: HashMap<String, PathBuf> = HashMap::new();
    for entry in fs::read_dir(&root).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if wanted.contains(&name) && entry.path().is_file() {
            available.insert(name, entry.path());
        }
    }

    let mut resolution = Resolution::default();
    for id in selection {
        let file_name = package_file_name(id, extension);
        match available.get(&file_name) {
            Some(path) => resolution.files.push(ResolvedFile {
                id: id.clone(),
                path: path.clone(),
                file_name,
            }),
            None => {
                log::debug!("No local package for {id}");
                resolution.skipped.push(id.clone());
            }
        }
    }

    Ok(resolution)
}
