//! Archive creation for local profile export

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use thiserror::Error;
use zip::write::FileOptions;
use zip::ZipWriter;

/// Errors during archive creation
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Source file not found: {0}")]
    MissingSource(PathBuf),

    #[error("Cannot move archive into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// A file to store in the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// File to read
    pub source: PathBuf,
    /// Member name inside the archive
    pub name: String,
}

impl ArchiveEntry {
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            name: name.into(),
        }
    }
}

/// Create a zip archive at `output_path` holding each entry under its name
///
/// Members are written in the order given, deflate-compressed. The archive is
/// assembled in a temporary file beside `output_path` and moved over it only
/// once every member has been written, so on error nothing is left at
/// `output_path`. An existing file there is replaced and keeps its
/// permissions; a new one gets the usual permissions for created files.
///
/// # Errors
/// Returns an error if a source file is missing or unreadable, or if the
/// archive cannot be written
pub fn create_archive(output_path: &Path, entries: &[ArchiveEntry]) -> Result<usize, ArchiveError> {
    let parent = match output_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut temp = temp_file_beside(parent, output_path)?;

    {
        let mut zip = ZipWriter::new(temp.as_file_mut());
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for entry in entries {
            if !entry.source.is_file() {
                return Err(ArchiveError::MissingSource(entry.source.clone()));
            }
            log::info!("zipping file: {}", entry.source.display());

            let mut source = File::open(&entry.source)?;
            zip.start_file(entry.name.clone(), options)?;
            io::copy(&mut source, &mut zip)?;
        }

        zip.finish()?;
    }

    temp.persist(output_path)?;
    Ok(entries.len())
}

/// Temporary file in `parent` with the permissions `output_path` should end up with
fn temp_file_beside(parent: &Path, output_path: &Path) -> io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".modprof-");
    // Subject to the umask, like any newly created file
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let temp = builder.tempfile_in(parent)?;

    if let Ok(existing) = fs::metadata(output_path) {
        temp.as_file().set_permissions(existing.permissions())?;
    }
    Ok(temp)
}
