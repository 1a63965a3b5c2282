//! Link manifest generation

use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors while writing a manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Index URL for a mod identifier
#[must_use]
pub fn mod_link(index_host: &str, id: &str) -> String {
    format!("https://{index_host}/v1/mods/{id}")
}

/// Manifest content for a selection: one link per line
#[must_use]
pub fn render_manifest(index_host: &str, selection: &[String]) -> String {
    selection.iter().fold(String::new(), |mut out, id| {
        out.push_str(&mod_link(index_host, id));
        out.push('\n');
        out
    })
}

/// Write the manifest for a selection, truncating any existing file
///
/// # Errors
/// Returns an error if the file cannot be written
pub fn write_manifest(
    output_path: &Path,
    index_host: &str,
    selection: &[String],
) -> Result<usize, ManifestError> {
    fs::write(output_path, render_manifest(index_host, selection))?;
    Ok(selection.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_mod_link() {
        assert_eq!(
            mod_link("api.geode-sdk.org", "geode.node-ids"),
            "https://api.geode-sdk.org/v1/mods/geode.node-ids"
        );
    }

    #[test]
    fn test_render_empty_selection() {
        assert_eq!(render_manifest("api.geode-sdk.org", &[]), "");
    }

    #[test]
    fn test_write_truncates_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x_profile.modprofile");
        fs::write(&path, "old line one\nold line two\nold line three\n").unwrap();

        let count = write_manifest(&path, "example.org", &["solo".to_string()]).unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "https://example.org/v1/mods/solo\n"
        );
    }
}
