//! Export configuration and data directory discovery

use crate::settings::{SettingsStore, INDEX_HOST, MODS_DIR};
use std::path::{Path, PathBuf};

/// Default index host for link manifests
pub const DEFAULT_INDEX_HOST: &str = "api.geode-sdk.org";

/// Default extension of mod package files
pub const DEFAULT_PACKAGE_EXTENSION: &str = "geode";

/// Settings file name inside the data directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Where exports look things up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Host used in manifest links
    pub index_host: String,
    /// Directory holding installed mod packages
    pub mods_dir: PathBuf,
    /// Package file extension, without the dot
    pub package_extension: String,
}

impl ExportConfig {
    /// Configuration with default host and extension
    #[must_use]
    pub fn new(mods_dir: impl Into<PathBuf>) -> Self {
        Self {
            index_host: DEFAULT_INDEX_HOST.to_string(),
            mods_dir: mods_dir.into(),
            package_extension: DEFAULT_PACKAGE_EXTENSION.to_string(),
        }
    }

    /// Configuration for a data directory, honouring stored settings
    ///
    /// The mods directory defaults to `<data_dir>/mods`.
    #[must_use]
    pub fn from_settings(data_dir: &Path, settings: &dyn SettingsStore) -> Self {
        let mods_dir = settings
            .get_string(MODS_DIR)
            .map_or_else(|| data_dir.join("mods"), PathBuf::from);
        let mut config = Self::new(mods_dir);
        if let Some(host) = settings.get_string(INDEX_HOST) {
            config.index_host = host;
        }
        config
    }

    #[must_use]
    pub fn with_index_host(mut self, host: impl Into<String>) -> Self {
        self.index_host = host.into();
        self
    }

    #[must_use]
    pub fn with_package_extension(mut self, extension: impl Into<String>) -> Self {
        self.package_extension = extension.into();
        self
    }
}

/// Get the application data directory
///
/// Priority:
/// 1. `$HOME/.modprof`
/// 2. `%USERPROFILE%\.modprof` on Windows
/// 3. The platform data directory
/// 4. A temporary directory, with a warning
#[must_use]
pub fn default_data_dir() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".modprof");
    }

    if let Ok(userprofile) = std::env::var("USERPROFILE") {
        return PathBuf::from(userprofile).join(".modprof");
    }

    if let Some(data) = dirs::data_dir() {
        return data.join("modprof");
    }

    let temp = std::env::temp_dir().join("modprof-data");
    log::warn!(
        "Could not determine home directory. Using temporary location: {}",
        temp.display()
    );
    temp
}
