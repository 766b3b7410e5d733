//! Storage location configuration
//!
//! Resolves where the per-user, per-application storage scope lives.
//! Supports the platform roaming/local directories and an explicit
//! directory for portable installs and tests.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

// ============================================================================
// StorageLocation
// ============================================================================

/// Root directory family for the storage scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StorageLocation {
    /// User configuration directory that follows the user between machines
    /// (`%APPDATA%` on Windows, `$XDG_CONFIG_HOME` on Linux).
    #[default]
    Roaming,
    /// Machine-local data directory (`%LOCALAPPDATA%`, `$XDG_DATA_HOME`).
    Local,
    /// Explicit directory used as-is, without vendor/app subfolders.
    Custom(PathBuf),
}

// ============================================================================
// StorageConfig
// ============================================================================

/// Identity and location of an application's isolated storage area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    vendor: String,
    app_name: String,
    location: StorageLocation,
}

impl StorageConfig {
    /// Start building a configuration for `app_name` published by `vendor`.
    pub fn builder(
        vendor: impl Into<String>,
        app_name: impl Into<String>,
    ) -> StorageConfigBuilder {
        StorageConfigBuilder {
            vendor: vendor.into(),
            app_name: app_name.into(),
            location: StorageLocation::default(),
        }
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn location(&self) -> &StorageLocation {
        &self.location
    }

    /// Directory that holds every record of this application for the
    /// current user.
    pub fn scope_dir(&self) -> Result<PathBuf> {
        let root = match &self.location {
            StorageLocation::Custom(dir) => return Ok(dir.clone()),
            StorageLocation::Roaming => dirs::config_dir(),
            StorageLocation::Local => dirs::data_local_dir(),
        };

        root.map(|root| self.app_dir(&root)).ok_or(Error::NoStorageRoot)
    }

    fn app_dir(&self, root: &Path) -> PathBuf {
        if self.vendor.is_empty() {
            root.join(&self.app_name)
        } else {
            root.join(&self.vendor).join(&self.app_name)
        }
    }
}

/// Builder for [`StorageConfig`].
#[derive(Debug, Clone)]
pub struct StorageConfigBuilder {
    vendor: String,
    app_name: String,
    location: StorageLocation,
}

impl StorageConfigBuilder {
    pub fn location(mut self, location: StorageLocation) -> Self {
        self.location = location;
        self
    }

    /// Store records directly in `dir` (portable mode).
    pub fn config_dir(self, dir: impl Into<PathBuf>) -> Self {
        self.location(StorageLocation::Custom(dir.into()))
    }

    pub fn build(self) -> StorageConfig {
        StorageConfig {
            vendor: self.vendor,
            app_name: self.app_name,
            location: self.location,
        }
    }
}
