//! Isolated storage abstraction
//!
//! A storage area is opened into a short-lived scope for each operation.
//! Streams handed out by a scope borrow it, so they are always released
//! before the scope itself.

use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::StorageConfig;
use crate::error::Result;
use crate::key::StorageKey;

/// Per-user, per-application storage area.
pub trait IsolatedStorage {
    /// Acquire a scope for a single operation.
    fn open_scope(&self) -> Result<Box<dyn StorageScope + '_>>;
}

/// Access to the records of one storage area, valid until dropped.
pub trait StorageScope {
    /// Whether a record exists under `key`.
    fn contains(&self, key: &StorageKey) -> Result<bool>;

    /// Open the record for reading, or `None` if it does not exist.
    fn open_read(&self, key: &StorageKey) -> Result<Option<Box<dyn Read + '_>>>;

    /// Create the record, truncating any previous contents.
    fn create(&self, key: &StorageKey) -> Result<Box<dyn Write + '_>>;

    /// Delete the record. Returns `false` if there was nothing to delete.
    fn remove(&self, key: &StorageKey) -> Result<bool>;
}

// ============================================================================
// Directory-backed storage
// ============================================================================

/// Storage area backed by a directory on the local file system.
#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    config: StorageConfig,
}

impl DirectoryStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

impl IsolatedStorage for DirectoryStorage {
    fn open_scope(&self) -> Result<Box<dyn StorageScope + '_>> {
        let dir = self.config.scope_dir()?;
        Ok(Box::new(DirectoryScope { dir }))
    }
}

/// Scope over a single directory. The directory is created lazily on the
/// first write so that reads never leave empty folders behind.
#[derive(Debug)]
pub struct DirectoryScope {
    dir: PathBuf,
}

impl DirectoryScope {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &StorageKey) -> PathBuf {
        self.dir.join(key.as_str())
    }
}

impl StorageScope for DirectoryScope {
    fn contains(&self, key: &StorageKey) -> Result<bool> {
        match fs::metadata(self.path_for(key)) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn open_read(&self, key: &StorageKey) -> Result<Option<Box<dyn Read + '_>>> {
        match File::open(self.path_for(key)) {
            Ok(file) => Ok(Some(Box::new(file))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn create(&self, key: &StorageKey) -> Result<Box<dyn Write + '_>> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        debug!("📝 Opening settings file for writing: {}", path.display());
        Ok(Box::new(File::create(path)?))
    }

    fn remove(&self, key: &StorageKey) -> Result<bool> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
