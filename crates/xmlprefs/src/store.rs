//! Best-effort preference persistence
//!
//! [`PreferenceStore`] saves and loads caller-defined settings types under a
//! `(provider_id, name)` pair. The plain `save`/`load`/`remove` methods never
//! fail: problems are logged as warnings and the caller just sees nothing
//! happen (or `None`). The `try_*` variants return the underlying error.

use std::fmt;
use std::io::{BufReader, BufWriter, Write};
use std::sync::Arc;

use log::{debug, Log};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::{MarkupCodec, XmlCodec};
use crate::config::StorageConfig;
use crate::error::Result;
use crate::key::{self, StorageKey};
use crate::noncritical::{execute_noncritical, GlobalLogger};
use crate::storage::{DirectoryStorage, IsolatedStorage};

/// Warning text shared by every suppressed storage failure.
const STORAGE_FAILURE: &str = "⚠️ Could not access isolated settings storage for";

pub struct PreferenceStore<S = DirectoryStorage, C = XmlCodec> {
    storage: S,
    codec: C,
    logger: Arc<dyn Log>,
}

impl PreferenceStore {
    /// Store over the platform directory described by `config`, writing XML
    /// and logging through the global `log` facade.
    pub fn new(config: StorageConfig) -> Self {
        Self::with_parts(DirectoryStorage::new(config), XmlCodec::default())
    }
}

impl<S, C> PreferenceStore<S, C>
where
    S: IsolatedStorage,
    C: MarkupCodec,
{
    pub fn with_parts(storage: S, codec: C) -> Self {
        Self {
            storage,
            codec,
            logger: Arc::new(GlobalLogger),
        }
    }

    /// Replace the logger that receives suppressed failures.
    pub fn with_logger(mut self, logger: Arc<dyn Log>) -> Self {
        self.logger = logger;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // ========================================================================
    // Save
    // ========================================================================

    /// Persist `value`, overwriting whatever was stored before.
    pub fn save<T>(&self, value: &T, provider_id: &str, name: &str)
    where
        T: Serialize + ?Sized,
    {
        self.save_then(value, provider_id, name, || {});
    }

    /// Like [`save`](Self::save), calling `on_saved` once the record has been
    /// completely written.
    pub fn save_then<T, F>(&self, value: &T, provider_id: &str, name: &str, on_saved: F)
    where
        T: Serialize + ?Sized,
        F: FnOnce(),
    {
        let saved = self.noncritical(provider_id, name, || {
            self.try_save(value, provider_id, name)
        });
        if saved.is_some() {
            on_saved();
        }
    }

    pub fn try_save<T>(&self, value: &T, provider_id: &str, name: &str) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let key = StorageKey::new(provider_id, name)?;

        // Encode before touching storage so a bad value keeps the old record.
        let mut body = Vec::new();
        self.codec.encode(value, &mut body)?;

        // Released in reverse order: writer, stream, scope.
        let scope = self.storage.open_scope()?;
        let mut stream = scope.create(&key)?;
        let mut writer = BufWriter::new(&mut stream);

        writer.write_all(&body)?;
        writer.flush()?;

        debug!("💾 Saved settings to {key}");
        Ok(())
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// Load a previously saved value.
    ///
    /// Returns `None` if nothing was saved under this pair, or if the record
    /// could not be read or decoded (the latter is logged).
    pub fn load<T>(&self, provider_id: &str, name: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        self.load_then(provider_id, name, |_| {})
    }

    /// Like [`load`](Self::load), calling `on_loaded` when a value was
    /// produced.
    pub fn load_then<T, F>(&self, provider_id: &str, name: &str, on_loaded: F) -> Option<T>
    where
        T: DeserializeOwned,
        F: FnOnce(&T),
    {
        let loaded = self
            .noncritical(provider_id, name, || self.try_load::<T>(provider_id, name))
            .flatten();
        if let Some(value) = &loaded {
            on_loaded(value);
        }
        loaded
    }

    pub fn try_load<T>(&self, provider_id: &str, name: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let key = StorageKey::new(provider_id, name)?;

        let scope = self.storage.open_scope()?;
        let Some(mut stream) = scope.open_read(&key)? else {
            debug!("📁 No saved settings for {key}");
            return Ok(None);
        };
        let mut reader = BufReader::new(&mut stream);

        let value = self.codec.decode(&mut reader)?;
        debug!("📂 Loaded settings from {key}");
        Ok(Some(value))
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Whether a record exists for this pair. Failures read as `false`.
    pub fn exists(&self, provider_id: &str, name: &str) -> bool {
        self.noncritical(provider_id, name, || {
            let key = StorageKey::new(provider_id, name)?;
            self.storage.open_scope()?.contains(&key)
        })
        .unwrap_or(false)
    }

    /// Delete the record for this pair. Returns `true` if one was removed.
    pub fn remove(&self, provider_id: &str, name: &str) -> bool {
        self.noncritical(provider_id, name, || self.try_remove(provider_id, name))
            .unwrap_or(false)
    }

    pub fn try_remove(&self, provider_id: &str, name: &str) -> Result<bool> {
        let key = StorageKey::new(provider_id, name)?;
        let removed = self.storage.open_scope()?.remove(&key)?;
        if removed {
            debug!("🗑️ Removed settings {key}");
        }
        Ok(removed)
    }

    fn noncritical<T>(
        &self,
        provider_id: &str,
        name: &str,
        operation: impl FnOnce() -> Result<T>,
    ) -> Option<T> {
        let label = key::label(provider_id, name);
        execute_noncritical(self.logger.as_ref(), STORAGE_FAILURE, &label, operation)
    }
}

impl<S: fmt::Debug, C: fmt::Debug> fmt::Debug for PreferenceStore<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("storage", &self.storage)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}
