//! # xmlprefs
//!
//! Best-effort persistence of small per-user preference objects.
//!
//! Each settings set is identified by the provider that owns it and a name,
//! stored as `<provider_id>_<name>.xml` in the current user's storage area
//! for the application, and serialized with serde as XML.
//!
//! ```no_run
//! use serde::{Deserialize, Serialize};
//! use xmlprefs::{PreferenceStore, StorageConfig};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Layout {
//!     sidebar_width: u32,
//!     compact: bool,
//! }
//!
//! let store = PreferenceStore::new(StorageConfig::builder("Zarestia", "my-app").build());
//! store.save(&Layout { sidebar_width: 240, compact: false }, "Explorer", "Layout");
//!
//! let layout: Option<Layout> = store.load("Explorer", "Layout");
//! ```
//!
//! Failures never reach the caller of `save`/`load`: they are logged as
//! warnings through the `log` crate (or an injected [`log::Log`]).

pub mod codec;
pub mod config;
pub mod error;
pub mod key;
pub mod noncritical;
pub mod storage;
pub mod store;

#[cfg(test)]
mod test_support;

pub use codec::{MarkupCodec, XmlCodec};
pub use config::{StorageConfig, StorageConfigBuilder, StorageLocation};
pub use error::{Error, Result};
pub use key::StorageKey;
pub use noncritical::{execute_noncritical, GlobalLogger};
pub use storage::{DirectoryScope, DirectoryStorage, IsolatedStorage, StorageScope};
pub use store::PreferenceStore;
