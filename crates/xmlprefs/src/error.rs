use thiserror::Error;

/// Errors produced by the fallible storage operations.
///
/// The suppressing entry points on [`crate::PreferenceStore`] never return
/// these; they are logged and dropped instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] quick_xml::SeError),

    #[error("Failed to deserialize settings: {0}")]
    Deserialize(#[from] quick_xml::DeError),

    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Document declares a DTD; external entities are not resolved")]
    ExternalEntities,

    #[error("Invalid storage key component {component:?}: {reason}")]
    InvalidKey {
        component: String,
        reason: &'static str,
    },

    #[error("No per-user storage directory is available on this platform")]
    NoStorageRoot,
}

pub type Result<T> = std::result::Result<T, Error>;
