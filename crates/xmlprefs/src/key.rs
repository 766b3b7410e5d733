//! Storage key derivation
//!
//! A settings set is identified by the provider that owns it and a name
//! chosen by that provider. Both are folded into a single file name of the
//! form `<provider_id>_<name>.xml`.

use std::fmt;

use crate::error::{Error, Result};

/// Joins the provider id and the settings name.
pub const SEPARATOR: char = '_';

/// File extension of every persisted record.
pub const EXTENSION: &str = ".xml";

/// Name of a single persisted record inside a storage scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Derive the key for `(provider_id, name)`.
    ///
    /// Components must be usable inside a single file name. A separator
    /// inside either component is accepted, so `("a_b", "c")` and
    /// `("a", "b_c")` map to the same key.
    pub fn new(provider_id: &str, name: &str) -> Result<Self> {
        validate_component(provider_id)?;
        validate_component(name)?;
        Ok(Self(label(provider_id, name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Unchecked key text, used for log messages even when validation fails.
pub(crate) fn label(provider_id: &str, name: &str) -> String {
    format!("{provider_id}{SEPARATOR}{name}{EXTENSION}")
}

fn validate_component(component: &str) -> Result<()> {
    let reason = if component.is_empty() {
        "must not be empty"
    } else if component == "." || component == ".." {
        "must not be a relative directory reference"
    } else if component.contains(&['/', '\\'][..]) {
        "must not contain a path separator"
    } else if component.contains('\0') {
        "must not contain NUL"
    } else {
        return Ok(());
    };

    Err(Error::InvalidKey {
        component: component.to_string(),
        reason,
    })
}
