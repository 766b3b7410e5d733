//! Markup serialization capability
//!
//! The store only needs to turn a value into bytes and back. [`XmlCodec`]
//! does this through serde and `quick-xml`: the root element carries the
//! Rust type name and every field becomes a child element.
//!
//! Values without a type name of their own (sequences, maps, primitives)
//! are written under a root element named after the last path segment of
//! the type, e.g. `<Vec>` or `<u32>`.
//!
//! XML has no way to tell an absent element from an empty one, so two field
//! shapes need serde attributes to survive a save/load cycle:
//!
//! ```
//! # use serde::{Deserialize, Serialize};
//! #[derive(Serialize, Deserialize)]
//! struct Recent {
//!     // `None` would otherwise be written as `<limit/>` and read back as "".
//!     #[serde(default, skip_serializing_if = "Option::is_none")]
//!     limit: Option<u32>,
//!     // An empty list writes no element at all.
//!     #[serde(default)]
//!     files: Vec<String>,
//! }
//! ```

use std::any::type_name;
use std::io::{Read, Write};

use quick_xml::events::Event;
use quick_xml::se::Serializer;
use quick_xml::{Reader, SeError};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

const DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Object-to-markup serializer supplied to a [`crate::PreferenceStore`].
///
/// `encode` may write partial output before failing; the store encodes into
/// memory first so a failure never reaches the stored record.
pub trait MarkupCodec {
    fn encode<T>(&self, value: &T, out: &mut dyn Write) -> Result<()>
    where
        T: Serialize + ?Sized;

    fn decode<T>(&self, input: &mut dyn Read) -> Result<T>
    where
        T: DeserializeOwned;
}

/// XML codec backed by `quick-xml`'s serde support.
///
/// See the [module docs](self) for the serde attributes that `Option` and
/// `Vec` fields need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlCodec {
    indent: usize,
}

impl XmlCodec {
    /// Codec that writes one element per line, indented by `indent` spaces.
    /// An indent of zero writes everything on one line.
    pub fn with_indent(indent: usize) -> Self {
        Self { indent }
    }

    fn serialize_body<T>(&self, value: &T, root: Option<&str>) -> Result<String>
    where
        T: Serialize + ?Sized,
    {
        let mut body = String::new();
        let mut serializer = match root {
            Some(root) => Serializer::with_root(&mut body, Some(root))?,
            None => Serializer::new(&mut body),
        };
        if self.indent > 0 {
            serializer.indent(' ', self.indent);
        }
        value.serialize(serializer)?;
        Ok(body)
    }
}

impl Default for XmlCodec {
    fn default() -> Self {
        Self::with_indent(2)
    }
}

impl MarkupCodec for XmlCodec {
    fn encode<T>(&self, value: &T, out: &mut dyn Write) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let body = match self.serialize_body(value, None) {
            // No struct or enum name to use as the root tag.
            Err(Error::Serialize(SeError::Unsupported(_))) => {
                self.serialize_body(value, Some(&root_name::<T>()))?
            }
            other => other?,
        };

        out.write_all(DECLARATION.as_bytes())?;
        out.write_all(b"\n")?;
        out.write_all(body.as_bytes())?;
        Ok(())
    }

    fn decode<T>(&self, input: &mut dyn Read) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut text = String::new();
        input.read_to_string(&mut text)?;

        reject_doctype(&text)?;
        Ok(quick_xml::de::from_str(&text)?)
    }
}

/// Root tag for values that serde gives no name, from the Rust type name
/// with module path and generic arguments stripped.
fn root_name<T: ?Sized>() -> String {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    let last = base.rsplit("::").next().unwrap_or(base);
    let usable = last.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
        && last.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if usable {
        last.to_string()
    } else {
        "value".to_string()
    }
}

/// Fail on any DOCTYPE so that no entity or external resource declared in
/// a DTD can ever be expanded.
fn reject_doctype(text: &str) -> Result<()> {
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event()? {
            Event::DocType(_) => return Err(Error::ExternalEntities),
            Event::Eof => return Ok(()),
            _ => {}
        }
    }
}
