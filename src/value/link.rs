//! Embedded sub-document records
//!
//! A [`Link`] is what remains of a persistence layer once it is stored as a
//! value inside another document: the open handle and the outer path are
//! dropped, the backing name and format are kept. Without a backing name
//! the document itself travels inside the link.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{Map, Value};
use crate::codec::Format;

/// Serializable reference to a sub-document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Backing file of the sub-document, reopened on demand
    pub name: Option<PathBuf>,
    /// Format used to read the backing file
    pub format: Format,
    /// Inline document, present only when there is no backing file
    pub document: Option<Box<Value>>,
}

impl Link {
    /// Link to a file-backed sub-document
    pub fn to_file(name: impl Into<PathBuf>, format: Format) -> Self {
        Self {
            name: Some(name.into()),
            format,
            document: None,
        }
    }

    /// Link carrying its document inline
    pub fn inline(document: Value, format: Format) -> Self {
        Self {
            name: None,
            format,
            document: Some(Box::new(document)),
        }
    }

    /// Mapping form used by the text and JSON codecs
    pub fn to_map(&self) -> Map {
        let mut map = Map::new();
        if let Some(ref name) = self.name {
            map.insert(
                "name".to_string(),
                Value::Str(name.to_string_lossy().into_owned()),
            );
        }
        map.insert(
            "format".to_string(),
            Value::Str(self.format.name().to_string()),
        );
        if let Some(ref document) = self.document {
            map.insert("document".to_string(), (**document).clone());
        }
        map
    }

    /// Inverse of [`Link::to_map`]; `None` if the mapping is malformed
    pub fn from_map(map: &Map) -> Option<Self> {
        let format = map.get("format")?.as_str()?.parse().ok()?;
        let name = match map.get("name") {
            None | Some(Value::Null) => None,
            Some(Value::Str(s)) => Some(PathBuf::from(s)),
            Some(_) => return None,
        };
        let document = map.get("document").cloned().map(Box::new);
        if name.is_none() && document.is_none() {
            return None;
        }
        Some(Self {
            name,
            format,
            document,
        })
    }
}
