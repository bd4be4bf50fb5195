// src/key.rs
//! Record and metadata key types
//!
//! Keys carry an enumerated encoding tag alongside their raw string payload.
//! The legacy and text encodings serialize key content to the same UTF-8
//! bytes; the tag is the only difference, and rewriting it is what the
//! conversion pass does.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Wrapper encoding of a record's primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyEncoding {
    /// Obsolete modified-UTF-8 wrapper used by stores written before the
    /// text key format was introduced.
    LegacyUtf8,
    /// Current text wrapper.
    Text,
}

impl fmt::Display for KeyEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LegacyUtf8 => write!(f, "legacy-utf8"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Primary key of a record in a crawl database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordKey {
    pub encoding: KeyEncoding,
    pub value: String,
}

impl RecordKey {
    /// A key under the obsolete encoding.
    pub fn legacy(value: impl Into<String>) -> Self {
        Self {
            encoding: KeyEncoding::LegacyUtf8,
            value: value.into(),
        }
    }

    /// A key under the current text encoding.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            encoding: KeyEncoding::Text,
            value: value.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

// Keys order by value bytes so a converted store sorts identically to its
// source; the encoding tag is only a tiebreak.
impl Ord for RecordKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .as_bytes()
            .cmp(other.value.as_bytes())
            .then_with(|| self.encoding.cmp(&other.encoding))
    }
}

impl PartialOrd for RecordKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Encoding tag of a metadata sidecar key.
///
/// Metadata maps may contain keys written by other producers; anything that
/// is neither the legacy nor the text encoding is `Foreign` and conversion
/// preserves it verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetaKeyKind {
    LegacyUtf8,
    Text,
    Foreign,
}

/// A key in a record's metadata map.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MetaKey {
    pub kind: MetaKeyKind,
    pub name: String,
}

impl MetaKey {
    pub fn legacy(name: impl Into<String>) -> Self {
        Self {
            kind: MetaKeyKind::LegacyUtf8,
            name: name.into(),
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self {
            kind: MetaKeyKind::Text,
            name: name.into(),
        }
    }

    pub fn foreign(name: impl Into<String>) -> Self {
        Self {
            kind: MetaKeyKind::Foreign,
            name: name.into(),
        }
    }

    /// Rewrite a legacy-encoded key to the text encoding. Other kinds pass
    /// through unchanged; the name is never altered.
    pub fn into_text(self) -> Self {
        match self.kind {
            MetaKeyKind::LegacyUtf8 => Self {
                kind: MetaKeyKind::Text,
                name: self.name,
            },
            MetaKeyKind::Text | MetaKeyKind::Foreign => self,
        }
    }
}
