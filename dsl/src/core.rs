//! Identifier and source-location primitives shared across the AST.
use core::fmt;
use std::hash::{Hash, Hasher};

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

/// Implements identifiers declared by IEC 61131-3, 2.1.2.
///
/// 61131-3 declares that identifiers are case insensitive. `Id` keeps the
/// original spelling (for display and for round-tripping back to source)
/// while comparing and hashing on a lower-cased form, so that `Start`,
/// `START` and `start` name the same variable.
#[derive(Debug, Clone)]
pub struct Id {
    original: String,
    lower_case: String,
}

/// Serializes/deserializes as the bare original-spelling string rather
/// than `{original, lower_case}`, so a JSON-encoded AST reads like
/// ordinary source identifiers.
impl serde::Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.original)
    }
}

struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = Id;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an identifier string")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Id, E> {
        Ok(Id::from(value))
    }
}

impl<'de> serde::Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Id, D::Error> {
        deserializer.deserialize_str(IdVisitor)
    }
}

impl Id {
    pub fn from(name: &str) -> Self {
        Id {
            original: name.to_string(),
            lower_case: name.to_lowercase(),
        }
    }

    /// The identifier exactly as written in source.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// The case-normalized form used for lookups and equality.
    pub fn lower_case(&self) -> &str {
        &self.lower_case
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Id::from(name)
    }
}

impl From<String> for Id {
    fn from(name: String) -> Self {
        Id::from(name.as_str())
    }
}

impl PartialEq for Id {
    fn eq(&self, other: &Self) -> bool {
        self.lower_case == other.lower_case
    }
}
impl Eq for Id {}

impl Hash for Id {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lower_case.hash(state);
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}
