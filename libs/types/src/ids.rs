//! Identifier types for simulated market entities
//!
//! Coin identifiers are lower-case slugs (`bitcoin`, `crypto-17`) that are
//! assigned once at seeding time and never change afterwards.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique identifier for a simulated coin
///
/// Serialized transparently as a JSON string so the wire field stays `"id"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoinId(String);

impl CoinId {
    /// Create from any string-like slug
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the slug
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier used for a synthetic coin with the given ordinal
    pub fn synthetic(index: usize) -> Self {
        Self(format!("crypto-{}", index))
    }
}

impl fmt::Display for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CoinId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CoinId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for CoinId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
