use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a catalog offer (e.g. `"protection-plan"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(String);

impl OfferId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OfferId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for OfferId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for OfferId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for OfferId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
