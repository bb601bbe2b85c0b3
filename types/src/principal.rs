//! Principal identity: the caller behind a report, a vote, or a settlement.

use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a reporter or voter.
///
/// Principals are opaque to the engine; two principals are the same iff their
/// textual forms are equal.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Create a principal from its textual form.
    pub fn new(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        if s.trim().is_empty() {
            return Err(TypesError::EmptyPrincipal);
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for PrincipalId {
    type Error = TypesError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}
