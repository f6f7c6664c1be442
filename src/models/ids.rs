//! Identifier parsing.
//!
//! Every record has two identities: the internal auto-increment key used
//! by the store and a generated external id exposed to callers.

use uuid::Uuid;

use crate::{Error, Result};

/// Parse a caller-supplied external id.
///
/// `what` names the argument in the error message (e.g. "lumo_id").
pub fn parse_external_id(raw: &str, what: &str) -> Result<Uuid> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidIdentifier(format!("{} is required", what)));
    }
    Uuid::parse_str(trimmed)
        .map_err(|_| Error::InvalidIdentifier(format!("{} is not a valid id: {}", what, raw)))
}

/// Reference to a stored record by either of its identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRef {
    /// Internal store key
    Internal(i64),
    /// Public external id
    External(Uuid),
}

impl RecordRef {
    /// Resolve a get/delete argument.
    ///
    /// A base-10 integer addresses the internal key. Anything else must be
    /// an external id.
    pub fn parse(raw: &str, what: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidArgument(format!("{} is required", what)));
        }
        if let Ok(id) = trimmed.parse::<i64>() {
            return Ok(Self::Internal(id));
        }
        parse_external_id(trimmed, what).map(Self::External)
    }
}

impl std::fmt::Display for RecordRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal(id) => write!(f, "{}", id),
            Self::External(id) => write!(f, "{}", id),
        }
    }
}
