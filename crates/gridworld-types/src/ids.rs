//! Participant identifiers.
//!
//! A [`UserId`] is assigned once when an account or session is created and
//! is never reused. The store treats it as an opaque string: it is embedded
//! verbatim into backend keys and used as the map key of
//! [`Snapshot::scene_by_id`](crate::snapshot::Snapshot::scene_by_id).

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Opaque, stable identifier of one participant in the shared world.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UserId(pub String);

impl UserId {
    /// Wrap an existing identifier issued by the session layer.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh identifier (`u_` followed by a time-ordered UUID v7).
    pub fn generate() -> Self {
        Self(format!("u_{}", Uuid::now_v7().simple()))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = UserId::generate();
        let b = UserId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("u_"));
    }

    #[test]
    fn serializes_as_bare_string() {
        let id = UserId::from("u_123");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"u_123\""));
    }

    #[test]
    fn display_matches_inner() {
        let id = UserId::new("u_456");
        assert_eq!(id.to_string(), "u_456");
    }
}
