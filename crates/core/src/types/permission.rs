//! Capability sets attached to users.
//!
//! Permissions are persisted as JSON array text (`["all"]`). Reading is
//! lenient: a missing or malformed value yields an empty set rather than an
//! error, so a damaged row never locks its owner out of login.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Capability granting unrestricted access.
pub const WILDCARD_PERMISSION: &str = "all";

/// A set of capability tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    /// The unrestricted set (`["all"]`).
    #[must_use]
    pub fn wildcard() -> Self {
        Self(BTreeSet::from([WILDCARD_PERMISSION.to_owned()]))
    }

    /// Parse the stored text form, defaulting to empty.
    #[must_use]
    pub fn from_stored(raw: Option<&str>) -> Self {
        raw.and_then(|text| serde_json::from_str::<Vec<String>>(text).ok())
            .map(|tokens| tokens.into_iter().collect())
            .unwrap_or_default()
    }

    /// Text form written to the `permissions` column.
    #[must_use]
    pub fn to_stored(&self) -> String {
        // A set of strings always serializes.
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_owned())
    }

    /// Whether the set contains the wildcard capability.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.0.contains(WILDCARD_PERMISSION)
    }

    /// Number of distinct capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_stored_parses_json_array() {
        let set = PermissionSet::from_stored(Some(r#"["invoices","items","items"]"#));
        assert_eq!(set.len(), 2);
        assert!(!set.is_unrestricted());
    }

    #[test]
    fn test_from_stored_defaults_to_empty() {
        assert!(PermissionSet::from_stored(None).is_empty());
        assert!(PermissionSet::from_stored(Some("")).is_empty());
        assert!(PermissionSet::from_stored(Some("not json")).is_empty());
        assert!(PermissionSet::from_stored(Some(r#"{"all":true}"#)).is_empty());
    }

    #[test]
    fn test_wildcard_round_trip() {
        let set = PermissionSet::wildcard();
        assert!(set.is_unrestricted());
        assert_eq!(set.to_stored(), r#"["all"]"#);
        assert_eq!(PermissionSet::from_stored(Some(&set.to_stored())), set);
    }

    #[test]
    fn test_serializes_as_array() {
        let set: PermissionSet = ["reports".to_owned()].into_iter().collect();
        assert_eq!(serde_json::to_value(&set).unwrap(), serde_json::json!(["reports"]));
    }
}
