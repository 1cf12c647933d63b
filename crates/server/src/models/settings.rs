//! Company profile singleton.

use serde::{Deserialize, Serialize};

use ledgerdesk_core::SettingsId;

/// The company settings row.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CompanySettings {
    pub id: SettingsId,
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Opaque logo reference (usually a data URL).
    pub logo: Option<String>,
    pub prevent_negative: Option<bool>,
}

/// Request body replacing the company settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "super::bool_or_int")]
    pub prevent_negative: Option<bool>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_prevent_negative_accepts_int_or_bool() {
        let a: SettingsInput = serde_json::from_str(r#"{"prevent_negative":1}"#).unwrap();
        let b: SettingsInput = serde_json::from_str(r#"{"prevent_negative":false}"#).unwrap();
        let c: SettingsInput = serde_json::from_str(r#"{"name":"Acme"}"#).unwrap();
        assert_eq!(a.prevent_negative, Some(true));
        assert_eq!(b.prevent_negative, Some(false));
        assert_eq!(c.prevent_negative, None);
    }
}
