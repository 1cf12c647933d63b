//! Domain models for the server.
//!
//! Row types returned by repositories are serialized straight to JSON; input
//! types accept the field names the front-end sends (`desc`, `tax`, `service`).

pub mod customer;
pub mod dashboard;
pub mod document;
pub mod item;
pub mod log;
pub mod session;
pub mod settings;
pub mod user;

pub use customer::{Customer, NewCustomer};
pub use dashboard::{DashboardSummary, MonthlyTotal};
pub use document::{DocumentDetail, DocumentHeader, LineItem, NewDocument, NewLineItem};
pub use item::{Item, ItemInput, ItemUpdate};
pub use log::LogEntry;
pub use session::{CurrentUser, keys as session_keys};
pub use settings::{CompanySettings, SettingsInput};
pub use user::{NewUser, User};

use serde::{Deserialize, Deserializer};

/// Deserialize an optional flag sent either as a JSON boolean or as `0`/`1`.
pub(crate) fn bool_or_int<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        None => None,
        Some(Flag::Bool(b)) => Some(b),
        Some(Flag::Int(n)) => Some(n != 0),
        Some(Flag::Text(s)) => Some(matches!(s.as_str(), "1" | "true" | "on")),
    })
}

/// Accept an id as a number, a numeric string, or an empty value.
///
/// Form selects post `""` for "no customer"; zero is treated the same way.
pub(crate) fn lenient_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<i64>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(i64),
        Text(String),
    }

    let raw = Option::<RawId>::deserialize(deserializer)?;
    let id = match raw {
        None => None,
        Some(RawId::Int(n)) => Some(n),
        Some(RawId::Text(s)) if s.trim().is_empty() => None,
        Some(RawId::Text(s)) => Some(s.trim().parse::<i64>().map_err(serde::de::Error::custom)?),
    };
    Ok(id.filter(|n| *n > 0).map(T::from))
}
