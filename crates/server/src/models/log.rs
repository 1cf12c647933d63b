//! Activity log entries.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use ledgerdesk_core::LogEntryId;

/// One audit trail row.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct LogEntry {
    pub id: LogEntryId,
    pub username: Option<String>,
    pub action: Option<String>,
    pub details: Option<String>,
    #[serde(serialize_with = "sqlite_timestamp")]
    pub timestamp: Option<NaiveDateTime>,
}

/// Render timestamps the way SQLite's `CURRENT_TIMESTAMP` writes them.
fn sqlite_timestamp<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(ts) => serializer.collect_str(&ts.format("%Y-%m-%d %H:%M:%S")),
        None => serializer.serialize_none(),
    }
}
