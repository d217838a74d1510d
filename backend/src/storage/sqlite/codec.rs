//! Conversions between record fields and SQLite column values.
//!
//! Timestamps are stored as fixed-width RFC 3339 text (UTC, microseconds) so
//! string comparison in SQL agrees with chronological order. List and map
//! fields are stored as JSON text.

use anyhow::Result;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::is_canonical_uuid;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;
use tracing::warn;

use crate::storage::error::StorageError;
use crate::storage::timestamp_now;

pub fn encode_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_timestamp(row: &SqliteRow, table: &'static str, column: &'static str) -> Result<DateTime<Utc>> {
    let raw: String = row.try_get(column)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|e| {
            StorageError::CorruptValue {
                table,
                column,
                detail: format!("{:?}: {}", raw, e),
            }
            .into()
        })
}

/// Event dates that fail to parse are replaced with a date one week out
/// instead of failing the whole read.
pub fn decode_event_date(row: &SqliteRow) -> Result<DateTime<Utc>> {
    let raw: String = row.try_get("date")?;
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(date) => Ok(date.with_timezone(&Utc)),
        Err(e) => {
            let id: String = row.try_get("id")?;
            warn!("Event {} has unreadable date {:?} ({}), substituting now + 7 days", id, raw, e);
            Ok(timestamp_now() + Duration::days(7))
        }
    }
}

pub fn encode_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

pub fn decode_json<T: DeserializeOwned>(row: &SqliteRow, table: &'static str, column: &'static str) -> Result<T> {
    let raw: String = row.try_get(column)?;
    serde_json::from_str(&raw).map_err(|e| {
        StorageError::CorruptValue {
            table,
            column,
            detail: e.to_string(),
        }
        .into()
    })
}

/// Parse a text column holding a status or role name
pub fn decode_enum<T>(row: &SqliteRow, table: &'static str, column: &'static str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: String = row.try_get(column)?;
    raw.parse::<T>().map_err(|e| {
        StorageError::CorruptValue {
            table,
            column,
            detail: e.to_string(),
        }
        .into()
    })
}

/// Reject a database-generated id that is not canonical UUID text
pub fn check_generated_id(entity: &'static str, id: String) -> Result<String> {
    if is_canonical_uuid(&id) {
        Ok(id)
    } else {
        Err(StorageError::MalformedId { entity, id }.into())
    }
}

/// Turn a unique-constraint failure into [`StorageError::Conflict`]
pub fn map_unique_violation(err: sqlx::Error, entity: &'static str, detail: impl Into<String>) -> anyhow::Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StorageError::conflict(entity, detail).into();
        }
    }
    err.into()
}

/// Turn a foreign-key failure into [`StorageError::MissingParent`]
pub fn map_foreign_key_violation(err: sqlx::Error, parent: &'static str, parent_id: &str) -> anyhow::Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return StorageError::missing_parent(parent, parent_id).into();
        }
    }
    err.into()
}
