//! Errors raised by the storage layer.
//!
//! "Not found" is never an error: lookups return `Ok(None)` and deletes return
//! `Ok(false)`. The variants here cover integrity problems only.

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A child record pointed at a parent that does not exist
    #[error("{entity} {id} does not exist")]
    MissingParent { entity: &'static str, id: String },

    /// A unique column (username, email, slug, ...) already holds this value
    #[error("{entity} conflicts with an existing record: {detail}")]
    Conflict { entity: &'static str, detail: String },

    /// The database handed back an id that is not canonical UUID text
    #[error("database produced a malformed {entity} id: {id:?}")]
    MalformedId { entity: &'static str, id: String },

    /// A stored column could not be decoded into its record type
    #[error("corrupt {column} value in {table}: {detail}")]
    CorruptValue {
        table: &'static str,
        column: &'static str,
        detail: String,
    },
}

impl StorageError {
    pub fn missing_parent(entity: &'static str, id: impl Into<String>) -> Self {
        StorageError::MissingParent {
            entity,
            id: id.into(),
        }
    }

    pub fn conflict(entity: &'static str, detail: impl Into<String>) -> Self {
        StorageError::Conflict {
            entity,
            detail: detail.into(),
        }
    }
}
