//! # Storage Module
//!
//! The storage contract and its two interchangeable backends.
//!
//! ## Components
//!
//! - **traits.rs** - one trait per entity family plus the [`Storage`] supertrait
//! - **memory.rs** - process-local map-backed backend
//! - **sqlite/** - relational backend on sqlx
//! - **seed.rs** - baseline records for a cold store
//! - **selector.rs** - picks the backend once at startup

use chrono::{DateTime, SubsecRound, Utc};

pub mod error;
pub mod memory;
pub mod seed;
pub mod selector;
pub mod sqlite;
pub mod traits;

#[cfg(test)]
pub(crate) mod contract_tests;

pub use error::StorageError;
pub use memory::MemoryStorage;
pub use seed::seed_storage;
pub use selector::select_storage;
pub use sqlite::SqliteStorage;
pub use traits::*;

/// Current time truncated to microseconds, the precision both backends persist
pub(crate) fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
