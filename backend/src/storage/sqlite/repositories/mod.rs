//! Storage trait implementations for [`SqliteStorage`](super::SqliteStorage),
//! grouped by area.

mod community;
mod events;
mod people;
mod techfest;
