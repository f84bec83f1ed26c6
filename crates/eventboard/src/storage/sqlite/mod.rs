//! SQLite storage backend.
//!
//! Implements [`EventRepository`](eventboard_core::storage::EventRepository)
//! with `rusqlite` for the synchronous work and `tokio-rusqlite` to run it off
//! the async executor. The table layout matches the hosted `events` table, so
//! the packed time range and flag strings are stored unchanged.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
