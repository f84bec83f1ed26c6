//! Storage backend implementations.
//!
//! Concrete implementations of [`EventRepository`](eventboard_core::storage::EventRepository),
//! selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): events live in process memory
//! - `sqlite`: SQLite database file via `rusqlite` and `tokio-rusqlite`
//! - `postgrest`: hosted PostgREST-compatible `events` table via `reqwest`
//!
//! These features are mutually exclusive.
//!
//! # Examples
//!
//! ```bash
//! cargo build -p eventboard --no-default-features --features sqlite
//! ```

#[cfg(all(feature = "sqlite", feature = "postgrest"))]
compile_error!(
    "Features 'sqlite' and 'postgrest' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(all(feature = "inmemory", any(feature = "sqlite", feature = "postgrest")))]
compile_error!(
    "Feature 'inmemory' cannot be combined with another storage backend. \
    Example: cargo build -p eventboard --no-default-features --features sqlite"
);

#[cfg(not(any(feature = "inmemory", feature = "sqlite", feature = "postgrest")))]
compile_error!("Must enable exactly one storage feature: 'inmemory', 'sqlite', or 'postgrest'");

#[cfg(any(test, feature = "inmemory"))]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgrest")]
pub mod postgrest;

#[cfg(any(test, feature = "inmemory"))]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;

#[cfg(feature = "postgrest")]
pub use postgrest::PostgrestRepository;
