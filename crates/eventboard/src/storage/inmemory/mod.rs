//! In-memory storage backend.
//!
//! Keeps every event in a `HashMap` wrapped in `Arc<RwLock<_>>`. Nothing is
//! persisted; the data is lost when the repository is dropped. This is the
//! default backend and the one used by the router tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use eventboard::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! ```

mod repository;

pub use repository::InMemoryRepository;
