//! Functional core of eventboard.
//!
//! Pure types and functions shared by the server and auth crates: event
//! records and their display formatting, form validation, grouping and
//! sorting, plus the repository and identity-provider interfaces that the
//! imperative shell implements.

pub mod auth;
pub mod events;
pub mod serde;
pub mod storage;
