//! Authentication for eventboard.
//!
//! This crate provides:
//! - A session façade over a pluggable identity provider, with session-change notifications
//! - A session mirror kept in sync by those notifications
//! - In-memory and hosted (GoTrue, feature `gotrue`) identity providers
//! - Axum extractors and JSON routes for authentication

mod config;
mod error;
mod extractors;
mod facade;
mod handlers;
mod mirror;
mod providers;
mod state;

pub use config::{AdminAccount, AuthConfig, HostedIdentityConfig};
pub use error::{AuthError, AuthOperation};
pub use extractors::{session_token_from_headers, CurrentUser, OptionalUser};
pub use facade::{SessionFacade, Subscription};
pub use handlers::{auth_routes, removal_cookie, session_cookie, LoginRequest, SessionResponse};
pub use mirror::SessionMirror;
#[cfg(feature = "gotrue")]
pub use providers::GoTrueProvider;
pub use providers::MemoryIdentityProvider;
pub use state::AuthState;
