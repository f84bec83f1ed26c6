mod error;
#[cfg(feature = "auth")]
mod functions;
mod traits;
mod types;
mod validation;

pub use error::IdentityError;
#[cfg(feature = "auth")]
pub use functions::{
    calculate_expiry, generate_refresh_token, generate_session_token, is_session_expired,
};
pub use traits::{IdentityProvider, Result};
pub use types::{AuthChange, AuthChangeKind, Session, SessionToken, User};
pub use validation::{safe_return_path, validate_login, LoginErrors, MIN_PASSWORD_LENGTH};
