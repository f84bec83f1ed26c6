/// Accepts a post-login return path only when it stays on this site.
///
/// The path must start with a single `/`, contain no control characters and
/// carry no embedded scheme.
///
/// ```
/// use eventboard_core::auth::safe_return_path;
///
/// assert_eq!(safe_return_path("/admin/events/new"), Some("/admin/events/new"));
/// assert_eq!(safe_return_path("//evil.com"), None);
/// assert_eq!(safe_return_path("https://evil.com"), None);
/// ```
pub fn safe_return_path(path: &str) -> Option<&str> {
    let stays_local = path.starts_with('/')
        && !path.starts_with("//")
        && !path.starts_with("/\\")
        && !path.contains("://");

    if stays_local && !path.chars().any(char::is_control) {
        Some(path)
    } else {
        None
    }
}

/// Minimum password length accepted by the login form.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Field messages for the login form. `None` means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginErrors {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginErrors {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

/// `local@domain.tld` with no whitespace and a single `@`.
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Checks the login form before any call to the identity provider.
pub fn validate_login(email: &str, password: &str) -> LoginErrors {
    let email = email.trim();
    let email_error = if email.is_empty() {
        Some("Email is required")
    } else if !looks_like_email(email) {
        Some("Please enter a valid email address")
    } else {
        None
    };

    let password_error = if password.is_empty() {
        Some("Password is required")
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        Some("Password must be at least 6 characters")
    } else {
        None
    };

    LoginErrors {
        email: email_error.map(str::to_string),
        password: password_error.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_admin_paths() {
        assert_eq!(safe_return_path("/admin"), Some("/admin"));
        assert_eq!(
            safe_return_path("/admin?sort=title&dir=asc"),
            Some("/admin?sort=title&dir=asc")
        );
    }

    #[test]
    fn rejects_relative_and_empty() {
        assert_eq!(safe_return_path("admin"), None);
        assert_eq!(safe_return_path(""), None);
    }

    #[test]
    fn rejects_other_hosts() {
        assert_eq!(safe_return_path("//evil.com/admin"), None);
        assert_eq!(safe_return_path("/\\evil.com"), None);
        assert_eq!(safe_return_path("/go?to=https://evil.com"), None);
        assert_eq!(safe_return_path("javascript:alert(1)"), None);
    }

    #[test]
    fn rejects_control_characters() {
        assert_eq!(safe_return_path("/admin\r\nSet-Cookie: x"), None);
        assert_eq!(safe_return_path("/admin\0"), None);
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = validate_login("  ", "");
        assert_eq!(errors.email.as_deref(), Some("Email is required"));
        assert_eq!(errors.password.as_deref(), Some("Password is required"));
    }

    #[test]
    fn login_rejects_malformed_email_and_short_password() {
        for email in ["admin", "admin@", "@example.com", "admin@example", "ad min@example.com", "a@b@c.com", "admin@.com"] {
            assert_eq!(
                validate_login(email, "secret").email.as_deref(),
                Some("Please enter a valid email address"),
                "{email}"
            );
        }
        assert_eq!(
            validate_login("admin@example.com", "12345").password.as_deref(),
            Some("Password must be at least 6 characters")
        );
    }

    #[test]
    fn login_accepts_well_formed_input() {
        assert!(validate_login(" admin@example.com ", "secret").is_empty());
    }
}
