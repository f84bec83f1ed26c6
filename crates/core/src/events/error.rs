use thiserror::Error;

/// Errors produced while parsing display strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Invalid time: {0}")]
    InvalidTime(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_display() {
        assert_eq!(
            FormatError::InvalidTime("25:00".to_string()).to_string(),
            "Invalid time: 25:00"
        );
        assert_eq!(
            FormatError::InvalidDate("2024-02-30".to_string()).to_string(),
            "Invalid date: 2024-02-30"
        );
    }
}
