// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request payload validation.

use hwcatalog_common::{Display, Monitor};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::error::AppError;

const MAX_USERNAME_LENGTH: usize = 64;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit
const MAX_TEXT_FIELD_LENGTH: usize = 64;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Possible validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid display: {0}")]
    InvalidDisplay(String),

    #[error("Invalid monitor: {0}")]
    InvalidMonitor(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

/// Validate a username chosen at registration
pub fn validate_username(username: &str) -> ValidationResult<&str> {
    if username.is_empty() {
        return Err(ValidationError::InvalidUsername(
            "Username must not be empty".to_string(),
        ));
    }

    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::InvalidUsername(format!(
            "Username cannot exceed {MAX_USERNAME_LENGTH} characters"
        )));
    }

    if username.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::InvalidUsername(
            "Username must not contain whitespace or control characters".to_string(),
        ));
    }

    Ok(username)
}

/// Validate an email address
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    if email.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "Email address cannot be empty".to_string(),
        ));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(format!(
            "Email address cannot exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail(
            "Invalid email address format".to_string(),
        ));
    }

    Ok(email)
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn text_field(value: &str) -> bool {
    !value.trim().is_empty() && value.chars().count() <= MAX_TEXT_FIELD_LENGTH
}

/// Validate a display payload
pub fn validate_display(display: &Display) -> ValidationResult<&Display> {
    if !positive(display.diagonal) {
        return Err(ValidationError::InvalidDisplay(
            "Diagonal must be a positive number".to_string(),
        ));
    }

    if !text_field(&display.resolution) {
        return Err(ValidationError::InvalidDisplay(format!(
            "Resolution must be non-empty and at most {MAX_TEXT_FIELD_LENGTH} characters"
        )));
    }

    if !text_field(&display.type_matrix) {
        return Err(ValidationError::InvalidDisplay(format!(
            "Panel type must be non-empty and at most {MAX_TEXT_FIELD_LENGTH} characters"
        )));
    }

    Ok(display)
}

/// Validate a monitor payload; the display reference is checked by the store
pub fn validate_monitor(monitor: &Monitor) -> ValidationResult<&Monitor> {
    if !positive(monitor.voltage) {
        return Err(ValidationError::InvalidMonitor(
            "Voltage must be a positive number".to_string(),
        ));
    }

    if monitor.type_display_id < 1 {
        return Err(ValidationError::InvalidMonitor(
            "Display reference must be a positive id".to_string(),
        ));
    }

    Ok(monitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display() -> Display {
        Display {
            diagonal: 27.0,
            resolution: "2560x1440".to_string(),
            type_matrix: "IPS".to_string(),
            gsync: true,
        }
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("Алиса_99").is_ok());

        assert!(matches!(
            validate_username(""),
            Err(ValidationError::InvalidUsername(_))
        ));
        assert!(matches!(
            validate_username("al ice"),
            Err(ValidationError::InvalidUsername(_))
        ));
        assert!(matches!(
            validate_username("alice\n"),
            Err(ValidationError::InvalidUsername(_))
        ));
        assert!(validate_username(&"a".repeat(MAX_USERNAME_LENGTH)).is_ok());
        assert!(validate_username(&"a".repeat(MAX_USERNAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("user.name+tag@example.co.uk").is_ok());

        // no @
        assert!(matches!(
            validate_email("test.example.com"),
            Err(ValidationError::InvalidEmail(_))
        ));
        // no domain
        assert!(validate_email("test@").is_err());
        // no TLD
        assert!(validate_email("test@example").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_validate_display() {
        assert!(validate_display(&display()).is_ok());

        for diagonal in [0.0, -27.0, f64::NAN, f64::INFINITY] {
            let bad = Display { diagonal, ..display() };
            assert!(matches!(
                validate_display(&bad),
                Err(ValidationError::InvalidDisplay(_))
            ));
        }

        let blank = Display {
            resolution: "  ".to_string(),
            ..display()
        };
        assert!(validate_display(&blank).is_err());

        let no_panel = Display {
            type_matrix: String::new(),
            ..display()
        };
        assert!(validate_display(&no_panel).is_err());
    }

    #[test]
    fn test_validate_monitor() {
        let monitor = Monitor {
            voltage: 220.0,
            gsync_prem: true,
            curved: false,
            type_display_id: 1,
        };
        assert!(validate_monitor(&monitor).is_ok());

        let no_voltage = Monitor {
            voltage: 0.0,
            ..monitor.clone()
        };
        assert!(matches!(
            validate_monitor(&no_voltage),
            Err(ValidationError::InvalidMonitor(_))
        ));

        let bad_reference = Monitor {
            type_display_id: 0,
            ..monitor
        };
        assert!(validate_monitor(&bad_reference).is_err());
    }

    #[test]
    fn test_validation_error_is_invalid_input() {
        let err: AppError = validate_username("").unwrap_err().into();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
