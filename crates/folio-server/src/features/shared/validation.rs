//! Shared field validators
//!
//! Each validator returns a typed error that the feature-level error enums
//! wrap, so the HTTP layer can map everything to 400 with a clear message.

/// Validation errors for required text fields
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TextValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("{field} must be at most {max_length} characters")]
    TooLong {
        field: &'static str,
        max_length: usize,
    },
}

/// Require a non-blank value no longer than `max_length` characters.
pub fn validate_required_text(
    field: &'static str,
    value: &str,
    max_length: usize,
) -> Result<(), TextValidationError> {
    if value.trim().is_empty() {
        return Err(TextValidationError::Required { field });
    }
    if value.chars().count() > max_length {
        return Err(TextValidationError::TooLong { field, max_length });
    }
    Ok(())
}

/// Validation errors for email addresses
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum EmailValidationError {
    #[error("email is required")]
    Required,
    #[error("email is not a valid address")]
    InvalidFormat,
    #[error("email must be at most {max_length} characters")]
    TooLong { max_length: usize },
}

pub const MAX_EMAIL_LENGTH: usize = 255;

/// Minimal structural check: one `@`, non-empty local part, domain with a dot.
pub fn validate_email(value: &str) -> Result<(), EmailValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(EmailValidationError::Required);
    }
    if value.chars().count() > MAX_EMAIL_LENGTH {
        return Err(EmailValidationError::TooLong {
            max_length: MAX_EMAIL_LENGTH,
        });
    }

    let Some((local, domain)) = value.split_once('@') else {
        return Err(EmailValidationError::InvalidFormat);
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.contains('@') {
        return Err(EmailValidationError::InvalidFormat);
    }

    Ok(())
}

/// Validation errors for passwords
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PasswordValidationError {
    #[error("password is required")]
    Required,
    #[error("password must be at least {min_length} characters")]
    TooShort { min_length: usize },
    #[error("password confirmation does not match")]
    ConfirmationMismatch,
}

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub fn validate_password(
    password: &str,
    confirmation: &str,
) -> Result<(), PasswordValidationError> {
    if password.is_empty() {
        return Err(PasswordValidationError::Required);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordValidationError::TooShort {
            min_length: MIN_PASSWORD_LENGTH,
        });
    }
    if password != confirmation {
        return Err(PasswordValidationError::ConfirmationMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("title", "Dune", 255).is_ok());
        assert_eq!(
            validate_required_text("title", "   ", 255),
            Err(TextValidationError::Required { field: "title" })
        );
        assert_eq!(
            validate_required_text("title", &"x".repeat(256), 255),
            Err(TextValidationError::TooLong {
                field: "title",
                max_length: 255
            })
        );
    }

    #[test]
    fn test_email() {
        assert!(validate_email("reader@example.com").is_ok());
        assert_eq!(validate_email(""), Err(EmailValidationError::Required));
        assert_eq!(
            validate_email("no-at-sign"),
            Err(EmailValidationError::InvalidFormat)
        );
        assert_eq!(
            validate_email("user@nodot"),
            Err(EmailValidationError::InvalidFormat)
        );
        assert_eq!(
            validate_email("@example.com"),
            Err(EmailValidationError::InvalidFormat)
        );
    }

    #[test]
    fn test_password() {
        assert!(validate_password("correct horse", "correct horse").is_ok());
        assert_eq!(
            validate_password("", ""),
            Err(PasswordValidationError::Required)
        );
        assert_eq!(
            validate_password("pw", "pw"),
            Err(PasswordValidationError::TooShort { min_length: 6 })
        );
        assert_eq!(
            validate_password("correct horse", "wrong horse"),
            Err(PasswordValidationError::ConfirmationMismatch)
        );
    }
}
