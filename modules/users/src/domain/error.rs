use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors for the user directory.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found: {id}")]
    UserNotFound { id: Uuid },

    #[error("User with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("Invalid email format: '{email}'")]
    InvalidEmail { email: String },

    #[error("Password length {len} outside allowed range {min}..={max}")]
    PasswordLength { len: usize, min: usize, max: usize },

    #[error("Full name too long: {len} characters (max: {max})")]
    FullNameTooLong { len: usize, max: usize },

    #[error("Failed to hash credentials")]
    Credential,

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn user_not_found(id: Uuid) -> Self {
        Self::UserNotFound { id }
    }

    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn invalid_email(email: impl Into<String>) -> Self {
        Self::InvalidEmail {
            email: email.into(),
        }
    }

    pub fn password_length(len: usize) -> Self {
        Self::PasswordLength {
            len,
            min: super::service::PASSWORD_MIN,
            max: super::service::PASSWORD_MAX,
        }
    }

    pub fn full_name_too_long(len: usize, max: usize) -> Self {
        Self::FullNameTooLong { len, max }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
