use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors for items.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Item not found: {id}")]
    ItemNotFound { id: Uuid },

    #[error("Title length {len} outside allowed range {min}..={max}")]
    TitleLength { len: usize, min: usize, max: usize },

    #[error("Description too long: {len} characters (max: {max})")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn item_not_found(id: Uuid) -> Self {
        Self::ItemNotFound { id }
    }

    pub fn title_length(len: usize) -> Self {
        Self::TitleLength {
            len,
            min: super::service::TITLE_MIN,
            max: super::service::TITLE_MAX,
        }
    }

    pub fn description_too_long(len: usize, max: usize) -> Self {
        Self::DescriptionTooLong { len, max }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
