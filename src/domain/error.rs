use thiserror::Error;

/// Failures surfaced by services and repositories.
///
/// A missing record is not an error: lookups return `Option` and the HTTP
/// boundary decides what absence means.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Persistence(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<validator::ValidationErrors> for DomainError {
    fn from(err: validator::ValidationErrors) -> Self {
        DomainError::Validation(err.to_string())
    }
}
