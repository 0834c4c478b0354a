use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsersDirectoryError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Invalid identity: {message}")]
    InvalidIdentity { message: String },

    #[error("User not found")]
    NotFound,

    #[error("Internal error")]
    Internal,
}

impl UsersDirectoryError {
    pub fn invalid_identity(message: impl Into<String>) -> Self {
        Self::InvalidIdentity {
            message: message.into(),
        }
    }
}

impl From<crate::domain::error::DomainError> for UsersDirectoryError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            Unauthenticated => Self::Unauthenticated,
            InvalidIdentity { field, .. } => {
                Self::invalid_identity(format!("missing required field '{field}'"))
            }
            UserNotFound { .. } => Self::NotFound,
            DuplicateToken { .. } | Database { .. } => Self::Internal,
        }
    }
}
