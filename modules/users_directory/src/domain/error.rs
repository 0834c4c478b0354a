use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Caller is not authenticated")]
    Unauthenticated,

    #[error("Identity '{token_identifier}' lacks required field '{field}'")]
    InvalidIdentity {
        token_identifier: String,
        field: &'static str,
    },

    #[error("No user record for identity '{token_identifier}'")]
    UserNotFound { token_identifier: String },

    #[error("{count} user records share identity '{token_identifier}'")]
    DuplicateToken {
        token_identifier: String,
        count: usize,
    },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn unauthenticated() -> Self {
        Self::Unauthenticated
    }

    pub fn invalid_identity(token_identifier: impl Into<String>, field: &'static str) -> Self {
        Self::InvalidIdentity {
            token_identifier: token_identifier.into(),
            field,
        }
    }

    pub fn user_not_found(token_identifier: impl Into<String>) -> Self {
        Self::UserNotFound {
            token_identifier: token_identifier.into(),
        }
    }

    pub fn duplicate_token(token_identifier: impl Into<String>, count: usize) -> Self {
        Self::DuplicateToken {
            token_identifier: token_identifier.into(),
            count,
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
