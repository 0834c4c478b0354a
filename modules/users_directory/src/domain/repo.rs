use crate::contract::model::{NewUser, User};
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Outcome of a failed insert. `DuplicateToken` means another record already
/// owns the token identifier (unique index hit).
#[derive(Error, Debug)]
pub enum InsertError {
    #[error("token identifier already registered")]
    DuplicateToken,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
///
/// Implementations must enforce uniqueness of `token_identifier` and report
/// violations through [`InsertError::DuplicateToken`].
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Records carrying `token`. More than one entry means the store is corrupt.
    async fn find_all_by_token(&self, token: &str) -> anyhow::Result<Vec<User>>;
    /// Persist a new record; the store assigns id and creation time.
    async fn insert(&self, new_user: NewUser) -> Result<Uuid, InsertError>;
    /// Overwrite the display name of an existing record, nothing else.
    async fn patch_name(&self, id: Uuid, name: &str) -> anyhow::Result<()>;
    /// Text match on `name`, ranked by the store, at most `limit` rows.
    async fn search_by_name(&self, text: &str, limit: u64) -> anyhow::Result<Vec<User>>;
}
