use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::{
    error::UsersDirectoryError,
    model::{Identity, User, UserSummary},
};

/// Public API of the users_directory module for in-process consumers.
///
/// Every call takes the caller identity explicitly; `None` means the request
/// was not authenticated.
#[async_trait]
pub trait UsersDirectoryApi: Send + Sync {
    /// Find or create the record for `identity` and sync its display name.
    async fn store_user(&self, identity: Option<&Identity>) -> Result<Uuid, UsersDirectoryError>;

    /// The caller's own record.
    async fn get_current_user(&self, identity: Option<&Identity>)
        -> Result<User, UsersDirectoryError>;

    /// Other users whose name matches `query`.
    async fn search_users(
        &self,
        identity: Option<&Identity>,
        query: &str,
        limit: Option<u32>,
    ) -> Result<Vec<UserSummary>, UsersDirectoryError>;
}
