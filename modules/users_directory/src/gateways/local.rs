use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::UsersDirectoryApi,
    error::UsersDirectoryError,
    model::{Identity, User, UserSummary},
};
use crate::domain::service::Service;

/// Local implementation of the UsersDirectoryApi trait that delegates to the domain service
pub struct UsersDirectoryLocalClient {
    service: Arc<Service>,
}

impl UsersDirectoryLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UsersDirectoryApi for UsersDirectoryLocalClient {
    async fn store_user(&self, identity: Option<&Identity>) -> Result<Uuid, UsersDirectoryError> {
        self.service.store_user(identity).await.map_err(Into::into)
    }

    async fn get_current_user(
        &self,
        identity: Option<&Identity>,
    ) -> Result<User, UsersDirectoryError> {
        self.service
            .get_current_user(identity)
            .await
            .map_err(Into::into)
    }

    async fn search_users(
        &self,
        identity: Option<&Identity>,
        query: &str,
        limit: Option<u32>,
    ) -> Result<Vec<UserSummary>, UsersDirectoryError> {
        self.service
            .search_users(identity, query, limit)
            .await
            .map_err(Into::into)
    }
}
