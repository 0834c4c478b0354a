use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::contract::model::{User, UserSummary};

/// The caller's own user record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub token_identifier: String,
    pub email: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Directory search hit; never exposes the token identifier
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSummaryDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
}

/// Result of reconciling the caller's identity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoreUserResp {
    pub id: Uuid,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchUsersQuery {
    /// Name text to match; fewer than two characters yields no results
    #[serde(default)]
    pub query: String,
    /// Maximum number of results, clamped to the configured bounds
    pub limit: Option<u32>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            token_identifier: user.token_identifier,
            email: user.email,
            image_url: user.image_url,
            created_at: user.created_at,
        }
    }
}

impl From<UserSummary> for UserSummaryDto {
    fn from(u: UserSummary) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            image_url: u.image_url,
        }
    }
}
