use std::sync::Arc;

use axum::{
    extract::Query,
    http::Uri,
    response::Json,
    Extension,
};
use tracing::{debug, info};

use crate::api::rest::auth::MaybeIdentity;
use crate::api::rest::dto::{SearchUsersQuery, StoreUserResp, UserDto, UserSummaryDto};
use crate::api::rest::error::map_domain_error;
use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::domain::service::Service;

/// Find or create the caller's record and sync its display name
#[utoipa::path(
    post,
    path = "/users/store",
    tag = "users",
    operation_id = "users_directory.store_user",
    responses(
        (status = 200, description = "Id of the caller's record", body = StoreUserResp),
        (status = 401, description = "Not authenticated", body = Problem),
        (status = 422, description = "Identity lacks an email", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn store_user(
    Extension(svc): Extension<Arc<Service>>,
    MaybeIdentity(identity): MaybeIdentity,
    uri: Uri,
) -> Result<Json<StoreUserResp>, ProblemResponse> {
    info!("Reconciling caller identity");

    match svc.store_user(identity.as_ref()).await {
        Ok(id) => Ok(Json(StoreUserResp { id })),
        Err(e) => {
            debug!("Failed to store user: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get the caller's own record
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    operation_id = "users_directory.get_current_user",
    responses(
        (status = 200, description = "Caller's record", body = UserDto),
        (status = 401, description = "Not authenticated", body = Problem),
        (status = 404, description = "No record stored yet", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn get_current_user(
    Extension(svc): Extension<Arc<Service>>,
    MaybeIdentity(identity): MaybeIdentity,
    uri: Uri,
) -> Result<Json<UserDto>, ProblemResponse> {
    match svc.get_current_user(identity.as_ref()).await {
        Ok(user) => Ok(Json(UserDto::from(user))),
        Err(e) => {
            debug!("Failed to get current user: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Search other users by name
#[utoipa::path(
    get,
    path = "/users/search",
    tag = "users",
    operation_id = "users_directory.search_users",
    params(SearchUsersQuery),
    responses(
        (status = 200, description = "Matching users, caller excluded; empty when unauthenticated", body = [UserSummaryDto]),
        (status = 500, description = "Internal Server Error", body = Problem),
    )
)]
pub async fn search_users(
    Extension(svc): Extension<Arc<Service>>,
    MaybeIdentity(identity): MaybeIdentity,
    Query(query): Query<SearchUsersQuery>,
    uri: Uri,
) -> Result<Json<Vec<UserSummaryDto>>, ProblemResponse> {
    match svc
        .search_users(identity.as_ref(), &query.query, query.limit)
        .await
    {
        Ok(users) => Ok(Json(users.into_iter().map(UserSummaryDto::from).collect())),
        Err(e) => {
            debug!("Failed to search users: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
