use utoipa::OpenApi;

use crate::api::rest::dto::{StoreUserResp, UserDto, UserSummaryDto};
use crate::api::rest::handlers;
use crate::api::rest::problem::Problem;

/// OpenAPI document for the users_directory REST surface.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::store_user,
        handlers::get_current_user,
        handlers::search_users
    ),
    components(schemas(UserDto, UserSummaryDto, StoreUserResp, Problem)),
    tags((name = "users", description = "Identity reconciliation and user directory"))
)]
pub struct UsersDirectoryDoc;
