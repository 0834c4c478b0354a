use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::api::rest::auth::AuthProvider;
use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Mount the users routes onto `router`. The service and auth provider are
/// scoped to these routes only.
pub fn register_routes(
    router: Router,
    service: Arc<Service>,
    auth: Arc<dyn AuthProvider>,
) -> Router {
    let users = Router::new()
        // POST /users/store - reconcile the caller's identity
        .route("/users/store", post(handlers::store_user))
        // GET /users/me - the caller's own record
        .route("/users/me", get(handlers::get_current_user))
        // GET /users/search?query=..&limit=.. - directory search
        .route("/users/search", get(handlers::search_users))
        .layer(Extension(service))
        .layer(Extension(auth));

    router.merge(users)
}
