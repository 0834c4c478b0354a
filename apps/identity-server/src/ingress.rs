//! HTTP surface of the server: health, OpenAPI and the module routes behind
//! the global middleware stack.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::http::header;
use axum::response::{IntoResponse, Json};
use axum::{routing::get, Router};
use runtime::ServerConfig;
use serde_json::{json, Value};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use users_directory::api::rest::openapi::UsersDirectoryDoc;
use users_directory::UsersDirectory;
use utoipa::OpenApi;

use crate::request_id;

const BODY_LIMIT_BYTES: usize = 1024 * 1024;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Full application router. `users` must already be initialized.
pub fn build_router(server: &ServerConfig, users: &UsersDirectory) -> Result<Router> {
    // Built once, served as static JSON
    let openapi_value = Arc::new(serde_json::to_value(UsersDirectoryDoc::openapi())?);

    let mut router = Router::new().route("/health", get(health_check)).route(
        "/openapi.json",
        get({
            let v = openapi_value.clone();
            move || async move {
                let json = Json((*v).clone());
                ([(header::CACHE_CONTROL, "no-store")], json).into_response()
            }
        }),
    );
    router = users.register_rest(router)?;

    // Outermost to innermost:
    // PropagateRequestId -> SetRequestId -> Trace -> Timeout -> CORS -> BodyLimit
    let x_request_id = request_id::header();
    router = router.layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES));
    if server.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }
    if server.timeout_sec > 0 {
        router = router.layer(TimeoutLayer::new(Duration::from_secs(server.timeout_sec)));
    }
    router = router.layer(request_id::create_trace_layer());
    router = router.layer(SetRequestIdLayer::new(
        x_request_id.clone(),
        request_id::MakeReqId,
    ));
    router = router.layer(PropagateRequestIdLayer::new(x_request_id));

    Ok(router)
}

/// Bind and serve until a termination signal arrives.
pub async fn serve(server: &ServerConfig, router: Router) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address '{}:{}': {}", server.host, server.port, e))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server bound on {}", addr);

    let shutdown = async {
        if let Err(e) = runtime::shutdown::wait_for_shutdown().await {
            tracing::error!("Shutdown signal handler failed: {e:#}");
        }
        tracing::info!("HTTP server shutting down gracefully");
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use tracing_test::traced_test;
    use users_directory::config::UsersDirectoryConfig;

    async fn test_router() -> Router {
        let db = crate::connect_db(crate::MEMORY_DSN, None).await.unwrap();
        let users = UsersDirectory::new();
        users.migrate(&db).await.unwrap();
        users.init(db, &UsersDirectoryConfig::default()).unwrap();
        build_router(&ServerConfig::default(), &users).unwrap()
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_sets_request_id() {
        let router = test_router().await;
        let resp = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));
        assert_eq!(body_json(resp).await["status"], "healthy");
    }

    #[tokio::test]
    async fn client_request_id_is_propagated() {
        let router = test_router().await;
        let resp = router
            .oneshot(
                Request::get("/health")
                    .header("x-request-id", "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.headers()["x-request-id"], "req-123");
    }

    #[tokio::test]
    #[traced_test]
    async fn request_span_records_id_status_and_latency() {
        let router = test_router().await;
        let resp = router
            .oneshot(
                Request::get("/users/me")
                    .header("x-request-id", "req-456")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        assert!(logs_contain("finished processing request"));
        assert!(logs_contain("request_id=req-456"));
        assert!(logs_contain("status=401"));
        assert!(logs_contain("latency_ms="));
    }

    #[tokio::test]
    async fn openapi_lists_user_routes() {
        let router = test_router().await;
        let resp = router
            .oneshot(Request::get("/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let doc = body_json(resp).await;
        assert!(doc["paths"]["/users/search"].is_object());
    }

    #[tokio::test]
    async fn store_and_search_over_sqlite() {
        let router = test_router().await;
        for (token, name) in [("t-alice", "Alice"), ("t-alicia", "Alicia")] {
            let resp = router
                .clone()
                .oneshot(
                    Request::post("/users/store")
                        .header("x-auth-token-identifier", token)
                        .header("x-auth-name", name)
                        .header("x-auth-email", format!("{token}@x.com"))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let resp = router
            .oneshot(
                Request::get("/users/search?query=ali")
                    .header("x-auth-token-identifier", "t-alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let hits = body_json(resp).await;
        assert_eq!(hits.as_array().unwrap().len(), 1);
        assert_eq!(hits[0]["name"], "Alicia");
    }
}
