use axum::http::StatusCode;

use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::domain::error::DomainError;

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.example.com/{}", code))
        .with_code(code)
        .with_instance(instance);

    let problem = if let Some(id) = tracing::Span::current().id() {
        problem.with_trace_id(id.into_u64().to_string())
    } else {
        problem
    };

    ProblemResponse(problem)
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::Unauthenticated => from_parts(
            StatusCode::UNAUTHORIZED,
            "USERS_UNAUTHENTICATED",
            "Not authenticated",
            "A verified identity is required for this operation",
            instance,
        ),
        DomainError::InvalidIdentity { field, .. } => from_parts(
            StatusCode::UNPROCESSABLE_ENTITY,
            "USERS_INVALID_IDENTITY",
            "Invalid identity",
            format!("The verified identity has no '{}'", field),
            instance,
        ),
        DomainError::UserNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "USERS_NOT_FOUND",
            "User not found",
            "No user record exists for the current identity",
            instance,
        ),
        DomainError::DuplicateToken { .. } | DomainError::Database { .. } => {
            // Details stay in the logs
            tracing::error!(error = ?e, "Store error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
                instance,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        let cases = [
            (DomainError::unauthenticated(), 401, "USERS_UNAUTHENTICATED"),
            (DomainError::invalid_identity("t", "email"), 422, "USERS_INVALID_IDENTITY"),
            (DomainError::user_not_found("t"), 404, "USERS_NOT_FOUND"),
            (DomainError::duplicate_token("t", 2), 500, "INTERNAL_DB"),
            (DomainError::database("boom"), 500, "INTERNAL_DB"),
        ];
        for (err, status, code) in cases {
            let ProblemResponse(p) = map_domain_error(&err, "/users/me");
            assert_eq!(p.status, status);
            assert_eq!(p.code, code);
            assert_eq!(p.instance, "/users/me");
        }
    }

    #[test]
    fn store_details_are_not_exposed() {
        let ProblemResponse(p) = map_domain_error(&DomainError::database("secret dsn"), "/x");
        assert!(!p.detail.contains("secret"));
    }
}
