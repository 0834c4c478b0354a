//! Caller identity resolution for the REST surface.
//!
//! Verification happens upstream; whatever the provider returns is trusted.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderMap, HeaderName};

use crate::contract::model::Identity;

/// Source of the verified identity for a request.
pub trait AuthProvider: Send + Sync {
    /// `None` when the request carries no verified identity.
    fn current_identity(&self, headers: &HeaderMap) -> Option<Identity>;
}

/// Reads the identity from headers injected by a verifying gateway:
/// `<prefix>token-identifier`, `<prefix>name`, `<prefix>email`, `<prefix>picture-url`.
#[derive(Debug, Clone)]
pub struct TrustedHeaderAuth {
    token: HeaderName,
    name: HeaderName,
    email: HeaderName,
    picture_url: HeaderName,
}

impl TrustedHeaderAuth {
    pub fn new(prefix: &str) -> anyhow::Result<Self> {
        let header = |suffix: &str| -> anyhow::Result<HeaderName> {
            let raw = format!("{}{}", prefix.to_ascii_lowercase(), suffix);
            HeaderName::try_from(raw.as_str())
                .map_err(|e| anyhow::anyhow!("invalid identity header '{raw}': {e}"))
        };
        Ok(Self {
            token: header("token-identifier")?,
            name: header("name")?,
            email: header("email")?,
            picture_url: header("picture-url")?,
        })
    }

    pub fn token_header(&self) -> &HeaderName {
        &self.token
    }
}

/// Non-empty, trimmed, UTF-8 header value.
fn header_value(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

impl AuthProvider for TrustedHeaderAuth {
    fn current_identity(&self, headers: &HeaderMap) -> Option<Identity> {
        let token_identifier = header_value(headers, &self.token)?;
        Some(Identity {
            token_identifier,
            name: header_value(headers, &self.name),
            email: header_value(headers, &self.email),
            picture_url: header_value(headers, &self.picture_url),
        })
    }
}

/// Extractor yielding the caller identity, if any. Never rejects: operations
/// decide for themselves what a missing identity means.
///
/// Requires an `Extension<Arc<dyn AuthProvider>>`; without one every request
/// is treated as unauthenticated.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<Arc<dyn AuthProvider>>()
            .and_then(|auth| auth.current_identity(&parts.headers));
        Ok(Self(identity))
    }
}
