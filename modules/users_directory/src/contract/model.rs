use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Local user record, one per external identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub token_identifier: String,
    pub email: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Caller identity as asserted by the upstream auth layer. Already verified;
/// never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub token_identifier: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture_url: Option<String>,
}

impl Identity {
    pub fn new(token_identifier: impl Into<String>) -> Self {
        Self {
            token_identifier: token_identifier.into(),
            name: None,
            email: None,
            picture_url: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_picture_url(mut self, url: impl Into<String>) -> Self {
        self.picture_url = Some(url.into());
        self
    }
}

/// Fields for a record the store has not assigned an id to yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub token_identifier: String,
    pub email: String,
    pub image_url: Option<String>,
}

/// Directory search hit. Carries no token identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            image_url: user.image_url,
        }
    }
}
