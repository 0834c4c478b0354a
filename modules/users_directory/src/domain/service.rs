use std::sync::Arc;

use crate::contract::model::{Identity, NewUser, User, UserSummary};
use crate::domain::error::DomainError;
use crate::domain::identity::{derive_display_name, required_email};
use crate::domain::repo::{InsertError, UsersRepository};
use tracing::{debug, field::Empty, info, instrument, warn, Span};
use uuid::Uuid;

/// Domain service: identity reconciliation, current-user lookup and
/// directory search. Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Queries shorter than this (in characters, after trimming) return nothing.
    pub min_query_len: usize,
    pub default_search_limit: u32,
    pub max_search_limit: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            min_query_len: 2,
            default_search_limit: 20,
            max_search_limit: 100,
        }
    }
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(repo: Arc<dyn UsersRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    /// Find or create the record for `identity` and bring its display name in
    /// line with the identity. At most one write per call.
    ///
    /// Concurrent first logins for one token are resolved by the store's unique
    /// index: the losing insert re-reads the winner's record and syncs it.
    #[instrument(
        name = "users_directory.service.store_user",
        skip_all,
        fields(token = Empty)
    )]
    pub async fn store_user(&self, identity: Option<&Identity>) -> Result<Uuid, DomainError> {
        let identity = identity.ok_or_else(DomainError::unauthenticated)?;
        Span::current().record("token", identity.token_identifier.as_str());

        let derived_name = derive_display_name(identity);

        if let Some(existing) = self.find_unique_by_token(&identity.token_identifier).await? {
            return self.sync_name(existing, &derived_name).await;
        }

        let email = required_email(identity).ok_or_else(|| {
            DomainError::invalid_identity(identity.token_identifier.clone(), "email")
        })?;

        let new_user = NewUser {
            name: derived_name.clone(),
            token_identifier: identity.token_identifier.clone(),
            email: email.to_owned(),
            image_url: identity.picture_url.clone(),
        };

        match self.repo.insert(new_user).await {
            Ok(id) => {
                info!(user_id = %id, "Created user");
                Ok(id)
            }
            Err(InsertError::DuplicateToken) => {
                debug!("Lost first-login race, re-reading existing record");
                let existing = self
                    .find_unique_by_token(&identity.token_identifier)
                    .await?
                    .ok_or_else(|| {
                        DomainError::database("record vanished after duplicate token conflict")
                    })?;
                self.sync_name(existing, &derived_name).await
            }
            Err(InsertError::Other(e)) => Err(DomainError::database(format!("{e:#}"))),
        }
    }

    /// The caller's own record.
    #[instrument(
        name = "users_directory.service.get_current_user",
        skip_all,
        fields(token = Empty)
    )]
    pub async fn get_current_user(&self, identity: Option<&Identity>) -> Result<User, DomainError> {
        let identity = identity.ok_or_else(DomainError::unauthenticated)?;
        Span::current().record("token", identity.token_identifier.as_str());

        let matches = self.lookup(&identity.token_identifier).await?;
        if matches.len() > 1 {
            warn!(count = matches.len(), "Multiple records share one token");
        }

        matches
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::user_not_found(identity.token_identifier.clone()))
    }

    /// Users other than the caller whose name matches `query`.
    ///
    /// Unauthenticated callers and too-short queries get an empty result rather
    /// than an error. `limit` is clamped to the configured bounds.
    #[instrument(
        name = "users_directory.service.search_users",
        skip(self, identity),
        fields(authenticated = identity.is_some())
    )]
    pub async fn search_users(
        &self,
        identity: Option<&Identity>,
        query: &str,
        limit: Option<u32>,
    ) -> Result<Vec<UserSummary>, DomainError> {
        let Some(caller) = identity else {
            debug!("Search without identity, returning no results");
            return Ok(Vec::new());
        };

        let query = query.trim();
        if query.chars().count() < self.config.min_query_len {
            debug!("Query below minimum length, returning no results");
            return Ok(Vec::new());
        }

        let limit = self.effective_limit(limit);
        // One extra row so dropping the caller still leaves a full page.
        let found = self
            .repo
            .search_by_name(query, u64::from(limit) + 1)
            .await
            .map_err(|e| DomainError::database(format!("{e:#}")))?;

        let results: Vec<UserSummary> = found
            .into_iter()
            .filter(|u| u.token_identifier != caller.token_identifier)
            .take(limit as usize)
            .map(UserSummary::from)
            .collect();

        debug!(count = results.len(), "Search completed");
        Ok(results)
    }

    // --- helpers ---

    fn effective_limit(&self, requested: Option<u32>) -> u32 {
        let max = self.config.max_search_limit.max(1);
        requested
            .unwrap_or(self.config.default_search_limit)
            .clamp(1, max)
    }

    async fn lookup(&self, token: &str) -> Result<Vec<User>, DomainError> {
        self.repo
            .find_all_by_token(token)
            .await
            .map_err(|e| DomainError::database(format!("{e:#}")))
    }

    /// Lookup that refuses to pick between several records for one token.
    async fn find_unique_by_token(&self, token: &str) -> Result<Option<User>, DomainError> {
        let mut matches = self.lookup(token).await?;
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(DomainError::duplicate_token(token, n)),
        }
    }

    async fn sync_name(&self, existing: User, derived_name: &str) -> Result<Uuid, DomainError> {
        if existing.name == derived_name {
            debug!(user_id = %existing.id, "Display name unchanged");
            return Ok(existing.id);
        }

        self.repo
            .patch_name(existing.id, derived_name)
            .await
            .map_err(|e| DomainError::database(format!("{e:#}")))?;

        info!(user_id = %existing.id, "Updated display name");
        Ok(existing.id)
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}
