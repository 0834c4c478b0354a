#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use users_directory::contract::model::{Identity, NewUser, User};
use users_directory::domain::repo::{InsertError, UsersRepository};
use users_directory::domain::service::{Service, ServiceConfig};

/// In-memory store with the same uniqueness guarantee as the real one.
#[derive(Default)]
pub struct InMemoryUsersRepository {
    rows: Mutex<Vec<User>>,
    writes: AtomicUsize,
    stale_lookups: AtomicUsize,
}

impl InMemoryUsersRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Writes (inserts and renames) that reached the store.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn rows(&self) -> Vec<User> {
        self.rows.lock().clone()
    }

    /// Put a row in directly, bypassing the uniqueness check.
    pub fn seed(&self, name: &str, token: &str, email: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.rows.lock().push(User {
            id,
            name: name.to_owned(),
            token_identifier: token.to_owned(),
            email: email.to_owned(),
            image_url: None,
            created_at: Utc::now(),
        });
        id
    }

    /// The next `n` token lookups see an empty store, as if another writer
    /// committed right after the read.
    pub fn serve_stale_lookups(&self, n: usize) {
        self.stale_lookups.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl UsersRepository for InMemoryUsersRepository {
    async fn find_all_by_token(&self, token: &str) -> anyhow::Result<Vec<User>> {
        let stale = self
            .stale_lookups
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if stale {
            return Ok(Vec::new());
        }
        tokio::task::yield_now().await;
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|u| u.token_identifier == token)
            .cloned()
            .collect())
    }

    async fn insert(&self, new_user: NewUser) -> Result<Uuid, InsertError> {
        tokio::task::yield_now().await;
        let mut rows = self.rows.lock();
        if rows
            .iter()
            .any(|u| u.token_identifier == new_user.token_identifier)
        {
            return Err(InsertError::DuplicateToken);
        }
        let id = Uuid::new_v4();
        rows.push(User {
            id,
            name: new_user.name,
            token_identifier: new_user.token_identifier,
            email: new_user.email,
            image_url: new_user.image_url,
            created_at: Utc::now(),
        });
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    async fn patch_name(&self, id: Uuid, name: &str) -> anyhow::Result<()> {
        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| anyhow::anyhow!("user {id} not found"))?;
        row.name = name.to_owned();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn search_by_name(&self, text: &str, limit: u64) -> anyhow::Result<Vec<User>> {
        let terms: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
        let mut hits: Vec<User> = self
            .rows
            .lock()
            .iter()
            .filter(|u| {
                let name = u.name.to_lowercase();
                terms.iter().all(|t| name.contains(t.as_str()))
            })
            .cloned()
            .collect();
        hits.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        hits.truncate(limit as usize);
        Ok(hits)
    }
}

pub fn service_with(repo: Arc<InMemoryUsersRepository>) -> Service {
    Service::new(repo, ServiceConfig::default())
}

pub const ALICE_PICTURE: &str = "https://img.example.com/alice.png";

pub fn alice() -> Identity {
    Identity::new("issuer|alice")
        .with_name("Alice")
        .with_email("alice@x.com")
        .with_picture_url(ALICE_PICTURE)
}
