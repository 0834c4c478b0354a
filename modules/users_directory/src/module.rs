use std::sync::Arc;

use arc_swap::ArcSwapOption;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::auth::{AuthProvider, TrustedHeaderAuth};
use crate::api::rest::routes;
use crate::config::UsersDirectoryConfig;
use crate::contract::client::UsersDirectoryApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::UsersDirectoryLocalClient;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::SeaOrmUsersRepository;

/// Module lifecycle: `migrate`, then `init`, then `register_rest`.
#[derive(Default)]
pub struct UsersDirectory {
    // Read-mostly after init.
    service: ArcSwapOption<Service>,
    auth: ArcSwapOption<TrustedHeaderAuth>,
}

impl Clone for UsersDirectory {
    fn clone(&self) -> Self {
        Self {
            service: ArcSwapOption::new(self.service.load_full()),
            auth: ArcSwapOption::new(self.auth.load_full()),
        }
    }
}

impl UsersDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the schema up to date. Safe to run on every start.
    pub async fn migrate(&self, db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running users_directory database migrations");
        Migrator::up(db, None).await?;
        info!("users_directory migrations completed");
        Ok(())
    }

    /// Wire repository, service and auth; returns the in-process client.
    pub fn init(
        &self,
        db: DatabaseConnection,
        cfg: &UsersDirectoryConfig,
    ) -> anyhow::Result<Arc<dyn UsersDirectoryApi>> {
        info!("Initializing users_directory module");
        debug!(
            "Loaded users_directory config: default_search_limit={}, max_search_limit={}, min_query_len={}",
            cfg.default_search_limit, cfg.max_search_limit, cfg.min_query_len
        );
        if cfg.default_search_limit == 0 || cfg.max_search_limit == 0 {
            anyhow::bail!("users_directory: search limits must be positive");
        }

        let auth = TrustedHeaderAuth::new(&cfg.identity_header_prefix)?;

        let repo = SeaOrmUsersRepository::new(db);
        let service = Arc::new(Service::new(Arc::new(repo), ServiceConfig::from(cfg)));

        self.service.store(Some(service.clone()));
        self.auth.store(Some(Arc::new(auth)));

        let api: Arc<dyn UsersDirectoryApi> = Arc::new(UsersDirectoryLocalClient::new(service));
        Ok(api)
    }

    /// Mount the REST routes. Fails if `init` has not run.
    pub fn register_rest(&self, router: axum::Router) -> anyhow::Result<axum::Router> {
        info!("Registering users_directory REST routes");

        let service = self
            .service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?;
        let auth = self
            .auth
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Auth provider not initialized"))?;
        let auth: Arc<dyn AuthProvider> = Arc::new(auth.as_ref().clone());

        Ok(routes::register_routes(router, service, auth))
    }

    pub fn service(&self) -> Option<Arc<Service>> {
        self.service.load_full()
    }
}
