use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::TokenKeys;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AccountService, ListingService, SeaOrmAccountService, SeaOrmListingService,
};

/// Process-wide shared state: config, the storage pool and the domain
/// services built over it. Constructed once at startup and cloned into
/// request handlers.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    /// Signing material for bearer tokens, loaded once from config.
    pub tokens: Arc<TokenKeys>,

    pub account_service: Arc<dyn AccountService>,

    pub listing_service: Arc<dyn ListingService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let tokens = Arc::new(TokenKeys::new(
            &config.auth.jwt_secret,
            config.auth.token_ttl_days,
        ));

        let config_arc = Arc::new(RwLock::new(config));

        let account_service: Arc<dyn AccountService> = Arc::new(SeaOrmAccountService::new(
            store.clone(),
            config_arc.clone(),
            tokens.clone(),
        ));

        let listing_service: Arc<dyn ListingService> =
            Arc::new(SeaOrmListingService::new(store.clone()));

        Ok(Self {
            config: config_arc,
            store,
            tokens,
            account_service,
            listing_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
