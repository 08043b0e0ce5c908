use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::SessionRegistry;
use crate::config::AppConfig;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub sessions: Arc<SessionRegistry>,
    pub config: Arc<AppConfig>,
    pub http: reqwest::Client,
}

impl AppState {
    /// Build state from config. The pool is lazy so the server comes up even
    /// when the store is unreachable; store-backed endpoints then fail
    /// per-request instead.
    pub fn new(config: AppConfig) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
            .connect_lazy(&config.database.url)
            .unwrap_or_else(|e| panic!("invalid DATABASE_URL: {}", e));

        let sessions = Arc::new(SessionRegistry::new(config.security.session_ttl_days));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream.timeout_secs))
            .build()
            .unwrap_or_else(|e| panic!("failed to build http client: {}", e));

        Self { pool, sessions, config: Arc::new(config), http }
    }
}
