//! Shared server state.

use std::fmt;
use std::sync::Arc;

use audit_engine::{AuditRecorder, AuditStore, InMemoryAuditStore};
use auth_identity::{IdentityService, InMemoryUserStore, UserStore};
use database_layer::{
    BidStore, DatabasePool, InMemoryBidStore, InMemoryTenderStore, PgAuditStore, PgBidStore,
    PgTenderStore, PgUserStore, TenderStore,
};

use crate::auth::TokenService;
use crate::config::ServerConfig;
use crate::middleware::{RateLimitConfig, RateLimiter};

/// State shared by every handler and middleware, cheap to clone.
#[derive(Clone)]
pub struct ProcureServer {
    pub config: Arc<ServerConfig>,
    pub users: Arc<dyn UserStore>,
    pub identity: Arc<IdentityService>,
    pub tokens: TokenService,
    pub audit: AuditRecorder,
    pub audit_store: Arc<dyn AuditStore>,
    pub tenders: Arc<dyn TenderStore>,
    pub bids: Arc<dyn BidStore>,
    pub rate_limiter: RateLimiter,
}

impl fmt::Debug for ProcureServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcureServer")
            .field("environment", &self.config.environment)
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .finish_non_exhaustive()
    }
}

impl ProcureServer {
    /// Builds state against Postgres when `DATABASE_URL` is configured,
    /// in-memory stores otherwise.
    pub async fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let server = match config.database_url.clone() {
            Some(url) => {
                let pool = DatabasePool::connect(&url).await?;
                pool.initialize_schema().await?;
                let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool.clone()));
                let tenders: Arc<dyn TenderStore> = Arc::new(PgTenderStore::new(pool.clone()));
                let bids: Arc<dyn BidStore> = Arc::new(PgBidStore::new(pool.clone()));
                let audit_store: Arc<dyn AuditStore> = Arc::new(PgAuditStore::new(pool));
                Self::with_stores(config, users, tenders, bids, audit_store)
            }
            None => {
                tracing::warn!(
                    "DATABASE_URL is not set, falling back to in-memory stores; \
                     all data is lost on restart"
                );
                let users: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
                let tenders: Arc<dyn TenderStore> = Arc::new(InMemoryTenderStore::new());
                let bids: Arc<dyn BidStore> = Arc::new(InMemoryBidStore::new(tenders.clone()));
                let audit_store: Arc<dyn AuditStore> = Arc::new(InMemoryAuditStore::new());
                Self::with_stores(config, users, tenders, bids, audit_store)
            }
        };
        Ok(server)
    }

    /// Assembles state from explicit stores. Tests use this to inject
    /// in-memory or failing stores without touching the environment.
    pub fn with_stores(
        config: ServerConfig,
        users: Arc<dyn UserStore>,
        tenders: Arc<dyn TenderStore>,
        bids: Arc<dyn BidStore>,
        audit_store: Arc<dyn AuditStore>,
    ) -> Self {
        let identity = Arc::new(IdentityService::new(users.clone()));
        let tokens = TokenService::new(&config.jwt_secret, config.jwt_expires_in_hours);
        let audit = AuditRecorder::new(audit_store.clone());
        let rate_limiter = RateLimiter::new(RateLimitConfig {
            max_requests: config.rate_limit_max_requests,
            window_seconds: config.rate_limit_window_seconds,
        });

        Self {
            config: Arc::new(config),
            users,
            identity,
            tokens,
            audit,
            audit_store,
            tenders,
            bids,
            rate_limiter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    fn test_config() -> ServerConfig {
        ServerConfig {
            environment: Environment::Development,
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: None,
            jwt_secret: "test-secret".to_string(),
            jwt_expires_in_hours: 1,
            cors_allowed_origins: vec!["*".to_string()],
            rate_limit_max_requests: 100,
            rate_limit_window_seconds: 60,
            audit_body_limit_bytes: 16 * 1024,
        }
    }

    #[tokio::test]
    async fn in_memory_state_assembles_without_a_database() {
        let server = ProcureServer::new(test_config()).await.unwrap();
        assert!(server.users.find_by_email("nobody@gov.example").await.unwrap().is_none());
        assert!(server.tenders.list().await.unwrap().is_empty());
    }

    #[test]
    fn debug_output_skips_secrets() {
        let users: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
        let tenders: Arc<dyn TenderStore> = Arc::new(InMemoryTenderStore::new());
        let bids: Arc<dyn BidStore> = Arc::new(InMemoryBidStore::new(tenders.clone()));
        let audit_store: Arc<dyn AuditStore> = Arc::new(InMemoryAuditStore::new());
        let server = ProcureServer::with_stores(test_config(), users, tenders, bids, audit_store);

        let rendered = format!("{server:?}");
        assert!(rendered.contains("127.0.0.1"));
        assert!(!rendered.contains("test-secret"));
    }
}
