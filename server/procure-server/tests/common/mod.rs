//! Shared fixtures for the integration tests.
//!
//! Every context pins the runtime environment to production so response
//! envelopes carry the exact client-facing shape, and wires the app with
//! in-memory stores seeded with one account per role.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use audit_engine::{AuditEntry, AuditError, AuditStore, InMemoryAuditStore};
use auth_identity::{InMemoryUserStore, Role, User, UserStore};
use database_layer::{BidStore, InMemoryBidStore, InMemoryTenderStore, TenderStore};
use procure_server::{create_app, set_runtime_env, Environment, ProcureServer, ServerConfig};

/// Password shared by every seeded account.
pub const PASSWORD: &str = "SecureP@ss1";

pub const SUPPLIER_EMAIL: &str = "testuser@gov.com";
pub const ORGLESS_SUPPLIER_EMAIL: &str = "solo-supplier@gov.com";
pub const OFFICER_EMAIL: &str = "officer@gov.com";
pub const AUDITOR_EMAIL: &str = "auditor@gov.com";
pub const SUPER_ADMIN_EMAIL: &str = "root@gov.com";
pub const SUPER_ADMIN_NO_MFA_EMAIL: &str = "root-nomfa@gov.com";
pub const CITIZEN_EMAIL: &str = "resident@gov.com";

pub struct TestContext {
    pub app: Router,
    pub server: ProcureServer,
    pub audit: Arc<InMemoryAuditStore>,
    /// Organization of the seeded `testuser@gov.com` supplier.
    pub supplier_org: Uuid,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(adjust: impl FnOnce(&mut ServerConfig)) -> Self {
        let audit = Arc::new(InMemoryAuditStore::new());
        Self::assemble(adjust, audit.clone() as Arc<dyn AuditStore>, audit).await
    }

    /// Context whose audit store rejects every append. The `audit` handle
    /// is a detached empty store, only the failing one is wired in.
    pub async fn with_failing_audit() -> Self {
        Self::assemble(
            |_| {},
            Arc::new(FailingAuditStore),
            Arc::new(InMemoryAuditStore::new()),
        )
        .await
    }

    async fn assemble(
        adjust: impl FnOnce(&mut ServerConfig),
        audit_store: Arc<dyn AuditStore>,
        audit: Arc<InMemoryAuditStore>,
    ) -> Self {
        set_runtime_env(Environment::Production);

        let mut config = test_config();
        adjust(&mut config);

        let users: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
        let tenders: Arc<dyn TenderStore> = Arc::new(InMemoryTenderStore::new());
        let bids: Arc<dyn BidStore> = Arc::new(InMemoryBidStore::new(tenders.clone()));
        let server = ProcureServer::with_stores(config, users, tenders, bids, audit_store);

        let supplier_org = seed_users(&server).await;
        let app = create_app(server.clone());

        Self {
            app,
            server,
            audit,
            supplier_org,
        }
    }

    pub async fn login(&self, email: &str) -> String {
        login(&self.app, email).await
    }
}

fn test_config() -> ServerConfig {
    ServerConfig {
        environment: Environment::Production,
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: None,
        jwt_secret: "integration-test-secret".to_string(),
        jwt_expires_in_hours: 1,
        cors_allowed_origins: vec!["*".to_string()],
        rate_limit_max_requests: 1000,
        rate_limit_window_seconds: 60,
        audit_body_limit_bytes: 16 * 1024,
    }
}

async fn seed_user(
    server: &ProcureServer,
    email: &str,
    role: Role,
    organization_id: Option<Uuid>,
    is_mfa_enabled: bool,
) -> User {
    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: server.identity.hash_password(PASSWORD).unwrap(),
        full_name: None,
        role,
        organization_id,
        is_active: true,
        is_mfa_enabled,
        permissions: Vec::new(),
        created_at: now,
        updated_at: now,
        last_login_at: None,
    };
    server.users.create(&user).await.unwrap()
}

async fn seed_users(server: &ProcureServer) -> Uuid {
    let supplier_org = Uuid::new_v4();

    seed_user(server, SUPPLIER_EMAIL, Role::Supplier, Some(supplier_org), false).await;
    seed_user(server, ORGLESS_SUPPLIER_EMAIL, Role::Supplier, None, false).await;
    seed_user(server, OFFICER_EMAIL, Role::ProcurementOfficer, None, false).await;
    seed_user(server, AUDITOR_EMAIL, Role::Auditor, None, false).await;
    seed_user(server, SUPER_ADMIN_EMAIL, Role::SuperAdmin, None, true).await;
    seed_user(server, SUPER_ADMIN_NO_MFA_EMAIL, Role::SuperAdmin, None, false).await;
    seed_user(server, CITIZEN_EMAIL, Role::Citizen, None, false).await;

    supplier_org
}

/// Sends one request through the app and returns status plus parsed body.
pub async fn send(
    app: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => {
            let payload = body.to_string();
            builder
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::CONTENT_LENGTH, payload.len())
                .body(Body::from(payload))
                .unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed for {email}: {body}");
    body["data"]["token"]
        .as_str()
        .expect("login response carries a token")
        .to_string()
}

/// Waits for the fire-and-forget recorder to land `count` entries.
pub async fn wait_for_entries(audit: &InMemoryAuditStore, count: usize) {
    for _ in 0..200 {
        if audit.len() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!(
        "audit store has {} entries, expected at least {count}",
        audit.len()
    );
}

/// Store that rejects every append, for exercising best-effort delivery.
pub struct FailingAuditStore;

#[async_trait]
impl AuditStore for FailingAuditStore {
    async fn append(&self, _entry: &AuditEntry) -> audit_engine::Result<()> {
        Err(AuditError::Storage("injected failure".to_string()))
    }

    async fn list_recent(&self, _limit: i64) -> audit_engine::Result<Vec<AuditEntry>> {
        Ok(Vec::new())
    }
}
