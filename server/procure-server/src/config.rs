//! Environment-driven server configuration.

use anyhow::{bail, Context, Result};
use std::env;
use std::sync::OnceLock;

/// Deployment environment. Controls the error envelope shape and the
/// logging format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Reads `APP_ENV`; anything other than production means development.
    pub fn from_env() -> Self {
        match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

static RUNTIME_ENV: OnceLock<Environment> = OnceLock::new();

/// Pin the runtime environment for the lifetime of the process. The first
/// caller wins; later calls return the pinned value.
pub fn set_runtime_env(environment: Environment) -> Environment {
    *RUNTIME_ENV.get_or_init(|| environment)
}

/// The process-wide environment, defaulting to whatever `APP_ENV` says.
pub fn runtime_env() -> Environment {
    *RUNTIME_ENV.get_or_init(Environment::from_env)
}

/// Server configuration assembled from environment variables (after
/// `dotenvy` has loaded any `.env` file).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    /// When unset the server falls back to in-memory stores.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expires_in_hours: i64,
    pub cors_allowed_origins: Vec<String>,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_seconds: u64,
    pub audit_body_limit_bytes: usize,
}

const DEV_JWT_SECRET: &str = "openprocure-dev-secret-change-me";

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_env();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment.is_production() => {
                bail!("JWT_SECRET must be set when APP_ENV=production")
            }
            _ => DEV_JWT_SECRET.to_string(),
        };

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        Ok(Self {
            environment,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            jwt_secret,
            jwt_expires_in_hours: parse_var("JWT_EXPIRES_IN_HOURS", 12)?,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            rate_limit_max_requests: parse_var("RATE_LIMIT_MAX_REQUESTS", 100)?,
            rate_limit_window_seconds: parse_var("RATE_LIMIT_WINDOW_SECS", 60)?,
            audit_body_limit_bytes: parse_var("AUDIT_BODY_LIMIT_BYTES", 16 * 1024)?,
        })
    }

    /// True when every origin is allowed (`*`, the development default).
    pub fn cors_allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.iter().any(|origin| origin == "*")
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{name} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
