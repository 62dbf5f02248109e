//! The single terminal translator for every fault the pipeline can produce.
//!
//! Each stage returns its own typed error (`TokenError`, `IdentityError`,
//! `DatabaseError`); all of them convert into [`ApiError`] here, and only
//! here is a client-facing body produced. Operational faults carry a fixed
//! safe message; unclassified faults are redacted in production.

use crate::auth::tokens::TokenError;
use crate::config::{runtime_env, Environment};
use auth_identity::IdentityError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use database_layer::DatabaseError;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

/// Standard API success envelope: `{"status":"success","data":...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub data: T,
}

/// Wrap handler output in the success envelope.
pub fn api_success<T>(data: T) -> ApiResponse<T> {
    ApiResponse {
        status: "success".to_string(),
        data,
    }
}

/// Main API error enum
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Authentication error: {message}")]
    Authentication { message: String },

    #[error("Authorization error: {message}")]
    Authorization { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Rate limit exceeded: {message}")]
    RateLimit { message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create an authorization error
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a rate limit error
    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::RateLimit {
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a storage error. Unlike [`ApiError::internal`] the message is
    /// an operational one and survives into production responses.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Authorization { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::RateLimit { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Storage { .. } | ApiError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "validation_error",
            ApiError::Authentication { .. } => "authentication_error",
            ApiError::Authorization { .. } => "authorization_error",
            ApiError::NotFound { .. } => "not_found",
            ApiError::RateLimit { .. } => "rate_limit_exceeded",
            ApiError::BadRequest { .. } => "bad_request",
            ApiError::Storage { .. } => "storage_error",
            ApiError::Internal { .. } => "internal_error",
        }
    }

    /// Message as the client sees it.
    ///
    /// Operational faults carry their fixed message in every environment.
    /// Unclassified internals surface their detail only in development.
    fn client_message(&self, env: Environment) -> String {
        match self {
            ApiError::Internal { message } => match env {
                Environment::Development => message.clone(),
                Environment::Production => "something went wrong".to_string(),
            },
            ApiError::Validation { message }
            | ApiError::Authentication { message }
            | ApiError::Authorization { message }
            | ApiError::NotFound { message }
            | ApiError::RateLimit { message }
            | ApiError::BadRequest { message }
            | ApiError::Storage { message } => message.clone(),
        }
    }

    /// The response envelope, environment-dependent: production carries
    /// `status` + `message` only; development adds the machine-readable
    /// kind and the debug representation.
    pub fn response_body(&self, env: Environment) -> Value {
        let message = self.client_message(env);
        match env {
            Environment::Production => json!({
                "status": "error",
                "message": message,
            }),
            Environment::Development => json!({
                "status": "error",
                "error": self.error_type(),
                "message": message,
                "stack": format!("{self:?}"),
            }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();
        let status_code = self.status_code();

        // Method, path, IP and principal arrive via the request span.
        error!(
            error_id = %error_id,
            error_type = %self.error_type(),
            status_code = %status_code.as_u16(),
            error = %self,
            "request failed"
        );

        (status_code, Json(self.response_body(runtime_env()))).into_response()
    }
}

impl From<TokenError> for ApiError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Expired => {
                ApiError::authentication("Your token has expired! Please log in again.")
            }
            TokenError::Malformed | TokenError::SignatureInvalid => {
                ApiError::authentication("Invalid token. Please log in again!")
            }
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(error: IdentityError) -> Self {
        match error {
            IdentityError::InvalidCredentials => {
                ApiError::authentication("Incorrect email or password")
            }
            IdentityError::AccountDisabled => ApiError::authentication(
                "Your account has been deactivated. Please contact an administrator.",
            ),
            IdentityError::EmailAlreadyInUse => ApiError::bad_request("duplicate field value"),
            IdentityError::InvalidReference => ApiError::bad_request("invalid input data"),
            IdentityError::UserNotFound => ApiError::not_found("record not found"),
            IdentityError::InvalidEmail => ApiError::validation("Please provide a valid email"),
            IdentityError::WeakPassword => {
                ApiError::validation("Password must be at least 8 characters")
            }
            IdentityError::HashingError => ApiError::internal("password hashing failed"),
            IdentityError::Storage(detail) => {
                error!(%detail, "identity storage failure");
                ApiError::storage("database operation failed")
            }
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::Duplicate => ApiError::bad_request("duplicate field value"),
            DatabaseError::InvalidReference => ApiError::bad_request("invalid input data"),
            DatabaseError::NotFound => ApiError::not_found("record not found"),
            DatabaseError::QueryFailed(detail) | DatabaseError::ConnectionFailed(detail) => {
                error!(%detail, "storage failure");
                ApiError::storage("database operation failed")
            }
        }
    }
}

impl From<audit_engine::AuditError> for ApiError {
    fn from(error: audit_engine::AuditError) -> Self {
        error!(%error, "audit storage failure");
        ApiError::storage("database operation failed")
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        ApiError::internal(format!("{error:#}"))
    }
}

/// Convenience result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;
