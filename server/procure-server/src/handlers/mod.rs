//! HTTP request handlers.
//!
//! Handlers stay thin: validate, call one store or service, wrap the
//! result in the success envelope. Access control lives in the middleware
//! stack, never in here.

pub mod admin;
pub mod audit_logs;
pub mod auth;
pub mod bids;
pub mod contact;
pub mod health;
pub mod tenders;

use axum::http::Uri;

use crate::error::ApiError;

/// Fallback for routes that match nothing.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("Cannot find {uri} on this server!"))
}
