//! Identity management for the OpenProcure platform.
//!
//! Provides the account model and credential plumbing consumed by the HTTP
//! server's authentication pipeline:
//!
//! - [`User`] and the closed [`Role`] set used for route gating
//! - Argon2 password hashing and verification via [`IdentityService`]
//! - The [`UserStore`] boundary with an in-memory implementation for tests
//!   (the Postgres implementation lives in `database-layer`)
//!
//! Authentication here means credential verification only. Bearer-token
//! minting and per-request principal resolution live in the server crate,
//! which performs one `UserStore` read per request so deactivation takes
//! effect immediately.

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use error::*;
pub use models::*;
pub use repository::*;
pub use service::*;
