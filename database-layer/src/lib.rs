//! Postgres persistence for OpenProcure.
//!
//! Owns the connection pool, the idempotent schema bootstrap and the
//! concrete store implementations behind the boundaries that
//! `auth-identity` and `audit-engine` define. The procurement domain types
//! live here too, with in-memory stores used by the test suites and for
//! running without a database.
//!
//! Driver faults never leave this crate raw: [`error::DatabaseError`]
//! classifies them into duplicate, invalid-reference, not-found and
//! catch-all variants that the HTTP layer maps onto status codes.

pub mod audit;
pub mod bids;
pub mod connection;
pub mod error;
pub mod models;
pub mod tenders;
pub mod users;

pub use audit::PgAuditStore;
pub use bids::{BidStore, InMemoryBidStore, PgBidStore};
pub use connection::DatabasePool;
pub use error::{DatabaseError, DatabaseResult};
pub use models::{Bid, CreateTender, ParseStatusError, Tender, TenderStatus};
pub use tenders::{InMemoryTenderStore, PgTenderStore, TenderStore};
pub use users::PgUserStore;
