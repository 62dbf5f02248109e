//! Audit trail engine for OpenProcure.
//!
//! Captures one structured entry per audited API request and hands it to a
//! pluggable store. Capture is best effort: a failed write is logged and the
//! entry dropped, the client that triggered it never sees the fault.
//!
//! The pieces fit together as follows:
//!
//! - [`entry::AuditEntry`] is the record of a single request, built by the
//!   HTTP layer once the response exists
//! - [`redact`] strips credential material from captured payloads before
//!   they are stored
//! - [`store::AuditStore`] abstracts persistence, with an in-memory
//!   implementation for tests and single-process deployments
//! - [`recorder::AuditRecorder`] moves writes off the request path

pub mod entry;
pub mod error;
pub mod recorder;
pub mod redact;
pub mod store;

pub use entry::{AuditDetails, AuditEntry};
pub use error::{AuditError, Result};
pub use recorder::AuditRecorder;
pub use redact::{is_sensitive, redact_value, REDACTION_MARKER};
pub use store::{AuditStore, InMemoryAuditStore};
