//! Off-path delivery of finished entries.

use std::sync::Arc;

use crate::entry::AuditEntry;
use crate::store::AuditStore;

/// Hands entries to the store without blocking the caller.
///
/// The append runs on a spawned task. When it fails the entry is logged and
/// dropped; a broken audit store must not take request handling down with it.
#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn AuditStore>,
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Queues `entry` for persistence and returns immediately.
    ///
    /// The write may still be in flight when the response reaches the client.
    /// Callers that need confirmation should talk to the store directly.
    pub fn record(&self, entry: AuditEntry) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(error) = store.append(&entry).await {
                tracing::warn!(
                    target: "audit",
                    entry_id = %entry.id,
                    action = %entry.action,
                    %error,
                    "dropping audit entry after store failure"
                );
            }
        });
    }
}
