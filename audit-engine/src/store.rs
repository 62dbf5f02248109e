//! Persistence boundary for audit entries.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::entry::AuditEntry;
use crate::error::Result;

/// Where finished entries end up.
///
/// `append` runs on a spawned task rather than on the request path, so
/// implementations are free to do real I/O.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Persists one entry.
    async fn append(&self, entry: &AuditEntry) -> Result<()>;

    /// Returns up to `limit` entries, newest first.
    async fn list_recent(&self, limit: i64) -> Result<Vec<AuditEntry>>;
}

/// Vec-backed store for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    entries: RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Copies out the full log, oldest first.
    pub fn snapshot(&self) -> Vec<AuditEntry> {
        self.entries.read().clone()
    }
}

#[async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn append(&self, entry: &AuditEntry) -> Result<()> {
        self.entries.write().push(entry.clone());
        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<AuditEntry>> {
        let capped = usize::try_from(limit).unwrap_or(0);
        let entries = self.entries.read();
        Ok(entries.iter().rev().take(capped).cloned().collect())
    }
}
