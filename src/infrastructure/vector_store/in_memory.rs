use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::{ports::VectorStore, DomainError, IndexSnapshot};

/// Process-local holder of the published snapshot.
///
/// The lock only guards the pointer swap and the `Arc` clone; no embedding
/// or search work ever happens while it is held.
pub struct InMemoryVectorStore {
    current: RwLock<Option<Arc<IndexSnapshot>>>,
    versions: AtomicU64,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
            versions: AtomicU64::new(0),
        }
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorStore for InMemoryVectorStore {
    fn current(&self) -> Result<Arc<IndexSnapshot>, DomainError> {
        let current = self
            .current
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        current.clone().ok_or(DomainError::IndexNotReady)
    }

    fn publish(&self, snapshot: IndexSnapshot) -> Result<Arc<IndexSnapshot>, DomainError> {
        let mut current = self
            .current
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        if let Some(existing) = current.as_ref() {
            if existing.version() >= snapshot.version() {
                return Err(DomainError::internal(format!(
                    "refusing to replace snapshot v{} with older v{}",
                    existing.version(),
                    snapshot.version()
                )));
            }
        }

        let snapshot = Arc::new(snapshot);
        *current = Some(snapshot.clone());
        Ok(snapshot)
    }

    fn next_version(&self) -> u64 {
        self.versions.fetch_add(1, Ordering::SeqCst) + 1
    }
}
