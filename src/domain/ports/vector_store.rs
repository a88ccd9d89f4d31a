use std::sync::Arc;

use crate::domain::{errors::DomainError, IndexSnapshot};

/// Holds the currently published snapshot.
///
/// Readers get a shared handle that stays valid after later publishes.
pub trait VectorStore: Send + Sync {
    fn current(&self) -> Result<Arc<IndexSnapshot>, DomainError>;
    fn publish(&self, snapshot: IndexSnapshot) -> Result<Arc<IndexSnapshot>, DomainError>;
    fn next_version(&self) -> u64;
}
