use crate::{InteractionRepository, RepositoryError};
use async_trait::async_trait;
use reputation_shared::types::InteractionRecord;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Interaction log kept in a vector.
#[derive(Clone, Default)]
pub struct InMemoryInteractionRepository {
    records: Arc<Mutex<Vec<InteractionRecord>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryInteractionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent append fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<InteractionRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl InteractionRepository for InMemoryInteractionRepository {
    async fn append(&self, record: &InteractionRecord) -> Result<(), RepositoryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("interaction log".to_string()));
        }
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("interaction log".to_string()))?
            .push(record.clone());
        Ok(())
    }
}
