//! Startup comparison of cached vote counters against the vote ledger.
use reputation_repository::{RepositoryError, ReputationStore};
use reputation_shared::types::CounterDrift;
use tracing::{info, warn};

/// Recounts the ledger and reports every content item whose cached counters
/// disagree with it. Nothing is repaired.
pub async fn run_audit(store: &dyn ReputationStore) -> Result<Vec<CounterDrift>, RepositoryError> {
    let drifts = store.audit_counters().await?;
    for drift in &drifts {
        warn!(
            content = %drift.target,
            cached_upvotes = drift.cached_upvotes,
            cached_downvotes = drift.cached_downvotes,
            ledger_upvotes = drift.ledger_upvotes,
            ledger_downvotes = drift.ledger_downvotes,
            "Counter drift detected"
        );
    }
    if drifts.is_empty() {
        info!("Vote counters match the ledger");
    }
    Ok(drifts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reputation_repository::InMemoryReputationStore;
    use reputation_shared::types::{UserId, VotableContent};

    #[tokio::test]
    async fn test_clean_store_has_no_drift() {
        let store = InMemoryReputationStore::new();
        let author = UserId::new_v4();
        store.register_user(author, 0).await;
        store.seed_content(VotableContent::new_question(author)).await;

        assert!(run_audit(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reports_drifted_counters() {
        let store = InMemoryReputationStore::new();
        let author = UserId::new_v4();
        let mut question = VotableContent::new_question(author);
        question.downvotes = 2;
        store.seed_content(question.clone()).await;

        let drifts = run_audit(&store).await.unwrap();

        assert_eq!(drifts.len(), 1);
        assert_eq!(drifts[0].target, question.target);
        assert_eq!(drifts[0].cached_downvotes, 2);
        assert_eq!(drifts[0].ledger_downvotes, 0);
    }
}
