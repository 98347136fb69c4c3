//! Fire-and-forget interaction logging.
//!
//! Services hand records to an [`InteractionRecorder`] after their unit of
//! work has committed. A separate [`InteractionWorker`] task drains the queue
//! into the [`InteractionRepository`]. A failing or slow log never blocks the
//! caller and never touches committed state.
use crate::config::EngineConfig;
use reputation_repository::InteractionRepository;
use reputation_shared::types::{InteractionRecord, InteractionVerb, Target, UserId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

enum Message {
    Record(InteractionRecord),
    Flush(oneshot::Sender<()>),
}

/// Sending half of the interaction queue.
#[derive(Clone)]
pub struct InteractionRecorder {
    sender: mpsc::Sender<Message>,
}

impl InteractionRecorder {
    /// Creates a recorder and the worker that drains it.
    ///
    /// # Arguments
    ///
    /// * `repository` - Where the worker appends records
    /// * `config` - Queue capacity and per-write timeout
    ///
    /// # Returns
    ///
    /// The recorder handle and the worker, which must be spawned by the caller.
    pub fn channel(
        repository: Arc<dyn InteractionRepository>,
        config: &EngineConfig,
    ) -> (InteractionRecorder, InteractionWorker) {
        let (sender, receiver) = mpsc::channel(config.recorder_capacity.max(1));
        let worker = InteractionWorker {
            receiver,
            repository,
            timeout: config.recorder_timeout,
        };
        (InteractionRecorder { sender }, worker)
    }

    /// Enqueues a record without waiting. Drops it with a warning when the
    /// queue is full or the worker is gone.
    pub fn record(&self, actor: UserId, verb: InteractionVerb, target: Target) {
        let record = InteractionRecord::new(actor, verb, target);
        match self.sender.try_send(Message::Record(record)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(
                    actor = %actor,
                    verb = %verb,
                    content = %target,
                    "Interaction queue full, dropping record"
                );
            }
            Err(TrySendError::Closed(_)) => {
                warn!(
                    actor = %actor,
                    verb = %verb,
                    content = %target,
                    "Interaction worker stopped, dropping record"
                );
            }
        }
    }

    /// Waits until every record enqueued before this call has been handled.
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.sender.send(Message::Flush(ack)).await.is_ok() {
            let _ = done.await;
        }
    }
}

/// Receiving half of the interaction queue.
pub struct InteractionWorker {
    receiver: mpsc::Receiver<Message>,
    repository: Arc<dyn InteractionRepository>,
    timeout: Duration,
}

impl InteractionWorker {
    /// Drains the queue until every recorder handle has been dropped.
    pub async fn run(mut self) {
        while let Some(message) = self.receiver.recv().await {
            match message {
                Message::Record(record) => self.write(record).await,
                Message::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }
        info!("Interaction worker stopped");
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn write(&self, record: InteractionRecord) {
        match tokio::time::timeout(self.timeout, self.repository.append(&record)).await {
            Ok(Ok(())) => {
                debug!(actor = %record.actor, verb = %record.verb, "Interaction recorded");
            }
            Ok(Err(e)) => {
                warn!(
                    actor = %record.actor,
                    verb = %record.verb,
                    error = %e,
                    "Failed to record interaction"
                );
            }
            Err(_) => {
                warn!(
                    actor = %record.actor,
                    verb = %record.verb,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Timed out recording interaction"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reputation_repository::InMemoryInteractionRepository;
    use reputation_shared::types::ContentId;

    fn target() -> Target {
        Target::question(ContentId::new_v4())
    }

    #[tokio::test]
    async fn test_records_reach_the_repository() {
        let repository = InMemoryInteractionRepository::new();
        let (recorder, worker) =
            InteractionRecorder::channel(Arc::new(repository.clone()), &EngineConfig::default());
        let handle = worker.spawn();

        let actor = UserId::new_v4();
        recorder.record(actor, InteractionVerb::Upvote, target());
        recorder.record(actor, InteractionVerb::Bookmark, target());
        recorder.flush().await;

        let verbs: Vec<_> = repository.records().iter().map(|r| r.verb).collect();
        assert_eq!(verbs, vec![InteractionVerb::Upvote, InteractionVerb::Bookmark]);

        drop(recorder);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_failing_repository_is_swallowed() {
        let repository = InMemoryInteractionRepository::new();
        repository.set_failing(true);
        let (recorder, worker) =
            InteractionRecorder::channel(Arc::new(repository.clone()), &EngineConfig::default());
        let handle = worker.spawn();

        recorder.record(UserId::new_v4(), InteractionVerb::Post, target());
        recorder.flush().await;
        assert!(repository.records().is_empty());

        repository.set_failing(false);
        recorder.record(UserId::new_v4(), InteractionVerb::Post, target());
        recorder.flush().await;
        assert_eq!(repository.records().len(), 1);

        drop(recorder);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_full_queue_drops_records() {
        let repository = InMemoryInteractionRepository::new();
        let config = EngineConfig {
            recorder_capacity: 1,
            ..EngineConfig::default()
        };
        let (recorder, worker) =
            InteractionRecorder::channel(Arc::new(repository.clone()), &config);

        recorder.record(UserId::new_v4(), InteractionVerb::Upvote, target());
        recorder.record(UserId::new_v4(), InteractionVerb::Downvote, target());

        let handle = worker.spawn();
        recorder.flush().await;
        assert_eq!(repository.records().len(), 1);

        drop(recorder);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_record_after_worker_stopped_is_dropped() {
        let repository = InMemoryInteractionRepository::new();
        let (recorder, worker) =
            InteractionRecorder::channel(Arc::new(repository.clone()), &EngineConfig::default());
        drop(worker);

        recorder.record(UserId::new_v4(), InteractionVerb::Delete, target());
        recorder.flush().await;
        assert!(repository.records().is_empty());
    }
}
