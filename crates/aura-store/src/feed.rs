//! In-process change feed over the task table.
//!
//! The store publishes a row payload on every task insert/update; the
//! scheduler's listener consumes them through the [`ChangeFeed`] trait.
//! Delivery is at-least-once: a subscription that falls behind is closed
//! rather than silently skipping events, which forces the subscriber to
//! re-subscribe and reconcile from the store.

use async_trait::async_trait;
use aura_core::{
    error::AuraError,
    model::Task,
    traits::{ChangeFeed, FeedEventKind},
};
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};
use tracing::warn;

/// Table name the feed is scoped to.
pub const TASK_TABLE: &str = "tasks";

/// Buffered events per subscription before it is considered lagged.
const FEED_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
struct FeedMessage {
    kind: FeedEventKind,
    row: Value,
}

/// Cloneable handle to the task change feed.
#[derive(Clone)]
pub struct TaskFeed {
    tx: broadcast::Sender<FeedMessage>,
}

impl TaskFeed {
    pub(crate) fn new() -> Self {
        let (tx, _) = broadcast::channel(FEED_CAPACITY);
        Self { tx }
    }

    /// Publish a task row. Send errors (no subscribers) are ignored —
    /// the reconciliation pass covers anything missed before a
    /// subscriber attached.
    pub(crate) fn publish(&self, kind: FeedEventKind, task: &Task) {
        match serde_json::to_value(task) {
            Ok(row) => {
                let _ = self.tx.send(FeedMessage { kind, row });
            }
            Err(e) => warn!("feed: failed to encode task {}: {e}", task.id),
        }
    }
}

#[async_trait]
impl ChangeFeed for TaskFeed {
    async fn subscribe(
        &self,
        table: &str,
        kind: FeedEventKind,
    ) -> Result<mpsc::Receiver<Value>, AuraError> {
        if table != TASK_TABLE {
            return Err(AuraError::Store(format!(
                "no change feed for table '{table}'"
            )));
        }

        let mut rx = self.tx.subscribe();
        let (out_tx, out_rx) = mpsc::channel(FEED_CAPACITY);

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(msg) => {
                        if msg.kind != kind {
                            continue;
                        }
                        if out_tx.send(msg.row).await.is_err() {
                            break; // Subscriber dropped the receiver.
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // Events were dropped, so at-least-once no longer
                        // holds on this subscription. Close it and let the
                        // subscriber reconcile after re-subscribing.
                        warn!("feed: subscription lagged, {n} events lost, closing");
                        break;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Ok(out_rx)
    }
}
