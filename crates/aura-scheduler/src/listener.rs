//! Change-feed listener: bridges task-store events into scheduler jobs.
//!
//! Subscribes to insert and update events on the task table. Inserts and
//! reactivations install jobs (replace-existing makes redelivery safe);
//! deactivations cancel them. A lost subscription reconnects with
//! exponential backoff, and every (re)subscribe is followed by a
//! reconciliation pass that re-derives the job table from the store's
//! active tasks, closing any gap left by downtime.

use aura_core::{
    model::Task,
    traits::{ChangeFeed, FeedEventKind, TaskSource},
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::recurrence::parse_frequency;
use crate::service::{ReminderPayload, SchedulerService};

/// Initial reconnect backoff; doubles up to the configured cap.
const BACKOFF_INITIAL: Duration = Duration::from_secs(1);

/// Drives scheduler installs from the task change feed.
pub struct FeedListener {
    feed: Arc<dyn ChangeFeed>,
    tasks: Arc<dyn TaskSource>,
    scheduler: Arc<SchedulerService>,
    backoff_max: Duration,
    table: String,
}

impl FeedListener {
    pub fn new(
        feed: Arc<dyn ChangeFeed>,
        tasks: Arc<dyn TaskSource>,
        scheduler: Arc<SchedulerService>,
        table: &str,
        backoff_max: Duration,
    ) -> Self {
        Self {
            feed,
            tasks,
            scheduler,
            backoff_max,
            table: table.to_string(),
        }
    }

    /// Run until the process stops: subscribe, reconcile, consume events,
    /// reconnect on loss.
    pub async fn run(self) {
        let mut backoff = BACKOFF_INITIAL;

        loop {
            let (mut inserts, mut updates) = match self.subscribe_both().await {
                Ok(pair) => {
                    backoff = BACKOFF_INITIAL;
                    pair
                }
                Err(e) => {
                    warn!("feed subscribe failed, retrying in {backoff:?}: {e}");
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(self.backoff_max);
                    continue;
                }
            };

            // Tasks inserted before (or between) subscriptions are picked
            // up here; install's replace semantics absorb any overlap with
            // events already in flight.
            self.reconcile().await;

            loop {
                tokio::select! {
                    row = inserts.recv() => match row {
                        Some(row) => self.handle_insert(row).await,
                        None => break,
                    },
                    row = updates.recv() => match row {
                        Some(row) => self.handle_update(row).await,
                        None => break,
                    },
                }
            }

            warn!("task feed subscription lost, reconnecting in {backoff:?}");
            tokio::time::sleep(backoff).await;
            backoff = (backoff * 2).min(self.backoff_max);
        }
    }

    async fn subscribe_both(
        &self,
    ) -> Result<(mpsc::Receiver<Value>, mpsc::Receiver<Value>), aura_core::AuraError> {
        let inserts = self
            .feed
            .subscribe(&self.table, FeedEventKind::Insert)
            .await?;
        let updates = self
            .feed
            .subscribe(&self.table, FeedEventKind::Update)
            .await?;
        info!("subscribed to {} change feed", self.table);
        Ok((inserts, updates))
    }

    async fn handle_insert(&self, row: Value) {
        match serde_json::from_value::<Task>(row) {
            Ok(task) => self.install_task(&task).await,
            Err(e) => warn!("feed: undecodable task row on insert: {e}"),
        }
    }

    /// Updates carry cancellation and cadence edits. Deactivation must
    /// reach the scheduler before the task's next fire.
    async fn handle_update(&self, row: Value) {
        let task = match serde_json::from_value::<Task>(row) {
            Ok(task) => task,
            Err(e) => {
                warn!("feed: undecodable task row on update: {e}");
                return;
            }
        };

        if task.active {
            self.install_task(&task).await;
        } else if self.scheduler.cancel(task.id).await {
            info!("task {}: deactivated, job removed", task.id);
        }
    }

    async fn install_task(&self, task: &Task) {
        let recurrence = parse_frequency(task.freq);
        let payload = ReminderPayload {
            user_id: task.user_id,
            content: task.content.clone(),
        };

        if let Err(e) = self
            .scheduler
            .install(task.id, task.created_at, recurrence, payload)
            .await
        {
            warn!("task {} left unscheduled: {e}", task.id);
        }
    }

    /// Re-derive scheduler state from the store's active tasks.
    pub async fn reconcile(&self) {
        match self.tasks.list_active_tasks().await {
            Ok(tasks) => {
                info!("reconciliation: installing {} active tasks", tasks.len());
                for task in &tasks {
                    self.install_task(task).await;
                }
            }
            Err(e) => warn!("reconciliation pass failed: {e}"),
        }
    }
}
