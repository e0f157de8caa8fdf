//! Reminder scheduler: the in-memory job table and timer-driven fires.
//!
//! One background tokio task per installed job. State is process-local;
//! the task store is the durability source of truth, and the change-feed
//! listener replays it after a restart.

use aura_core::{
    error::AuraError,
    traits::{Messenger, UserDirectory},
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::recurrence::{advance, first_fire, Recurrence};

/// What a job delivers on each fire.
#[derive(Debug, Clone)]
pub struct ReminderPayload {
    pub user_id: i64,
    pub content: String,
}

struct Job {
    handle: JoinHandle<()>,
    recurrence: Recurrence,
    first_fire: DateTime<Utc>,
}

/// Owns the job table and fires reminder deliveries.
pub struct SchedulerService {
    directory: Arc<dyn UserDirectory>,
    messenger: Arc<dyn Messenger>,
    jobs: Mutex<HashMap<i64, Job>>,
    delivery_timeout: Duration,
}

impl SchedulerService {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        messenger: Arc<dyn Messenger>,
        delivery_timeout: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            directory,
            messenger,
            jobs: Mutex::new(HashMap::new()),
            delivery_timeout,
        })
    }

    /// Install a recurring job for a task, replacing any existing job for
    /// the same task id. The replace happens under the table lock, so a
    /// redelivered change-feed event or a cadence edit never leaves two
    /// timers alive for one id. A rejected install also removes any
    /// existing job — the id ends unscheduled either way, never firing on
    /// a cadence the task no longer has.
    pub async fn install(
        &self,
        task_id: i64,
        start: DateTime<Utc>,
        recurrence: Recurrence,
        payload: ReminderPayload,
    ) -> Result<(), AuraError> {
        if !recurrence.is_valid() {
            if self.cancel(task_id).await {
                warn!("task {task_id}: cadence edited to an invalid value, job removed");
            }
            return Err(AuraError::Scheduler(format!(
                "task {task_id}: degenerate recurrence ({recurrence}), refusing to schedule"
            )));
        }

        let first = first_fire(start, recurrence, Utc::now());

        let mut jobs = self.jobs.lock().await;
        if let Some(old) = jobs.remove(&task_id) {
            old.handle.abort();
            info!("task {task_id}: replacing existing job");
        }

        let directory = self.directory.clone();
        let messenger = self.messenger.clone();
        let timeout = self.delivery_timeout;
        let handle = tokio::spawn(async move {
            fire_loop(directory, messenger, task_id, recurrence, first, payload, timeout).await;
        });

        jobs.insert(
            task_id,
            Job {
                handle,
                recurrence,
                first_fire: first,
            },
        );

        info!("task {task_id}: scheduled {recurrence}, first fire at {first}");
        Ok(())
    }

    /// Remove a task's job. No-op if absent; returns whether a job existed.
    pub async fn cancel(&self, task_id: i64) -> bool {
        let mut jobs = self.jobs.lock().await;
        match jobs.remove(&task_id) {
            Some(job) => {
                job.handle.abort();
                info!("task {task_id}: job cancelled");
                true
            }
            None => false,
        }
    }

    /// Number of installed jobs.
    pub async fn job_count(&self) -> usize {
        self.jobs.lock().await.len()
    }

    /// Recurrence and first-fire time of an installed job.
    pub async fn job_info(&self, task_id: i64) -> Option<(Recurrence, DateTime<Utc>)> {
        self.jobs
            .lock()
            .await
            .get(&task_id)
            .map(|j| (j.recurrence, j.first_fire))
    }

    /// Abort all jobs. Used on shutdown.
    pub async fn shutdown(&self) {
        let mut jobs = self.jobs.lock().await;
        let n = jobs.len();
        for (_, job) in jobs.drain() {
            job.handle.abort();
        }
        if n > 0 {
            info!("scheduler stopped, {n} jobs aborted");
        }
    }
}

/// Sleep-fire loop for one job. Each fire resolves the owner's address at
/// fire time and advances on the grid anchored at the scheduled time.
async fn fire_loop(
    directory: Arc<dyn UserDirectory>,
    messenger: Arc<dyn Messenger>,
    task_id: i64,
    recurrence: Recurrence,
    mut next: DateTime<Utc>,
    payload: ReminderPayload,
    timeout: Duration,
) {
    loop {
        let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        tokio::time::sleep(wait).await;

        fire_once(&*directory, &*messenger, task_id, &payload, timeout).await;

        next = advance(next, recurrence);
    }
}

/// One fire: resolve the delivery address, deliver bounded by a timeout.
/// Every failure mode is logged and swallowed — the job survives and the
/// next scheduled fire still happens.
async fn fire_once(
    directory: &dyn UserDirectory,
    messenger: &dyn Messenger,
    task_id: i64,
    payload: &ReminderPayload,
    timeout: Duration,
) {
    let address = match directory.delivery_address(payload.user_id).await {
        Ok(Some(addr)) => addr,
        Ok(None) => {
            warn!(
                "task {task_id}: user {} not found, skipping fire",
                payload.user_id
            );
            return;
        }
        Err(e) => {
            warn!("task {task_id}: address lookup failed, skipping fire: {e}");
            return;
        }
    };

    match tokio::time::timeout(timeout, messenger.deliver(&address, &payload.content)).await {
        Ok(Ok(())) => info!("task {task_id}: reminder delivered to {address}"),
        Ok(Err(e)) => warn!("task {task_id}: delivery failed: {e}"),
        Err(_) => warn!("task {task_id}: delivery timed out after {timeout:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;

    struct RecordingMessenger {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
        hang: bool,
    }

    impl RecordingMessenger {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                fail: false,
                hang: false,
            })
        }
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        fn name(&self) -> &str {
            "recording"
        }

        async fn deliver(&self, address: &str, text: &str) -> Result<(), AuraError> {
            if self.hang {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            if self.fail {
                return Err(AuraError::Channel("simulated outage".to_string()));
            }
            self.sent
                .lock()
                .await
                .push((address.to_string(), text.to_string()));
            Ok(())
        }
    }

    struct StaticDirectory {
        address: Option<String>,
    }

    #[async_trait]
    impl UserDirectory for StaticDirectory {
        async fn delivery_address(&self, _user_id: i64) -> Result<Option<String>, AuraError> {
            Ok(self.address.clone())
        }
    }

    fn payload() -> ReminderPayload {
        ReminderPayload {
            user_id: 1,
            content: "drink water".to_string(),
        }
    }

    fn scheduler(messenger: Arc<RecordingMessenger>) -> Arc<SchedulerService> {
        let directory = Arc::new(StaticDirectory {
            address: Some("5511999".to_string()),
        });
        SchedulerService::new(directory, messenger, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_install_is_idempotent_per_task_id() {
        let sched = scheduler(RecordingMessenger::new());
        let start = Utc::now();

        for _ in 0..3 {
            sched
                .install(42, start, Recurrence::Hours(12), payload())
                .await
                .unwrap();
        }

        assert_eq!(sched.job_count().await, 1);
        let (rec, _) = sched.job_info(42).await.unwrap();
        assert_eq!(rec, Recurrence::Hours(12));
    }

    #[tokio::test]
    async fn test_install_replaces_recurrence() {
        let sched = scheduler(RecordingMessenger::new());
        let start = Utc::now();

        sched
            .install(7, start, Recurrence::Days(2), payload())
            .await
            .unwrap();
        sched
            .install(7, start, Recurrence::Hours(6), payload())
            .await
            .unwrap();

        assert_eq!(sched.job_count().await, 1);
        let (rec, _) = sched.job_info(7).await.unwrap();
        assert_eq!(rec, Recurrence::Hours(6));
    }

    #[tokio::test]
    async fn test_install_rejects_degenerate_recurrence() {
        let sched = scheduler(RecordingMessenger::new());

        let err = sched
            .install(9, Utc::now(), Recurrence::Hours(0), payload())
            .await;
        assert!(err.is_err());
        assert_eq!(sched.job_count().await, 0);
    }

    #[tokio::test]
    async fn test_invalid_reinstall_unschedules_existing_job() {
        let sched = scheduler(RecordingMessenger::new());
        sched
            .install(7, Utc::now(), Recurrence::Days(1), payload())
            .await
            .unwrap();
        assert_eq!(sched.job_count().await, 1);

        // Editing the cadence to a degenerate value must not leave the
        // old job firing.
        let err = sched
            .install(7, Utc::now(), Recurrence::Hours(0), payload())
            .await;
        assert!(err.is_err());
        assert_eq!(sched.job_count().await, 0);
    }

    #[tokio::test]
    async fn test_cancel_removes_job_and_is_noop_when_absent() {
        let sched = scheduler(RecordingMessenger::new());
        sched
            .install(5, Utc::now(), Recurrence::Days(1), payload())
            .await
            .unwrap();

        assert!(sched.cancel(5).await);
        assert_eq!(sched.job_count().await, 0);
        assert!(!sched.cancel(5).await);
    }

    #[tokio::test]
    async fn test_first_fire_anchored_at_task_creation() {
        let sched = scheduler(RecordingMessenger::new());
        let created_at = Utc::now();

        sched
            .install(42, created_at, Recurrence::Hours(12), payload())
            .await
            .unwrap();

        let (_, first) = sched.job_info(42).await.unwrap();
        assert_eq!(first, created_at + ChronoDuration::hours(12));
    }

    #[tokio::test]
    async fn test_fire_once_delivers_to_current_address() {
        let messenger = RecordingMessenger::new();
        let directory = StaticDirectory {
            address: Some("5511000".to_string()),
        };

        fire_once(
            &directory,
            &*messenger,
            1,
            &payload(),
            Duration::from_secs(5),
        )
        .await;

        let sent = messenger.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], ("5511000".to_string(), "drink water".to_string()));
    }

    #[tokio::test]
    async fn test_fire_once_skips_missing_user() {
        let messenger = RecordingMessenger::new();
        let directory = StaticDirectory { address: None };

        fire_once(
            &directory,
            &*messenger,
            1,
            &payload(),
            Duration::from_secs(5),
        )
        .await;

        assert!(messenger.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_fire_once_survives_delivery_failure() {
        let messenger = Arc::new(RecordingMessenger {
            sent: Mutex::new(Vec::new()),
            fail: true,
            hang: false,
        });
        let directory = StaticDirectory {
            address: Some("5511999".to_string()),
        };

        // Must return normally — failure is logged, not propagated.
        fire_once(
            &directory,
            &*messenger,
            1,
            &payload(),
            Duration::from_secs(5),
        )
        .await;

        assert!(messenger.sent.lock().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_once_bounds_delivery_with_timeout() {
        let messenger = Arc::new(RecordingMessenger {
            sent: Mutex::new(Vec::new()),
            fail: false,
            hang: true,
        });
        let directory = StaticDirectory {
            address: Some("5511999".to_string()),
        };

        // A hanging messenger must not block the fire path forever.
        fire_once(
            &directory,
            &*messenger,
            1,
            &payload(),
            Duration::from_millis(100),
        )
        .await;

        assert!(messenger.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_aborts_all_jobs() {
        let sched = scheduler(RecordingMessenger::new());
        for id in 1..=4 {
            sched
                .install(id, Utc::now(), Recurrence::Days(1), payload())
                .await
                .unwrap();
        }
        assert_eq!(sched.job_count().await, 4);

        sched.shutdown().await;
        assert_eq!(sched.job_count().await, 0);
    }
}
