//! SQLite-backed persistent store.

use async_trait::async_trait;
use aura_core::{
    config::{shellexpand, StoreConfig},
    error::AuraError,
    model::{Conversation, ConversationStatus, Modality, Role, StoredMessage, Task, TaskKind, User},
    traits::{FeedEventKind, TaskSource, UserDirectory},
};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{info, warn};

use crate::feed::TaskFeed;

/// Persistent store backed by SQLite.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    feed: TaskFeed,
}

impl Store {
    /// Create a new store, running migrations on first use.
    pub async fn new(config: &StoreConfig) -> Result<Self, AuraError> {
        let db_path = shellexpand(&config.db_path);

        // Ensure parent directory exists.
        if let Some(parent) = std::path::Path::new(&db_path).parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AuraError::Store(format!("failed to create data dir: {e}")))?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AuraError::Store(format!("invalid db path: {e}")))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(opts)
            .await
            .map_err(|e| AuraError::Store(format!("failed to connect to sqlite: {e}")))?;

        Self::run_migrations(&pool).await?;

        info!("Store initialized at {db_path}");

        Ok(Self {
            pool,
            feed: TaskFeed::new(),
        })
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Cloneable handle to the task change feed.
    pub fn feed(&self) -> TaskFeed {
        self.feed.clone()
    }

    /// Run SQL migrations, tracking which have already been applied.
    async fn run_migrations(pool: &SqlitePool) -> Result<(), AuraError> {
        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS _migrations (
                name TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .execute(pool)
        .await
        .map_err(|e| AuraError::Store(format!("failed to create migrations table: {e}")))?;

        let migrations: &[(&str, &str)] =
            &[("001_init", include_str!("../migrations/001_init.sql"))];

        for (name, sql) in migrations {
            let applied: Option<(String,)> =
                sqlx::query_as("SELECT name FROM _migrations WHERE name = ?")
                    .bind(name)
                    .fetch_optional(pool)
                    .await
                    .map_err(|e| {
                        AuraError::Store(format!("failed to check migration {name}: {e}"))
                    })?;

            if applied.is_some() {
                continue;
            }

            sqlx::raw_sql(sql)
                .execute(pool)
                .await
                .map_err(|e| AuraError::Store(format!("migration {name} failed: {e}")))?;

            sqlx::query("INSERT INTO _migrations (name) VALUES (?)")
                .bind(name)
                .execute(pool)
                .await
                .map_err(|e| AuraError::Store(format!("failed to record migration {name}: {e}")))?;
        }
        Ok(())
    }

    // --- Users ---

    /// Look up a user by phone, creating the row on first contact.
    pub async fn get_or_create_user(
        &self,
        phone: &str,
        name: Option<&str>,
    ) -> Result<User, AuraError> {
        if let Some(user) = self.user_by_phone(phone).await? {
            return Ok(user);
        }

        let now = now_ts();
        let result = sqlx::query(
            "INSERT INTO users (phone, name, created_at) VALUES (?, ?, ?) \
             ON CONFLICT(phone) DO NOTHING",
        )
        .bind(phone)
        .bind(name)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AuraError::Store(format!("insert user failed: {e}")))?;

        if result.rows_affected() > 0 {
            info!("new user registered: {phone}");
        }

        // Re-read so a concurrent insert still resolves to one row.
        self.user_by_phone(phone)
            .await?
            .ok_or_else(|| AuraError::Store(format!("user {phone} missing after insert")))
    }

    async fn user_by_phone(&self, phone: &str) -> Result<Option<User>, AuraError> {
        let row: Option<(i64, String, Option<String>, Option<String>, String)> = sqlx::query_as(
            "SELECT id, phone, name, personality, created_at FROM users WHERE phone = ?",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuraError::Store(format!("query failed: {e}")))?;

        row.map(user_from_row).transpose()
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>, AuraError> {
        let row: Option<(i64, String, Option<String>, Option<String>, String)> = sqlx::query_as(
            "SELECT id, phone, name, personality, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuraError::Store(format!("query failed: {e}")))?;

        row.map(user_from_row).transpose()
    }

    /// Update a user's phone number. Reminder fires resolve the address
    /// at fire time, so this takes effect before the next delivery.
    pub async fn set_user_phone(&self, id: i64, phone: &str) -> Result<(), AuraError> {
        sqlx::query("UPDATE users SET phone = ? WHERE id = ?")
            .bind(phone)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AuraError::Store(format!("update failed: {e}")))?;
        Ok(())
    }

    // --- Conversations ---

    /// The most recently started open conversation for a user, if any.
    pub async fn latest_open_conversation(
        &self,
        user_id: i64,
    ) -> Result<Option<Conversation>, AuraError> {
        let row: Option<(i64, i64, String, String, String)> = sqlx::query_as(
            "SELECT id, user_id, topic, status, created_at FROM conversations \
             WHERE user_id = ? AND status = 'open' \
             ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuraError::Store(format!("query failed: {e}")))?;

        row.map(conversation_from_row).transpose()
    }

    /// The open conversation with an exact topic match, if any.
    /// The schema invariant is at most one such row per (user, topic).
    pub async fn open_conversation_by_topic(
        &self,
        user_id: i64,
        topic: &str,
    ) -> Result<Option<Conversation>, AuraError> {
        let row: Option<(i64, i64, String, String, String)> = sqlx::query_as(
            "SELECT id, user_id, topic, status, created_at FROM conversations \
             WHERE user_id = ? AND status = 'open' AND topic = ? \
             ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(user_id)
        .bind(topic)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuraError::Store(format!("query failed: {e}")))?;

        row.map(conversation_from_row).transpose()
    }

    /// Open a conversation for (user, topic). The schema allows only one
    /// open row per pair, so losing a race to a concurrent writer returns
    /// that writer's row instead of a duplicate.
    pub async fn create_conversation(
        &self,
        user_id: i64,
        topic: &str,
    ) -> Result<Conversation, AuraError> {
        let now = now_ts();
        let result = sqlx::query(
            "INSERT INTO conversations (user_id, topic, status, created_at) \
             VALUES (?, ?, 'open', ?) \
             ON CONFLICT(user_id, topic) WHERE status = 'open' DO NOTHING",
        )
        .bind(user_id)
        .bind(topic)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AuraError::Store(format!("insert conversation failed: {e}")))?;

        if result.rows_affected() == 0 {
            return self
                .open_conversation_by_topic(user_id, topic)
                .await?
                .ok_or_else(|| {
                    AuraError::Store(format!(
                        "open conversation for topic '{topic}' missing after conflict"
                    ))
                });
        }

        Ok(Conversation {
            id: result.last_insert_rowid(),
            user_id,
            topic: topic.to_string(),
            status: ConversationStatus::Open,
            created_at: parse_ts(&now)?,
        })
    }

    /// Relabel a conversation in place.
    pub async fn set_conversation_topic(&self, id: i64, topic: &str) -> Result<(), AuraError> {
        sqlx::query("UPDATE conversations SET topic = ? WHERE id = ?")
            .bind(topic)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AuraError::Store(format!("update failed: {e}")))?;
        Ok(())
    }

    pub async fn close_conversation(&self, id: i64) -> Result<(), AuraError> {
        sqlx::query("UPDATE conversations SET status = 'closed' WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AuraError::Store(format!("update failed: {e}")))?;
        Ok(())
    }

    pub async fn conversation(&self, id: i64) -> Result<Option<Conversation>, AuraError> {
        let row: Option<(i64, i64, String, String, String)> = sqlx::query_as(
            "SELECT id, user_id, topic, status, created_at FROM conversations WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuraError::Store(format!("query failed: {e}")))?;

        row.map(conversation_from_row).transpose()
    }

    // --- Messages ---

    /// Append a message to a conversation. Returns the new message id.
    pub async fn append_message(
        &self,
        conversation_id: i64,
        role: Role,
        content: &str,
        modality: Modality,
    ) -> Result<i64, AuraError> {
        let now = now_ts();
        let result = sqlx::query(
            "INSERT INTO messages (conversation_id, role, content, modality, timestamp) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(conversation_id)
        .bind(role.as_str())
        .bind(content)
        .bind(modality.as_str())
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AuraError::Store(format!("insert message failed: {e}")))?;

        Ok(result.last_insert_rowid())
    }

    /// Rewrite a message's conversation reference — the router's one-time
    /// reassignment after topic resolution. History ordering is by
    /// timestamp, so the moved message lands at the tail of its
    /// destination conversation.
    pub async fn move_message(
        &self,
        message_id: i64,
        conversation_id: i64,
    ) -> Result<(), AuraError> {
        sqlx::query("UPDATE messages SET conversation_id = ? WHERE id = ?")
            .bind(conversation_id)
            .bind(message_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AuraError::Store(format!("update failed: {e}")))?;
        Ok(())
    }

    /// All messages in one conversation, chronological.
    pub async fn conversation_messages(
        &self,
        conversation_id: i64,
    ) -> Result<Vec<StoredMessage>, AuraError> {
        let rows: Vec<(i64, i64, String, String, String, String)> = sqlx::query_as(
            "SELECT id, conversation_id, role, content, modality, timestamp FROM messages \
             WHERE conversation_id = ? ORDER BY timestamp ASC, id ASC",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuraError::Store(format!("query failed: {e}")))?;

        rows.into_iter().map(message_from_row).collect()
    }

    /// The user's most recent messages across all conversations,
    /// chronological — the history window handed to the LLM.
    pub async fn recent_messages(
        &self,
        user_id: i64,
        limit: usize,
    ) -> Result<Vec<(Role, String)>, AuraError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT m.role, m.content FROM messages m \
             JOIN conversations c ON c.id = m.conversation_id \
             WHERE c.user_id = ? \
             ORDER BY m.timestamp DESC, m.id DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuraError::Store(format!("query failed: {e}")))?;

        // Fetched newest-first, replayed oldest-first.
        Ok(rows
            .into_iter()
            .rev()
            .map(|(role, content)| (Role::parse(&role), content))
            .collect())
    }

    // --- Tasks ---

    /// Create a task and publish it on the change feed.
    pub async fn create_task(
        &self,
        user_id: i64,
        conversation_id: i64,
        kind: TaskKind,
        content: &str,
        freq: f64,
    ) -> Result<Task, AuraError> {
        let now = now_ts();
        let result = sqlx::query(
            "INSERT INTO tasks (user_id, conversation_id, kind, content, freq, active, created_at) \
             VALUES (?, ?, ?, ?, ?, 1, ?)",
        )
        .bind(user_id)
        .bind(conversation_id)
        .bind(kind.as_str())
        .bind(content)
        .bind(freq)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AuraError::Store(format!("insert task failed: {e}")))?;

        let task = Task {
            id: result.last_insert_rowid(),
            user_id,
            conversation_id,
            kind,
            content: content.to_string(),
            freq,
            active: true,
            created_at: parse_ts(&now)?,
        };

        self.feed.publish(FeedEventKind::Insert, &task);
        Ok(task)
    }

    pub async fn get_task(&self, id: i64) -> Result<Option<Task>, AuraError> {
        let row: Option<TaskRow> = sqlx::query_as(
            "SELECT id, user_id, conversation_id, kind, content, freq, active, created_at \
             FROM tasks WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuraError::Store(format!("query failed: {e}")))?;

        row.map(task_from_row).transpose()
    }

    /// Activate or deactivate a task and publish the update. Deactivation
    /// is how cancellation propagates to the scheduler.
    pub async fn set_task_active(&self, id: i64, active: bool) -> Result<(), AuraError> {
        sqlx::query("UPDATE tasks SET active = ? WHERE id = ?")
            .bind(active as i64)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AuraError::Store(format!("update failed: {e}")))?;

        self.publish_update(id).await;
        Ok(())
    }

    /// Change a task's cadence and publish the update so the scheduler
    /// reinstalls the job.
    pub async fn set_task_frequency(&self, id: i64, freq: f64) -> Result<(), AuraError> {
        sqlx::query("UPDATE tasks SET freq = ? WHERE id = ?")
            .bind(freq)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AuraError::Store(format!("update failed: {e}")))?;

        self.publish_update(id).await;
        Ok(())
    }

    async fn publish_update(&self, id: i64) {
        match self.get_task(id).await {
            Ok(Some(task)) => self.feed.publish(FeedEventKind::Update, &task),
            Ok(None) => warn!("task {id} missing after update, no feed event"),
            Err(e) => warn!("failed to re-read task {id} for feed event: {e}"),
        }
    }

    /// All currently-active tasks — the reconciliation source.
    pub async fn active_tasks(&self) -> Result<Vec<Task>, AuraError> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            "SELECT id, user_id, conversation_id, kind, content, freq, active, created_at \
             FROM tasks WHERE active = 1 ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuraError::Store(format!("query failed: {e}")))?;

        rows.into_iter().map(task_from_row).collect()
    }
}

#[async_trait]
impl UserDirectory for Store {
    async fn delivery_address(&self, user_id: i64) -> Result<Option<String>, AuraError> {
        Ok(self.get_user(user_id).await?.map(|u| u.phone))
    }
}

#[async_trait]
impl TaskSource for Store {
    async fn list_active_tasks(&self) -> Result<Vec<Task>, AuraError> {
        self.active_tasks().await
    }
}

type TaskRow = (i64, i64, i64, String, String, f64, i64, String);

fn now_ts() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(s: &str) -> Result<DateTime<Utc>, AuraError> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| AuraError::Store(format!("bad timestamp '{s}': {e}")))
}

fn user_from_row(
    (id, phone, name, personality, created_at): (i64, String, Option<String>, Option<String>, String),
) -> Result<User, AuraError> {
    Ok(User {
        id,
        phone,
        name,
        personality,
        created_at: parse_ts(&created_at)?,
    })
}

fn conversation_from_row(
    (id, user_id, topic, status, created_at): (i64, i64, String, String, String),
) -> Result<Conversation, AuraError> {
    Ok(Conversation {
        id,
        user_id,
        topic,
        status: ConversationStatus::parse(&status),
        created_at: parse_ts(&created_at)?,
    })
}

fn message_from_row(
    (id, conversation_id, role, content, modality, timestamp): (
        i64,
        i64,
        String,
        String,
        String,
        String,
    ),
) -> Result<StoredMessage, AuraError> {
    Ok(StoredMessage {
        id,
        conversation_id,
        role: Role::parse(&role),
        content,
        modality: Modality::parse(&modality),
        timestamp: parse_ts(&timestamp)?,
    })
}

fn task_from_row(
    (id, user_id, conversation_id, kind, content, freq, active, created_at): TaskRow,
) -> Result<Task, AuraError> {
    Ok(Task {
        id,
        user_id,
        conversation_id,
        kind: TaskKind::parse(&kind),
        content,
        freq,
        active: active != 0,
        created_at: parse_ts(&created_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_core::traits::ChangeFeed;
    use crate::feed::TASK_TABLE;

    async fn test_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let cfg = StoreConfig {
            db_path: dir
                .path()
                .join("test.db")
                .to_str()
                .unwrap()
                .to_string(),
        };
        let store = Store::new(&cfg).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_user_bootstrap_idempotent() {
        let (_dir, store) = test_store().await;
        let a = store.get_or_create_user("5511999", Some("Ana")).await.unwrap();
        let b = store.get_or_create_user("5511999", Some("Ana")).await.unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(b.name.as_deref(), Some("Ana"));

        let c = store.get_or_create_user("5511000", None).await.unwrap();
        assert_ne!(a.id, c.id);
    }

    #[tokio::test]
    async fn test_open_conversation_lookup_ignores_closed() {
        let (_dir, store) = test_store().await;
        let user = store.get_or_create_user("1", None).await.unwrap();

        let conv = store.create_conversation(user.id, "Health").await.unwrap();
        assert!(store
            .open_conversation_by_topic(user.id, "Health")
            .await
            .unwrap()
            .is_some());

        store.close_conversation(conv.id).await.unwrap();
        assert!(store
            .open_conversation_by_topic(user.id, "Health")
            .await
            .unwrap()
            .is_none());
        assert!(store
            .latest_open_conversation(user.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_one_open_conversation_per_user_topic() {
        let (_dir, store) = test_store().await;
        let user = store.get_or_create_user("1", None).await.unwrap();

        let a = store.create_conversation(user.id, "Health").await.unwrap();
        let b = store.create_conversation(user.id, "Health").await.unwrap();
        assert_eq!(a.id, b.id);

        // A second user or a closed thread does not collide.
        let other = store.get_or_create_user("2", None).await.unwrap();
        let c = store.create_conversation(other.id, "Health").await.unwrap();
        assert_ne!(c.id, a.id);

        store.close_conversation(a.id).await.unwrap();
        let reopened = store.create_conversation(user.id, "Health").await.unwrap();
        assert_ne!(reopened.id, a.id);
    }

    #[tokio::test]
    async fn test_phone_change_updates_delivery_address() {
        let (_dir, store) = test_store().await;
        let user = store.get_or_create_user("5511999", None).await.unwrap();

        store.set_user_phone(user.id, "5511000").await.unwrap();

        // The scheduler resolves the address at fire time through this path.
        let addr = store.delivery_address(user.id).await.unwrap();
        assert_eq!(addr.as_deref(), Some("5511000"));
    }

    #[tokio::test]
    async fn test_latest_open_conversation_is_most_recent() {
        let (_dir, store) = test_store().await;
        let user = store.get_or_create_user("1", None).await.unwrap();

        let _a = store.create_conversation(user.id, "Work").await.unwrap();
        let b = store.create_conversation(user.id, "Health").await.unwrap();

        let latest = store
            .latest_open_conversation(user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.id, b.id);
    }

    #[tokio::test]
    async fn test_move_message_lands_at_destination_tail() {
        let (_dir, store) = test_store().await;
        let user = store.get_or_create_user("1", None).await.unwrap();
        let work = store.create_conversation(user.id, "Work").await.unwrap();
        let health = store.create_conversation(user.id, "Health").await.unwrap();

        store
            .append_message(health.id, Role::User, "old", Modality::Text)
            .await
            .unwrap();
        let moved = store
            .append_message(work.id, Role::User, "new", Modality::Audio)
            .await
            .unwrap();
        store.move_message(moved, health.id).await.unwrap();

        let msgs = store.conversation_messages(health.id).await.unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[1].content, "new");
        assert_eq!(msgs[1].modality, Modality::Audio);
        assert!(store
            .conversation_messages(work.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_recent_messages_chronological_window() {
        let (_dir, store) = test_store().await;
        let user = store.get_or_create_user("1", None).await.unwrap();
        let conv = store.create_conversation(user.id, "General").await.unwrap();

        for i in 0..5 {
            store
                .append_message(conv.id, Role::User, &format!("m{i}"), Modality::Text)
                .await
                .unwrap();
        }

        let recent = store.recent_messages(user.id, 3).await.unwrap();
        let texts: Vec<&str> = recent.iter().map(|(_, c)| c.as_str()).collect();
        assert_eq!(texts, vec!["m2", "m3", "m4"]);
    }

    #[tokio::test]
    async fn test_create_task_publishes_insert_event() {
        let (_dir, store) = test_store().await;
        let user = store.get_or_create_user("1", None).await.unwrap();
        let conv = store.create_conversation(user.id, "Health").await.unwrap();

        let feed = store.feed();
        let mut rx = feed.subscribe(TASK_TABLE, FeedEventKind::Insert).await.unwrap();

        let task = store
            .create_task(user.id, conv.id, TaskKind::Reminder, "drink water", 0.5)
            .await
            .unwrap();

        let row = rx.recv().await.unwrap();
        let decoded: Task = serde_json::from_value(row).unwrap();
        assert_eq!(decoded.id, task.id);
        assert_eq!(decoded.freq, 0.5);
        assert!(decoded.active);
    }

    #[tokio::test]
    async fn test_deactivate_task_publishes_update_event() {
        let (_dir, store) = test_store().await;
        let user = store.get_or_create_user("1", None).await.unwrap();
        let conv = store.create_conversation(user.id, "Health").await.unwrap();
        let task = store
            .create_task(user.id, conv.id, TaskKind::Goal, "run daily", 1.0)
            .await
            .unwrap();

        let feed = store.feed();
        let mut rx = feed.subscribe(TASK_TABLE, FeedEventKind::Update).await.unwrap();

        store.set_task_active(task.id, false).await.unwrap();

        let row = rx.recv().await.unwrap();
        let decoded: Task = serde_json::from_value(row).unwrap();
        assert_eq!(decoded.id, task.id);
        assert!(!decoded.active);

        let active = store.active_tasks().await.unwrap();
        assert!(active.iter().all(|t| t.id != task.id));
    }

    #[tokio::test]
    async fn test_feed_rejects_unknown_table() {
        let (_dir, store) = test_store().await;
        let feed = store.feed();
        assert!(feed
            .subscribe("users", FeedEventKind::Insert)
            .await
            .is_err());
    }
}
