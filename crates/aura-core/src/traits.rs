use crate::{
    error::AuraError,
    model::{Role, Task},
};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

/// Messaging gateway — delivers text to a user's address.
///
/// Used both for assistant replies on the webhook path and for reminder
/// fires from the scheduler.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Deliver `text` to `address` (a wa_id phone number).
    async fn deliver(&self, address: &str, text: &str) -> Result<(), AuraError>;
}

/// A tool call requested by the language model alongside its reply.
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub name: String,
    /// Decoded JSON arguments, as sent by the model.
    pub arguments: Value,
}

/// The language-model collaborator's output for one turn.
#[derive(Debug, Clone)]
pub struct AssistantTurn {
    /// User-facing reply text.
    pub reply: String,
    /// Classified topic for the current conversation. Defaults to
    /// "General" when classification is missing or malformed.
    pub topic: String,
    /// Optional task-creating tool call.
    pub tool_call: Option<ToolCall>,
}

/// Language-model collaborator: given recent history, produce a reply,
/// a conversation topic, and optionally a tool call.
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn respond(&self, history: &[(Role, String)]) -> Result<AssistantTurn, AuraError>;
}

/// Row-level event kinds a change feed can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEventKind {
    Insert,
    Update,
}

/// Push stream of row-level events from the store, at-least-once.
///
/// A closed receiver means the subscription was lost (disconnect or
/// overflow); subscribers are expected to re-subscribe with backoff and
/// reconcile from the store.
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    async fn subscribe(
        &self,
        table: &str,
        kind: FeedEventKind,
    ) -> Result<mpsc::Receiver<Value>, AuraError>;
}

/// Resolves a user's current delivery address. The scheduler looks the
/// address up at fire time so a changed phone number is honored.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn delivery_address(&self, user_id: i64) -> Result<Option<String>, AuraError>;
}

/// Lists currently-active tasks for the reconciliation pass.
#[async_trait]
pub trait TaskSource: Send + Sync {
    async fn list_active_tasks(&self) -> Result<Vec<Task>, AuraError>;
}
