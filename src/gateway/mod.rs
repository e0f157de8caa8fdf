//! Inbound message pipeline.
//!
//! One webhook delivery flows through here: user bootstrap, provisional
//! attach, LLM turn, topic resolution, task tool calls, and the outbound
//! reply. Every stage after the provisional attach degrades instead of
//! failing — once the user's message is in the log, they get an answer.

mod router;

use std::sync::Arc;

use aura_channels::whatsapp::webhook::InboundMessage;
use aura_core::{
    model::{Modality, Role, TaskKind, User},
    traits::{Assistant, Messenger, ToolCall},
};
use aura_store::Store;
use tracing::{error, info, warn};

pub use router::TopicRouter;

/// Apology sent when the language model is unreachable. The inbound
/// message is already persisted at that point, so nothing is lost.
const REPLY_ON_LLM_ERROR: &str =
    "Sorry, I'm having trouble thinking right now. Please try again in a moment.";

/// Cadence defaults (in days) applied when a task tool call carries no
/// explicit frequency.
fn default_frequency(personality: Option<&str>) -> f64 {
    match personality {
        Some("anxious") => 2.0,
        _ => 0.5,
    }
}

pub struct Gateway {
    store: Store,
    assistant: Arc<dyn Assistant>,
    messenger: Arc<dyn Messenger>,
    router: TopicRouter,
    history_limit: usize,
}

impl Gateway {
    pub fn new(
        store: Store,
        assistant: Arc<dyn Assistant>,
        messenger: Arc<dyn Messenger>,
        history_limit: usize,
    ) -> Self {
        let router = TopicRouter::new(store.clone());
        Self {
            store,
            assistant,
            messenger,
            router,
            history_limit,
        }
    }

    /// Handle one inbound message end to end. Returns the status string
    /// the webhook reports back; the webhook itself never errors.
    pub async fn handle_inbound(&self, inbound: &InboundMessage) -> &'static str {
        if inbound.is_audio() {
            // Voice notes arrive but transcription is not wired up.
            info!(
                "audio message from {} ignored (no transcription configured)",
                inbound.sender
            );
            return "ignored (no valid input)";
        }
        let text = match inbound.text.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => return "ignored (no valid input)",
        };

        let user = match self
            .store
            .get_or_create_user(&inbound.sender, inbound.sender_name.as_deref())
            .await
        {
            Ok(user) => user,
            Err(e) => {
                error!("failed to resolve user {}: {e}", inbound.sender);
                return "error";
            }
        };

        // The message must be durable before the LLM sees it.
        let provisional = match self
            .router
            .provisional_attach(user.id, text, Modality::Text)
            .await
        {
            Ok(p) => p,
            Err(e) => {
                error!("failed to log message from {}: {e}", inbound.sender);
                return "error";
            }
        };

        let history = match self.store.recent_messages(user.id, self.history_limit).await {
            Ok(history) => history,
            Err(e) => {
                warn!("history load failed, answering from this message alone: {e}");
                vec![(Role::User, text.to_string())]
            }
        };

        let turn = match self.assistant.respond(&history).await {
            Ok(turn) => turn,
            Err(e) => {
                error!("assistant call failed: {e}");
                self.deliver(&user.phone, REPLY_ON_LLM_ERROR).await;
                return "received";
            }
        };

        let resolution = self.router.resolve(&provisional, &turn.topic).await;

        // Notice goes out before the reply so the thread switch reads in
        // order on the user's side.
        if let Some(previous) = &resolution.switched_from {
            self.deliver(
                &user.phone,
                &format!("(Switching topics: {previous} \u{2192} {}.)", turn.topic),
            )
            .await;
        }

        if let Err(e) = self
            .store
            .append_message(
                resolution.conversation_id,
                Role::Assistant,
                &turn.reply,
                Modality::Text,
            )
            .await
        {
            error!("failed to log assistant reply: {e}");
        }

        if let Some(call) = &turn.tool_call {
            self.execute_tool(&user, resolution.conversation_id, call)
                .await;
        }

        self.deliver(&user.phone, &turn.reply).await;
        "received"
    }

    /// Act on a task-creating tool call. Failures are logged and
    /// swallowed; the reply is delivered either way.
    async fn execute_tool(&self, user: &User, conversation_id: i64, call: &ToolCall) {
        let kind = match call.name.as_str() {
            "create_reminder" => TaskKind::Reminder,
            "create_goal" => TaskKind::Goal,
            other => {
                warn!("unknown tool call '{other}' ignored");
                return;
            }
        };

        let content = match call.arguments.get("content").and_then(|c| c.as_str()) {
            Some(c) if !c.is_empty() => c,
            _ => {
                warn!("tool call '{}' missing content, ignored", call.name);
                return;
            }
        };

        // An explicit model-supplied cadence wins; the personality trait
        // only fills the gap.
        let freq = call
            .arguments
            .get("frequency_days")
            .and_then(|f| f.as_f64())
            .unwrap_or_else(|| default_frequency(user.personality.as_deref()));

        match self
            .store
            .create_task(user.id, conversation_id, kind, content, freq)
            .await
        {
            Ok(task) => info!(
                "created {} task {} for user {} (freq {freq} days)",
                kind.as_str(),
                task.id,
                user.id
            ),
            Err(e) => error!("task creation failed, reply still goes out: {e}"),
        }
    }

    async fn deliver(&self, phone: &str, text: &str) {
        if let Err(e) = self.messenger.deliver(phone, text).await {
            error!("delivery via {} failed: {e}", self.messenger.name());
        }
    }
}
