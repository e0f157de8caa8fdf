use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Topic assigned to a conversation before classification has run.
pub const DEFAULT_TOPIC: &str = "General";

/// A WhatsApp user, created on first inbound message from an unseen phone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    /// Phone number in wa_id form (digits only, country code included).
    pub phone: String,
    pub name: Option<String>,
    /// Personality trait — currently only drives the default task cadence.
    pub personality: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle state of a conversation thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Open,
    Closed,
}

impl ConversationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "closed" => Self::Closed,
            _ => Self::Open,
        }
    }
}

/// A conversation thread. At most one open conversation exists per
/// (user, topic) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub user_id: i64,
    pub topic: String,
    pub status: ConversationStatus,
    pub created_at: DateTime<Utc>,
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "assistant" => Self::Assistant,
            _ => Self::User,
        }
    }
}

/// How a message arrived or was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Audio,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Audio => "audio",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "audio" => Self::Audio,
            _ => Self::Text,
        }
    }
}

/// A stored message. Append-only; the only permitted mutation is the
/// router's one-time conversation reassignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: i64,
    pub conversation_id: i64,
    pub role: Role,
    pub content: String,
    pub modality: Modality,
    pub timestamp: DateTime<Utc>,
}

/// The kind of persistent task a tool call can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    Reminder,
    Goal,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reminder => "Reminder",
            Self::Goal => "Goal",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "Goal" => Self::Goal,
            _ => Self::Reminder,
        }
    }
}

/// A persistent task (reminder or goal) attached to a conversation.
///
/// `freq` is expressed in days and may be fractional (0.5 = every 12 hours).
/// Deactivated tasks are kept, never hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub conversation_id: i64,
    pub kind: TaskKind,
    pub content: String,
    pub freq: f64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
