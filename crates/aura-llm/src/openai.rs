//! OpenAI-compatible chat-completions assistant.
//!
//! Works with OpenAI's API and any compatible endpoint. The topic is
//! requested as a dedicated `set_conversation_topic` tool call so a
//! malformed or missing classification degrades to "General" without
//! ever blocking the reply.

use async_trait::async_trait;
use aura_core::{
    config::LlmConfig,
    error::AuraError,
    model::{Role, DEFAULT_TOPIC},
    traits::{Assistant, AssistantTurn, ToolCall},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

/// Reply used when the model returns a tool call with no text content.
const FALLBACK_REPLY: &str = "Got it!";

const SYSTEM_PROMPT: &str = "You are Aura, a personalized, empathetic WhatsApp-based \
personal assistant. Your mission is to help users organize their lives, set reminders, \
track goals, and provide helpful support across various life domains. Your tone is warm, \
supportive, and professional. You celebrate achievements and offer gentle encouragement. \
Based on the user's message, provide a conversational reply. If the user wants to set a \
reminder or a goal, call the appropriate tool. The user-facing reply should acknowledge \
the action if a tool is called (e.g., 'Okay, I've set that reminder for you!'). Also, \
determine a one or two-word topic for the current conversation (e.g., 'Work', 'Health', \
'Personal', 'Finance') and set it with the set_conversation_topic tool.";

/// OpenAI-compatible assistant.
pub struct OpenAiAssistant {
    client: reqwest::Client,
    config: LlmConfig,
}

impl OpenAiAssistant {
    /// Create from config values.
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Whether an API key is present.
    pub fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    fn tools() -> serde_json::Value {
        json!([
            {
                "type": "function",
                "function": {
                    "name": "create_reminder",
                    "description": "Creates a recurring reminder for the user.",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "content": { "type": "string", "description": "What to remind the user about." },
                            "frequency_days": { "type": "number", "description": "How often to remind, in days. May be fractional." }
                        },
                        "required": ["content"]
                    }
                }
            },
            {
                "type": "function",
                "function": {
                    "name": "create_goal",
                    "description": "Creates a goal the user wants to track.",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "content": { "type": "string", "description": "The goal to track." },
                            "frequency_days": { "type": "number", "description": "Check-in cadence, in days. May be fractional." }
                        },
                        "required": ["content"]
                    }
                }
            },
            {
                "type": "function",
                "function": {
                    "name": "set_conversation_topic",
                    "description": "Sets the topic of the conversation.",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "topic": { "type": "string", "description": "A one or two-word topic for the conversation." }
                        },
                        "required": ["topic"]
                    }
                }
            }
        ])
    }
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<ChatChoice>>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize, Default)]
pub(crate) struct ResponseMessage {
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Deserialize)]
pub(crate) struct ResponseToolCall {
    pub function: ResponseFunction,
}

#[derive(Deserialize)]
pub(crate) struct ResponseFunction {
    pub name: String,
    /// JSON-encoded arguments string, per the chat-completions format.
    pub arguments: String,
}

/// Fold the raw model message into an [`AssistantTurn`].
///
/// The topic tool call is consumed here; any other tool call is passed
/// through for the gateway to act on. Malformed arguments never fail the
/// turn — the topic stays "General" and the tool call is dropped.
pub(crate) fn parse_turn(message: ResponseMessage) -> AssistantTurn {
    let mut topic = DEFAULT_TOPIC.to_string();
    let mut tool_call = None;

    for call in message.tool_calls.unwrap_or_default() {
        if call.function.name == "set_conversation_topic" {
            match serde_json::from_str::<serde_json::Value>(&call.function.arguments) {
                Ok(args) => {
                    if let Some(t) = args.get("topic").and_then(|t| t.as_str()) {
                        topic = t.to_string();
                    }
                }
                Err(e) => warn!("llm: unparsable topic arguments, keeping default: {e}"),
            }
            continue;
        }

        match serde_json::from_str::<serde_json::Value>(&call.function.arguments) {
            Ok(arguments) => {
                tool_call = Some(ToolCall {
                    name: call.function.name,
                    arguments,
                });
            }
            Err(e) => warn!(
                "llm: dropping tool call '{}' with unparsable arguments: {e}",
                call.function.name
            ),
        }
    }

    AssistantTurn {
        reply: message
            .content
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| FALLBACK_REPLY.to_string()),
        topic,
        tool_call,
    }
}

#[async_trait]
impl Assistant for OpenAiAssistant {
    async fn respond(&self, history: &[(Role, String)]) -> Result<AssistantTurn, AuraError> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage {
            role: "system",
            content: SYSTEM_PROMPT.to_string(),
        });
        for (role, content) in history {
            messages.push(ChatMessage {
                role: match role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                content: content.clone(),
            });
        }

        let body = json!({
            "model": self.config.model,
            "messages": messages,
            "tools": Self::tools(),
            "tool_choice": "auto",
        });

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        debug!("llm: POST {url} model={}", self.config.model);

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| AuraError::Llm(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AuraError::Llm(format!("llm returned {status}: {text}")));
        }

        let parsed: ChatCompletionResponse = resp
            .json()
            .await
            .map_err(|e| AuraError::Llm(format!("failed to parse response: {e}")))?;

        let message = parsed
            .choices
            .and_then(|mut c| c.drain(..).next())
            .and_then(|c| c.message)
            .unwrap_or_default();

        Ok(parse_turn(message))
    }
}
