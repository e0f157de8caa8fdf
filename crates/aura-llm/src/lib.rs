//! # aura-llm
//!
//! OpenAI-compatible chat-completions glue: one call produces the
//! user-facing reply, the conversation topic, and an optional
//! task-creating tool call.

pub mod openai;

pub use openai::OpenAiAssistant;
