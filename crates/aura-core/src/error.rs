use thiserror::Error;

/// Top-level error type for Aura.
#[derive(Debug, Error)]
pub enum AuraError {
    /// Error from the persistence layer.
    #[error("store error: {0}")]
    Store(String),

    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Error from the language-model collaborator.
    #[error("llm error: {0}")]
    Llm(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Scheduler error (invalid recurrence, job bookkeeping).
    #[error("scheduler error: {0}")]
    Scheduler(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
