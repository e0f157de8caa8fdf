#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::AuraError;

/// Top-level Aura configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub aura: AuraConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// General agent settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuraConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AuraConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Persistence config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// WhatsApp Cloud API config.
///
/// The access token is a secret — it is read from the `WHATSAPP_TOKEN`
/// env var when the TOML field is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub phone_number_id: String,
    #[serde(default = "default_graph_api_version")]
    pub api_version: String,
    /// Token expected on the `GET /webhook` verification handshake.
    /// Falls back to the `WEBHOOK_VERIFICATION_TOKEN` env var.
    #[serde(default)]
    pub verify_token: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            phone_number_id: String::new(),
            api_version: default_graph_api_version(),
            verify_token: String::new(),
        }
    }
}

/// Language-model collaborator config (OpenAI-compatible endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Falls back to the `OPENAI_KEY` env var when empty.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// How many recent messages are replayed as chat history.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            history_limit: default_history_limit(),
        }
    }
}

/// Reminder scheduler config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Upper bound on one reminder delivery attempt. A timeout is a
    /// delivery failure, not a crash.
    #[serde(default = "default_delivery_timeout")]
    pub delivery_timeout_secs: u64,
    /// Cap for the change-feed reconnect backoff.
    #[serde(default = "default_reconnect_max")]
    pub reconnect_max_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            delivery_timeout_secs: default_delivery_timeout(),
            reconnect_max_secs: default_reconnect_max(),
        }
    }
}

/// Webhook HTTP server config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            port: default_api_port(),
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file, then apply env-var overrides for
/// secrets. Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, AuraError> {
    let path = Path::new(path);
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AuraError::Config(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| AuraError::Config(format!("failed to parse config: {e}")))?
    } else {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

/// Secrets come from the environment when the TOML fields are empty.
fn apply_env_overrides(config: &mut Config) {
    if config.whatsapp.token.is_empty() {
        if let Ok(v) = std::env::var("WHATSAPP_TOKEN") {
            config.whatsapp.token = v;
        }
    }
    if config.whatsapp.verify_token.is_empty() {
        if let Ok(v) = std::env::var("WEBHOOK_VERIFICATION_TOKEN") {
            config.whatsapp.verify_token = v;
        }
    }
    if config.llm.api_key.is_empty() {
        if let Ok(v) = std::env::var("OPENAI_KEY") {
            config.llm.api_key = v;
        }
    }
}

fn default_name() -> String {
    "Aura".to_string()
}
fn default_data_dir() -> String {
    "~/.aura".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_db_path() -> String {
    "~/.aura/aura.db".to_string()
}
fn default_graph_api_version() -> String {
    "v22.0".to_string()
}
fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_llm_model() -> String {
    "gpt-4o".to_string()
}
fn default_history_limit() -> usize {
    20
}
fn default_delivery_timeout() -> u64 {
    30
}
fn default_reconnect_max() -> u64 {
    60
}
fn default_api_host() -> String {
    "0.0.0.0".to_string()
}
fn default_api_port() -> u16 {
    8000
}
