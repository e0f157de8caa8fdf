//! WhatsApp Cloud API channel.
//!
//! Outbound messages go through the Graph API `/{phone_number_id}/messages`
//! endpoint; inbound messages arrive as webhook payloads parsed by
//! [`webhook::extract_message`].
//! Docs: <https://developers.facebook.com/docs/whatsapp/cloud-api>

pub mod webhook;


use async_trait::async_trait;
use aura_core::{config::WhatsAppConfig, error::AuraError, traits::Messenger};
use serde_json::json;
use tracing::{debug, info};

/// WhatsApp messenger using the Cloud API.
pub struct WhatsAppMessenger {
    config: WhatsAppConfig,
    client: reqwest::Client,
    base_url: String,
}

impl WhatsAppMessenger {
    /// Create a new messenger from config.
    pub fn new(config: WhatsAppConfig) -> Self {
        let base_url = format!(
            "https://graph.facebook.com/{}/{}",
            config.api_version, config.phone_number_id
        );
        Self {
            config,
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Whether the channel has the credentials it needs to send.
    pub fn is_configured(&self) -> bool {
        !self.config.token.is_empty() && !self.config.phone_number_id.is_empty()
    }
}

#[async_trait]
impl Messenger for WhatsAppMessenger {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn deliver(&self, address: &str, text: &str) -> Result<(), AuraError> {
        let url = format!("{}/messages", self.base_url);
        let payload = json!({
            "messaging_product": "whatsapp",
            "to": address,
            "type": "text",
            "text": { "body": text },
        });

        debug!("whatsapp: POST {url} to={address}");

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.token))
            .json(&payload)
            .send()
            .await
            .map_err(|e| AuraError::Channel(format!("whatsapp send failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AuraError::Channel(format!(
                "whatsapp returned {status}: {body}"
            )));
        }

        info!("whatsapp: message delivered to {address}");
        Ok(())
    }
}
