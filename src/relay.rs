use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info};
use reqwest::Client;
use serde_json::json;

use crate::config::CredentialStore;
use crate::error::SendError;

/// Issues the single outbound call to the WhatsApp Business API.
///
/// Credentials are read from the shared store at the start of each send, so
/// a token rotation applies to the next call, never to one in flight.
pub struct Relay {
    http: Client,
    api_base: String,
    credentials: Arc<CredentialStore>,
}

impl Relay {
    pub fn new(
        api_base: String,
        timeout_secs: u64,
        credentials: Arc<CredentialStore>,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_base,
            credentials,
        })
    }

    /// Sends one text message. Exactly one outbound POST per invocation, no
    /// retries.
    pub async fn send(&self, to: &str, message: &str) -> Result<(), SendError> {
        if to.is_empty() || message.is_empty() {
            return Err(SendError::Validation(
                "recipient and message are required".into(),
            ));
        }

        let creds = self.credentials.snapshot().await;
        if creds.token.is_empty() || creds.phone_number_id.is_empty() {
            return Err(SendError::Config(
                "WABA token and phone number id must be configured".into(),
            ));
        }

        let url = format!("{}/{}/messages", self.api_base, creds.phone_number_id);
        let payload = json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "text",
            "text": { "body": message },
        });

        info!("Sending message to {}", to);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&creds.token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() >= 300 {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read error response>".to_string());
            error!("Provider rejected message: status {}, body {}", status, body);
            return Err(SendError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        info!("Message to {} accepted by provider", to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relay_with(token: &str, phone_number_id: &str) -> Relay {
        let store = Arc::new(CredentialStore::new(
            token.to_string(),
            phone_number_id.to_string(),
        ));
        // An unroutable base: these tests must fail before any network call.
        Relay::new("http://127.0.0.1:1".to_string(), 1, store).unwrap()
    }

    #[tokio::test]
    async fn empty_recipient_is_rejected_before_any_call() {
        let relay = relay_with("token", "111");
        let result = relay.send("", "hello").await;
        assert!(matches!(result, Err(SendError::Validation(_))));
    }

    #[tokio::test]
    async fn empty_message_is_rejected_before_any_call() {
        let relay = relay_with("token", "111");
        let result = relay.send("5511999999999", "").await;
        assert!(matches!(result, Err(SendError::Validation(_))));
    }

    #[tokio::test]
    async fn missing_token_is_a_config_error() {
        let relay = relay_with("", "111");
        let result = relay.send("5511999999999", "hello").await;
        assert!(matches!(result, Err(SendError::Config(_))));
    }

    #[tokio::test]
    async fn missing_phone_number_id_is_a_config_error() {
        let relay = relay_with("token", "");
        let result = relay.send("5511999999999", "hello").await;
        assert!(matches!(result, Err(SendError::Config(_))));
    }
}
