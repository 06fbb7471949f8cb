use tokio::sync::RwLock;

use log::info;

use crate::error::SendError;

/// Default base URL of the WhatsApp Business API.
pub const DEFAULT_API_BASE: &str = "https://graph.facebook.com/v22.0";

/// Default timeout for the outbound provider call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Immutable startup configuration, read from the environment once.
/// Credentials may be empty here; they can be supplied later through
/// `POST /update-token`.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api_base: String,
    pub request_timeout_secs: u64,
    pub token: String,
    pub phone_number_id: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let api_base =
            std::env::var("WABA_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let request_timeout_secs: u64 = std::env::var("WABA_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let token = std::env::var("WABA_TOKEN").unwrap_or_default();
        let phone_number_id = std::env::var("WABA_PHONE_NUMBER_ID").unwrap_or_default();

        Self {
            port,
            api_base,
            request_timeout_secs,
            token,
            phone_number_id,
        }
    }
}

/// The auth token and sender identifier used for outbound calls.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub token: String,
    pub phone_number_id: String,
}

/// Process-wide credential state. After startup the `update` method is the
/// only mutator; the relay reads an owned snapshot per send, so an update
/// never affects a call already in flight.
pub struct CredentialStore {
    inner: RwLock<Credentials>,
}

impl CredentialStore {
    pub fn new(token: String, phone_number_id: String) -> Self {
        Self {
            inner: RwLock::new(Credentials {
                token,
                phone_number_id,
            }),
        }
    }

    pub async fn snapshot(&self) -> Credentials {
        self.inner.read().await.clone()
    }

    /// Overwrites the auth token. The phone number id is overwritten only
    /// when a non-empty value is supplied; otherwise the existing one is
    /// kept.
    pub async fn update(
        &self,
        token: &str,
        phone_number_id: Option<&str>,
    ) -> Result<(), SendError> {
        if token.is_empty() {
            return Err(SendError::Validation("token must not be empty".into()));
        }

        let mut creds = self.inner.write().await;
        creds.token = token.to_string();
        info!("WABA token updated");

        if let Some(id) = phone_number_id.filter(|id| !id.is_empty()) {
            creds.phone_number_id = id.to_string();
            info!("Phone number id updated: {}", id);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn update_rejects_empty_token_and_keeps_state() {
        let store = CredentialStore::new("old-token".into(), "111".into());

        let result = store.update("", Some("222")).await;
        assert!(matches!(result, Err(SendError::Validation(_))));

        let creds = store.snapshot().await;
        assert_eq!(creds.token, "old-token");
        assert_eq!(creds.phone_number_id, "111");
    }

    #[tokio::test]
    async fn update_without_phone_number_id_keeps_previous_one() {
        let store = CredentialStore::new("old-token".into(), "111".into());

        store.update("new-token", None).await.unwrap();

        let creds = store.snapshot().await;
        assert_eq!(creds.token, "new-token");
        assert_eq!(creds.phone_number_id, "111");
    }

    #[tokio::test]
    async fn update_with_empty_phone_number_id_keeps_previous_one() {
        let store = CredentialStore::new("old-token".into(), "111".into());

        store.update("new-token", Some("")).await.unwrap();

        let creds = store.snapshot().await;
        assert_eq!(creds.token, "new-token");
        assert_eq!(creds.phone_number_id, "111");
    }

    #[tokio::test]
    async fn update_overwrites_both_fields_when_supplied() {
        let store = CredentialStore::new("old-token".into(), "111".into());

        store.update("new-token", Some("222")).await.unwrap();

        let creds = store.snapshot().await;
        assert_eq!(creds.token, "new-token");
        assert_eq!(creds.phone_number_id, "222");
    }
}
