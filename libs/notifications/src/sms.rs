//! SMS channel backed by an HTTP gateway (Eskiz-style API: bearer
//! token auth, JSON body with `mobile_phone` and `message`).

use crate::NotificationChannel;
use async_trait::async_trait;
use eyre::{Result, WrapErr, eyre};

/// SMS gateway configuration
#[derive(Clone)]
pub struct SmsConfig {
    /// Gateway base URL, e.g. "https://notify.eskiz.uz/api"
    pub base_url: String,
    /// Gateway bearer token
    pub token: String,
}

/// HTTP SMS gateway channel
pub struct SmsChannel {
    client: reqwest::Client,
    config: SmsConfig,
}

impl SmsChannel {
    pub fn new(config: SmsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a channel from environment variables
    /// (`SMS_GATEWAY_URL`, `SMS_GATEWAY_TOKEN`)
    pub fn from_env() -> Result<Self> {
        let config = SmsConfig {
            base_url: std::env::var("SMS_GATEWAY_URL").wrap_err("SMS_GATEWAY_URL not set")?,
            token: std::env::var("SMS_GATEWAY_TOKEN").wrap_err("SMS_GATEWAY_TOKEN not set")?,
        };

        Ok(Self::new(config))
    }
}

#[async_trait]
impl NotificationChannel for SmsChannel {
    async fn send(&self, to: &str, message: &str) -> Result<()> {
        let url = format!("{}/message/sms/send", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(&serde_json::json!({
                "mobile_phone": to,
                "message": message,
            }))
            .send()
            .await
            .wrap_err("SMS gateway request failed")?;

        if !response.status().is_success() {
            return Err(eyre!("SMS gateway returned {}", response.status()));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "sms"
    }
}
