//! Outbound notification channels (email, SMS) and the best-effort
//! dispatcher used by the user verification flow.
//!
//! Delivery is fire-and-forget by design: a failed channel is logged
//! and swallowed, and must never fail the request that triggered it.
//! There is no retry queue and no delivery confirmation.

pub mod email;
pub mod mock;
pub mod sms;

pub use email::{SmtpChannel, SmtpConfig};
pub use mock::MockChannel;
pub use sms::{SmsChannel, SmsConfig};

use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;

/// A single outbound delivery channel.
///
/// `to` is channel-specific: an email address or a phone number.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Send a message to a destination
    async fn send(&self, to: &str, message: &str) -> Result<()>;

    /// Channel name for logging
    fn name(&self) -> &'static str;
}

/// Fans a payload out to the configured channels, best-effort.
///
/// Unconfigured channels are silently skipped, so a deployment without
/// an SMS gateway still registers users.
#[derive(Clone, Default)]
pub struct Dispatcher {
    email: Option<Arc<dyn NotificationChannel>>,
    sms: Option<Arc<dyn NotificationChannel>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_email(mut self, channel: Arc<dyn NotificationChannel>) -> Self {
        self.email = Some(channel);
        self
    }

    pub fn with_sms(mut self, channel: Arc<dyn NotificationChannel>) -> Self {
        self.sms = Some(channel);
        self
    }

    /// Send over the email channel, swallowing failures.
    pub async fn send_email(&self, to: &str, message: &str) {
        Self::try_send(self.email.as_deref(), to, message).await;
    }

    /// Send over the SMS channel, swallowing failures.
    pub async fn send_sms(&self, to: &str, message: &str) {
        Self::try_send(self.sms.as_deref(), to, message).await;
    }

    /// Send the same payload over both channels. Each delivery is
    /// independent: one channel failing does not block the other.
    pub async fn broadcast(&self, email_to: &str, phone: &str, message: &str) {
        self.send_email(email_to, message).await;
        self.send_sms(phone, message).await;
    }

    async fn try_send(channel: Option<&dyn NotificationChannel>, to: &str, message: &str) {
        let Some(channel) = channel else {
            return;
        };

        match channel.send(to, message).await {
            Ok(()) => {
                tracing::debug!(channel = channel.name(), to = %to, "Notification delivered");
            }
            Err(e) => {
                tracing::warn!(
                    channel = channel.name(),
                    to = %to,
                    error = %e,
                    "Notification delivery failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_broadcast_reaches_both_channels() {
        let email = Arc::new(MockChannel::new("email"));
        let sms = Arc::new(MockChannel::new("sms"));
        let dispatcher = Dispatcher::new()
            .with_email(email.clone())
            .with_sms(sms.clone());

        dispatcher.broadcast("a@x.com", "+1000", "code 12345").await;

        assert!(email.was_sent_to("a@x.com").await);
        assert!(sms.was_sent_to("+1000").await);
    }

    #[tokio::test]
    async fn test_failing_email_does_not_block_sms() {
        let email = Arc::new(MockChannel::failing("email", "smtp down"));
        let sms = Arc::new(MockChannel::new("sms"));
        let dispatcher = Dispatcher::new()
            .with_email(email.clone())
            .with_sms(sms.clone());

        dispatcher.broadcast("a@x.com", "+1000", "code 12345").await;

        assert_eq!(email.sent_count().await, 0);
        assert_eq!(sms.sent_count().await, 1);
    }

    #[tokio::test]
    async fn test_unconfigured_channels_are_skipped() {
        let dispatcher = Dispatcher::new();
        // Must not panic or error.
        dispatcher.broadcast("a@x.com", "+1000", "code 12345").await;
    }

    #[tokio::test]
    async fn test_send_email_only() {
        let email = Arc::new(MockChannel::new("email"));
        let sms = Arc::new(MockChannel::new("sms"));
        let dispatcher = Dispatcher::new()
            .with_email(email.clone())
            .with_sms(sms.clone());

        dispatcher.send_email("a@x.com", "code 54321").await;

        assert_eq!(email.sent_count().await, 1);
        assert_eq!(sms.sent_count().await, 0);
    }
}
