//! Mock notification channel for testing

use crate::NotificationChannel;
use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A sent message captured by [`MockChannel`]
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub to: String,
    pub body: String,
}

/// Mock channel that captures sent messages
pub struct MockChannel {
    name: &'static str,
    sent: Arc<Mutex<Vec<SentMessage>>>,
    fail_reason: Option<&'static str>,
}

impl MockChannel {
    /// Create a new mock channel
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            sent: Arc::new(Mutex::new(Vec::new())),
            fail_reason: None,
        }
    }

    /// Create a mock channel that always fails
    pub fn failing(name: &'static str, reason: &'static str) -> Self {
        Self {
            name,
            sent: Arc::new(Mutex::new(Vec::new())),
            fail_reason: Some(reason),
        }
    }

    /// Get all captured messages
    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    /// Get the count of captured messages
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Check if a message was sent to a specific destination
    pub async fn was_sent_to(&self, to: &str) -> bool {
        self.sent.lock().await.iter().any(|m| m.to == to)
    }
}

#[async_trait]
impl NotificationChannel for MockChannel {
    async fn send(&self, to: &str, message: &str) -> Result<()> {
        if let Some(reason) = self.fail_reason {
            return Err(eyre::eyre!(reason));
        }

        self.sent.lock().await.push(SentMessage {
            to: to.to_string(),
            body: message.to_string(),
        });

        Ok(())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
