//! In-memory store and notifier for testing.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::EventRecord;
use crate::notify::Notifier;
use crate::store::EventStore;
use crate::{Error, Result};

/// Mock event store for testing.
#[derive(Default)]
pub struct MockEventStore {
    puts: RwLock<Vec<(String, EventRecord)>>,
    fail_with: RwLock<Option<Error>>,
}

impl MockEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `put_event` with `error`.
    pub async fn fail_next_put(&self, error: Error) {
        *self.fail_with.write().await = Some(error);
    }

    pub async fn put_count(&self) -> usize {
        self.puts.read().await.len()
    }

    pub async fn puts(&self) -> Vec<(String, EventRecord)> {
        self.puts.read().await.clone()
    }
}

#[async_trait]
impl EventStore for MockEventStore {
    async fn put_event(&self, table_name: &str, record: &EventRecord) -> Result<()> {
        if let Some(error) = self.fail_with.write().await.take() {
            return Err(error);
        }
        self.puts
            .write()
            .await
            .push((table_name.to_string(), record.clone()));
        Ok(())
    }
}

/// A message handed to `MockNotifier::publish`.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedMessage {
    pub topic_arn: String,
    pub subject: String,
    pub message: String,
}

/// A subscription handed to `MockNotifier::subscribe`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionRequest {
    pub topic_arn: String,
    pub protocol: String,
    pub endpoint: String,
}

/// Mock notifier for testing.
#[derive(Default)]
pub struct MockNotifier {
    published: RwLock<Vec<PublishedMessage>>,
    subscriptions: RwLock<Vec<SubscriptionRequest>>,
    fail_with: RwLock<Option<Error>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next publish or subscribe with `error`.
    pub async fn fail_next_call(&self, error: Error) {
        *self.fail_with.write().await = Some(error);
    }

    pub async fn published(&self) -> Vec<PublishedMessage> {
        self.published.read().await.clone()
    }

    pub async fn subscriptions(&self) -> Vec<SubscriptionRequest> {
        self.subscriptions.read().await.clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn publish(&self, topic_arn: &str, subject: &str, message: &str) -> Result<()> {
        if let Some(error) = self.fail_with.write().await.take() {
            return Err(error);
        }
        self.published.write().await.push(PublishedMessage {
            topic_arn: topic_arn.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }

    async fn subscribe(&self, topic_arn: &str, protocol: &str, endpoint: &str) -> Result<()> {
        if let Some(error) = self.fail_with.write().await.take() {
            return Err(error);
        }
        self.subscriptions.write().await.push(SubscriptionRequest {
            topic_arn: topic_arn.to_string(),
            protocol: protocol.to_string(),
            endpoint: endpoint.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failure_is_one_shot() {
        let notifier = MockNotifier::new();
        notifier
            .fail_next_call(Error::Aws("throttled".to_string()))
            .await;

        assert!(notifier.publish("arn", "subject", "first").await.is_err());
        assert!(notifier.publish("arn", "subject", "second").await.is_ok());

        let published = notifier.published().await;
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].message, "second");
    }
}
