//! Announcements and subscriptions through SNS.

use async_trait::async_trait;
use aws_sdk_sns::Client as SnsClient;
use tracing::debug;

use crate::{Error, Result};

/// Protocol used when registering a subscriber.
pub const EMAIL_PROTOCOL: &str = "email";

/// Publish/subscribe notification service.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Publish `message` with `subject` to every subscriber of `topic_arn`.
    async fn publish(&self, topic_arn: &str, subject: &str, message: &str) -> Result<()>;

    /// Register `endpoint` on `topic_arn` using `protocol`.
    async fn subscribe(&self, topic_arn: &str, protocol: &str, endpoint: &str) -> Result<()>;
}

/// SNS implementation of Notifier.
pub struct SnsNotifier {
    client: SnsClient,
}

impl SnsNotifier {
    /// Create a new notifier around a shared client.
    pub fn new(client: SnsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn publish(&self, topic_arn: &str, subject: &str, message: &str) -> Result<()> {
        let output = self
            .client
            .publish()
            .topic_arn(topic_arn)
            .subject(subject)
            .message(message)
            .send()
            .await
            .map_err(|e| Error::Aws(format!("Failed to publish to SNS: {}", e)))?;

        debug!(topic_arn = %topic_arn, message_id = ?output.message_id(), "Published to SNS");
        Ok(())
    }

    async fn subscribe(&self, topic_arn: &str, protocol: &str, endpoint: &str) -> Result<()> {
        let output = self
            .client
            .subscribe()
            .topic_arn(topic_arn)
            .protocol(protocol)
            .endpoint(endpoint)
            .send()
            .await
            .map_err(|e| Error::Aws(format!("Failed to subscribe to SNS: {}", e)))?;

        debug!(
            topic_arn = %topic_arn,
            subscription_arn = ?output.subscription_arn(),
            "Subscription requested"
        );
        Ok(())
    }
}
