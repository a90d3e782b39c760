//! Configuration management for Lambda functions.
//!
//! Values are read from the environment on every invocation and have no defaults.

use std::env;

use crate::{Error, Result};

/// DynamoDB table that stores event records.
pub const EVENT_TABLE_VAR: &str = "DYNAMODB_TABLE_EVENT";

/// SNS topic used for announcements and subscriptions.
pub const TOPIC_ARN_VAR: &str = "SNS_TOPIC_ARN";

/// Read a required environment variable.
pub fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("{} not set", name)))
}

/// Configuration for the subscriber registrar.
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    /// Topic new addresses are subscribed to
    pub topic_arn: String,
}

impl SubscriberConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            topic_arn: required(TOPIC_ARN_VAR)?,
        })
    }
}
