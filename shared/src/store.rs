//! Event persistence backed by DynamoDB.
//!
//! Items mirror the serialized `EventRecord`: strings as `S`, integers as `N`.
//! Optional attributes that were not supplied are absent from the item.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use serde_json::Value;
use tracing::debug;

use crate::models::EventRecord;
use crate::{Error, Result};

/// Storage for newly created events.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert `record` into `table_name`.
    ///
    /// Capacity failures map to `Error::ThroughputExceeded`, a missing table to
    /// `Error::ResourceNotFound`, anything else to `Error::Aws`.
    async fn put_event(&self, table_name: &str, record: &EventRecord) -> Result<()>;
}

/// DynamoDB implementation of EventStore.
pub struct DynamoEventStore {
    client: DynamoClient,
}

impl DynamoEventStore {
    /// Create a new store around a shared client.
    pub fn new(client: DynamoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EventStore for DynamoEventStore {
    async fn put_event(&self, table_name: &str, record: &EventRecord) -> Result<()> {
        let item = event_item(record)?;

        self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| match e.as_service_error() {
                Some(PutItemError::ProvisionedThroughputExceededException(inner)) => {
                    Error::ThroughputExceeded(inner.to_string())
                }
                Some(PutItemError::ResourceNotFoundException(inner)) => {
                    Error::ResourceNotFound(inner.to_string())
                }
                _ => Error::Aws(format!("DynamoDB put_item failed: {}", e)),
            })?;

        debug!(table = %table_name, event_id = %record.event_id, "Stored event in DynamoDB");

        Ok(())
    }
}

/// Convert a record into a DynamoDB item.
pub fn event_item(record: &EventRecord) -> Result<HashMap<String, AttributeValue>> {
    let Value::Object(fields) = serde_json::to_value(record)? else {
        return Err(Error::Internal("event record did not serialize to an object".to_string()));
    };

    fields
        .into_iter()
        .map(|(name, value)| {
            let attribute = match value {
                Value::String(s) => AttributeValue::S(s),
                Value::Number(n) => AttributeValue::N(n.to_string()),
                other => {
                    return Err(Error::Internal(format!(
                        "unsupported attribute {} = {}",
                        name, other
                    )))
                }
            };
            Ok((name, attribute))
        })
        .collect()
}
