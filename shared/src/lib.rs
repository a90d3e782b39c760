//! Shared library for the event announcement Lambda functions.
//!
//! This crate provides the response formatter, request models, validation
//! helpers and the storage/notification clients used by both handlers.

pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod models;
pub mod notify;
pub mod store;
pub mod validation;

pub use config::SubscriberConfig;
pub use error::{Error, Result};
pub use http::{build_response, ResponseBody};
pub use models::{CreateEventRequest, EventCreatedResponse, EventRecord, SubscribeRequest};
pub use notify::{Notifier, SnsNotifier};
pub use store::{DynamoEventStore, EventStore};
