//! Create Event Lambda - Handles POST /events.
//!
//! This Lambda validates an event submitted from the static site, stores it in
//! DynamoDB and announces it to every subscriber of the SNS topic.

use chrono::Utc;
use lambda_http::http::StatusCode;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde_json::Value;
use shared::config::{required, EVENT_TABLE_VAR, TOPIC_ARN_VAR};
use shared::http::{body_text, source_ip};
use shared::models::ANNOUNCEMENT_SUBJECT;
use shared::validation::future_timestamp;
use shared::{
    build_response, CreateEventRequest, DynamoEventStore, EventCreatedResponse, EventRecord,
    EventStore, Notifier, ResponseBody, SnsNotifier,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Application state shared across requests.
struct AppState {
    store: Arc<dyn EventStore>,
    notifier: Arc<dyn Notifier>,
    /// Resolves a required setting; called at the point each value is needed.
    env: fn(&str) -> shared::Result<String>,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        Ok(Self {
            store: Arc::new(DynamoEventStore::new(aws_sdk_dynamodb::Client::new(&config))),
            notifier: Arc::new(SnsNotifier::new(aws_sdk_sns::Client::new(&config))),
            env: required,
        })
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    info!(source_ip = %source_ip(&event), "Received create event request");
    info!(body = %body_text(&event), "Received event body");

    Ok(create_event(&state, &event, Utc::now().timestamp()).await)
}

/// Run the pipeline, turning any unclassified failure into a 500.
async fn create_event(state: &AppState, event: &Request, now: i64) -> Response<Body> {
    match try_create_event(state, event, now).await {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "Error creating event");
            build_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseBody::message(format!("Error creating event: {}", e)),
            )
        }
    }
}

async fn try_create_event(
    state: &AppState,
    event: &Request,
    now: i64,
) -> shared::Result<Response<Body>> {
    let request: CreateEventRequest = serde_json::from_slice(event.body().as_ref())?;

    let Some(title) = &request.event_title else {
        return Ok(missing_field("event_title"));
    };
    let Some(datetime) = &request.event_datetime else {
        return Ok(missing_field("event_datetime"));
    };

    let Some(event_datetime) = future_timestamp(datetime, now) else {
        warn!(event_datetime = %datetime, "Event datetime must be a valid future timestamp");
        return Ok(build_response(
            StatusCode::BAD_REQUEST,
            ResponseBody::error("Event datetime must be a valid future timestamp"),
        ));
    };

    let Value::String(title) = title else {
        return Err(shared::Error::Validation(format!(
            "event_title must be a string, got {}",
            title
        )));
    };

    let record = EventRecord::new(title, event_datetime, now, &request)?;
    let table_name = (state.env)(EVENT_TABLE_VAR)?;

    info!(
        table = %table_name,
        event_id = %record.event_id,
        record = ?record,
        "Saving event data"
    );
    if let Err(e) = state.store.put_event(&table_name, &record).await {
        return Ok(storage_failure(e));
    }

    let topic_arn = (state.env)(TOPIC_ARN_VAR)?;
    info!(topic_arn = %topic_arn, "Sending SNS notification");
    state
        .notifier
        .publish(&topic_arn, ANNOUNCEMENT_SUBJECT, &record.announcement())
        .await?;

    info!(event_id = %record.event_id, "Event created successfully");
    let body = serde_json::to_value(EventCreatedResponse {
        message: "Event created successfully",
        event_id: &record.event_id,
    })?;

    Ok(build_response(StatusCode::CREATED, ResponseBody::Json(body)))
}

fn missing_field(field: &str) -> Response<Body> {
    warn!(field, "Required field missing for event creation");
    build_response(
        StatusCode::BAD_REQUEST,
        ResponseBody::message(format!("{} is required!", field)),
    )
}

/// Map a failed write to the caller-facing response.
fn storage_failure(e: shared::Error) -> Response<Body> {
    match e {
        shared::Error::ThroughputExceeded(_) => {
            error!(error = %e, "ProvisionedThroughputExceededException");
            build_response(
                StatusCode::SERVICE_UNAVAILABLE,
                ResponseBody::error("Service temporarily unavailable. Please try again."),
            )
        }
        shared::Error::ResourceNotFound(_) => {
            error!(error = %e, "ResourceNotFoundException");
            build_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseBody::error("Database configuration error"),
            )
        }
        _ => {
            error!(error = %e, "Unexpected error saving event");
            build_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseBody::error("Failed to save event. Please try again."),
            )
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
