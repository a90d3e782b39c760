//! Subscribe Lambda - Handles POST /subscribe.
//!
//! Registers an email address on the announcement topic. SNS sends the
//! confirmation email; the address only receives announcements once confirmed.

use lambda_http::http::StatusCode;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use shared::http::{body_text, source_ip};
use shared::notify::EMAIL_PROTOCOL;
use shared::validation::is_valid_email;
use shared::{
    build_response, Notifier, ResponseBody, SnsNotifier, SubscribeRequest, SubscriberConfig,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Application state shared across requests.
struct AppState {
    notifier: Arc<dyn Notifier>,
    config: fn() -> shared::Result<SubscriberConfig>,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        Ok(Self {
            notifier: Arc::new(SnsNotifier::new(aws_sdk_sns::Client::new(&config))),
            config: SubscriberConfig::from_env,
        })
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    info!(source_ip = %source_ip(&event), "Received subscribe request");
    info!(body = %body_text(&event), "Received subscribe body");

    Ok(subscribe(&state, &event).await)
}

async fn subscribe(state: &AppState, event: &Request) -> Response<Body> {
    match try_subscribe(state, event).await {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "Error subscribing email");
            build_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseBody::message(format!("Error subscribing email: {}", e)),
            )
        }
    }
}

async fn try_subscribe(state: &AppState, event: &Request) -> shared::Result<Response<Body>> {
    let request: SubscribeRequest = serde_json::from_slice(event.body().as_ref())?;

    let email = match request.email {
        Some(email) if !email.is_empty() => email,
        _ => {
            warn!("No email provided in the request");
            return Ok(build_response(
                StatusCode::BAD_REQUEST,
                ResponseBody::error("No email provided!"),
            ));
        }
    };

    if !is_valid_email(&email) {
        warn!(email = %email, "Invalid email format");
        return Ok(build_response(
            StatusCode::BAD_REQUEST,
            ResponseBody::error("Invalid email format, check again!"),
        ));
    }

    let config = (state.config)()?;

    info!(email = %email, topic_arn = %config.topic_arn, "Subscribing email to SNS topic");
    state
        .notifier
        .subscribe(&config.topic_arn, EMAIL_PROTOCOL, &email)
        .await?;

    info!(email = %email, "Subscription initiated");
    Ok(build_response(
        StatusCode::OK,
        ResponseBody::message(format!(
            "Subscription initiated for {}. Check your email to confirm!",
            email
        )),
    ))
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use shared::mock::{MockNotifier, SubscriptionRequest};

    const TOPIC: &str = "arn:aws:sns:us-east-1:123456789012:event-announcements";

    fn test_config() -> shared::Result<SubscriberConfig> {
        Ok(SubscriberConfig {
            topic_arn: TOPIC.to_string(),
        })
    }

    fn state(notifier: &Arc<MockNotifier>) -> AppState {
        AppState {
            notifier: notifier.clone(),
            config: test_config,
        }
    }

    fn json_request(body: Value) -> Request {
        Request::new(Body::from(body.to_string()))
    }

    fn body_json(response: &Response<Body>) -> Value {
        serde_json::from_slice(response.body().as_ref()).unwrap()
    }

    #[tokio::test]
    async fn test_subscribes_valid_email() {
        let notifier = Arc::new(MockNotifier::new());
        let event = json_request(json!({"email": "user@example.com"}));
        let response = subscribe(&state(&notifier), &event).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(&response),
            json!({
                "message":
                    "Subscription initiated for user@example.com. Check your email to confirm!"
            })
        );
        assert_eq!(
            notifier.subscriptions().await,
            vec![SubscriptionRequest {
                topic_arn: TOPIC.to_string(),
                protocol: "email".to_string(),
                endpoint: "user@example.com".to_string(),
            }]
        );
        assert!(notifier.published().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_or_empty_email() {
        for payload in [json!({}), json!({"email": ""}), json!({"email": null})] {
            let notifier = Arc::new(MockNotifier::new());
            let response = subscribe(&state(&notifier), &json_request(payload)).await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(&response), json!({"error": "No email provided!"}));
            assert!(notifier.subscriptions().await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_rejects_malformed_email() {
        for email in ["not-an-email", "a@b", "a@b.c", "bad@"] {
            let notifier = Arc::new(MockNotifier::new());
            let event = json_request(json!({"email": email}));
            let response = subscribe(&state(&notifier), &event).await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                body_json(&response),
                json!({"error": "Invalid email format, check again!"})
            );
            assert!(notifier.subscriptions().await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_subscribe_failure_returns_500_message() {
        let notifier = Arc::new(MockNotifier::new());
        notifier
            .fail_next_call(shared::Error::Aws("Failed to subscribe to SNS: denied".to_string()))
            .await;

        let event = json_request(json!({"email": "user@example.com"}));
        let response = subscribe(&state(&notifier), &event).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(&response),
            json!({
                "message": "Error subscribing email: AWS error: Failed to subscribe to SNS: denied"
            })
        );
    }

    #[tokio::test]
    async fn test_malformed_body_returns_500_message() {
        let notifier = Arc::new(MockNotifier::new());
        let event = Request::new(Body::from("email=user@example.com"));
        let response = subscribe(&state(&notifier), &event).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let message = body_json(&response)["message"].as_str().unwrap().to_string();
        assert!(message.starts_with("Error subscribing email: Serialization error"), "{message}");
        assert!(notifier.subscriptions().await.is_empty());
    }

    #[tokio::test]
    async fn test_non_string_email_returns_500() {
        let notifier = Arc::new(MockNotifier::new());
        let response = subscribe(&state(&notifier), &json_request(json!({"email": 42}))).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(notifier.subscriptions().await.is_empty());
    }
}
