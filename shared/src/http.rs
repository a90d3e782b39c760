//! HTTP helpers for Lambda functions.

use lambda_http::http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use lambda_http::http::StatusCode;
use lambda_http::request::RequestContext;
use lambda_http::{Body, Request, RequestExt, Response};
use serde_json::{json, Value};
use tracing::debug;

/// Headers attached to every response so the static site can call the API.
const CORS_HEADERS: [(&str, &str); 3] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "OPTIONS,POST"),
    ("access-control-allow-headers", "Content-Type"),
];

/// Body of a handler response.
///
/// `Json` is serialized as-is. `Message` is wrapped as `{"message": ...}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Message(String),
}

impl ResponseBody {
    /// A plain message body.
    pub fn message(message: impl Into<String>) -> Self {
        ResponseBody::Message(message.into())
    }

    /// An `{"error": ...}` object body.
    pub fn error(message: impl Into<String>) -> Self {
        ResponseBody::Json(json!({ "error": message.into() }))
    }

    /// Render the body as the JSON string sent to the caller.
    pub fn to_json_string(&self) -> String {
        match self {
            ResponseBody::Json(value) => value.to_string(),
            ResponseBody::Message(message) => json!({ "message": message }).to_string(),
        }
    }
}

/// Build the gateway response for a status and body.
pub fn build_response(status: StatusCode, body: ResponseBody) -> Response<Body> {
    let rendered = body.to_json_string();
    debug!(status = status.as_u16(), body = %rendered, "Building response");

    let mut response = Response::new(Body::from(rendered));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (name, value) in CORS_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    response
}

/// Caller's source IP as reported by API Gateway, for logging only.
pub fn source_ip(event: &Request) -> String {
    let ip = match event.request_context_ref() {
        Some(RequestContext::ApiGatewayV1(ctx)) => ctx.identity.source_ip.clone(),
        Some(RequestContext::ApiGatewayV2(ctx)) => ctx.http.source_ip.clone(),
        _ => None,
    };

    ip.unwrap_or_else(|| "unknown".to_string())
}

/// Raw request body as text, for logging only.
pub fn body_text(event: &Request) -> String {
    String::from_utf8_lossy(event.body().as_ref()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_http::aws_lambda_events::apigw::ApiGatewayProxyRequestContext;

    #[test]
    fn test_message_is_wrapped() {
        let body = ResponseBody::message("Subscription initiated");
        let parsed: Value = serde_json::from_str(&body.to_json_string()).unwrap();
        assert_eq!(parsed, json!({ "message": "Subscription initiated" }));
    }

    #[test]
    fn test_json_body_is_passed_through() {
        let body = ResponseBody::Json(json!({ "message": "ok", "event_id": "abc" }));
        let parsed: Value = serde_json::from_str(&body.to_json_string()).unwrap();
        assert_eq!(parsed, json!({ "message": "ok", "event_id": "abc" }));

        let list = ResponseBody::Json(json!([1, 2]));
        assert_eq!(list.to_json_string(), "[1,2]");
    }

    #[test]
    fn test_error_body_shape() {
        assert_eq!(
            ResponseBody::error("No email provided!").to_json_string(),
            r#"{"error":"No email provided!"}"#
        );
    }

    #[test]
    fn test_response_carries_cors_headers() {
        let response = build_response(StatusCode::BAD_REQUEST, ResponseBody::error("nope"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let headers = response.headers();
        assert_eq!(headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(headers["Access-Control-Allow-Methods"], "OPTIONS,POST");
        assert_eq!(headers["Access-Control-Allow-Headers"], "Content-Type");
        assert_eq!(headers["Content-Type"], "application/json");
    }

    #[test]
    fn test_source_ip_from_rest_context() {
        let mut ctx = ApiGatewayProxyRequestContext::default();
        ctx.identity.source_ip = Some("203.0.113.7".to_string());

        let event = Request::new(Body::Empty)
            .with_request_context(RequestContext::ApiGatewayV1(ctx));
        assert_eq!(source_ip(&event), "203.0.113.7");
    }

    #[test]
    fn test_source_ip_defaults_to_unknown() {
        let event = Request::new(Body::from("{}"));
        assert_eq!(source_ip(&event), "unknown");
        assert_eq!(body_text(&event), "{}");
    }
}
