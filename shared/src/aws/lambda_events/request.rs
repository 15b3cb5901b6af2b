use crate::errors::{LambdaError, LambdaResult, ToLambdaError};

use lambda_runtime::LambdaEvent;
use serde_json::Value;
use tracing::{debug, instrument};

const AUTHORIZATION_HEADER: &str = "authorization";

/// Token and body pulled out of an invoking event. The body is kept as
/// delivered until the caller is authenticated.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountEventRequest {
    pub token: String,
    pub body: Value,
}

impl DiscountEventRequest {
    /// The body with a JSON-string payload decoded
    pub fn json_body(&self) -> LambdaResult<Value> {
        decode_json_string(self.body.clone())
    }
}

pub struct LambdaEventRequestHandler {}

impl LambdaEventRequestHandler {
    #[instrument(skip(event), name = "aws.lambda_events.request.parse_discount_request")]
    pub fn parse_discount_request(event: LambdaEvent<Value>) -> LambdaResult<DiscountEventRequest> {
        debug!("Parsing event for request {}", event.context.request_id);
        Self::parse_payload(event.payload)
    }

    /// Accepts the event itself or a JSON string holding it. The body is the
    /// nested `body` field when present, otherwise the whole event. A string
    /// body is left undecoded.
    pub fn parse_payload(payload: Value) -> LambdaResult<DiscountEventRequest> {
        let event = decode_json_string(payload)?;
        if !event.is_object() {
            return Err(LambdaError::Validation(
                "event must be a JSON object".to_string(),
            ));
        }

        let token = event
            .get("headers")
            .and_then(Value::as_object)
            .and_then(|headers| {
                headers
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(AUTHORIZATION_HEADER))
                    .and_then(|(_, value)| value.as_str())
            })
            .map(str::to_string)
            .ok_or_else(|| LambdaError::Authentication("Missing Authorization header".to_string()))?;

        let nested_body = event.get("body").filter(|body| !body.is_null()).cloned();
        let body = nested_body.unwrap_or(event);

        Ok(DiscountEventRequest { token, body })
    }
}

// API Gateway proxies deliver JSON as a string
fn decode_json_string(value: Value) -> LambdaResult<Value> {
    match value {
        Value::String(text) => serde_json::from_str(&text).map_err(|e| e.to_lambda_error()),
        other => Ok(other),
    }
}
