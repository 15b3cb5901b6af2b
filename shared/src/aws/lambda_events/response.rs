use crate::errors::{ErrorKind, LambdaError};

use serde_json::{json, Value};

/// Which legacy envelope a handler answers with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `error`, `is_success`, `result`
    Create,
    /// `error`, `is_success`, `result`, `message`
    List,
}

/// Outcome of one handler invocation
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutcome {
    Success {
        result: Option<Value>,
        message: Option<String>,
    },
    Failure {
        kind: ErrorKind,
        message: String,
    },
}

impl HandlerOutcome {
    pub fn success(result: Value) -> Self {
        HandlerOutcome::Success {
            result: Some(result),
            message: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, HandlerOutcome::Success { .. })
    }

    /// Serializes into the envelope the platform expects. `error_kind` rides
    /// along so callers can branch without parsing `error`.
    pub fn into_response(self, shape: ResponseShape) -> Value {
        let (error, error_kind, is_success, result, message) = match self {
            HandlerOutcome::Success { result, message } => (None, None, true, result, message),
            HandlerOutcome::Failure { kind, message } => {
                (Some(message), Some(kind), false, None, None)
            }
        };

        let mut response = json!({
            "error": error,
            "error_kind": error_kind,
            "is_success": is_success,
            "result": result,
        });
        if shape == ResponseShape::List {
            response["message"] = json!(message);
        }
        response
    }
}

impl From<LambdaError> for HandlerOutcome {
    fn from(error: LambdaError) -> Self {
        HandlerOutcome::Failure {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}
