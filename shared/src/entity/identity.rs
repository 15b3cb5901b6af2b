use crate::errors::{LambdaError, LambdaResult};

use serde_json::{Map, Value};

pub const USER_ID_CLAIM: &str = "user_id";
pub const USER_NAME_CLAIM: &str = "user_name";

/// Who is calling, as read from a decoded token payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: i64,
    pub user_name: Option<String>,
}

impl CallerIdentity {
    /// Extracts the caller from token claims. `require_name` also demands `user_name`.
    pub fn from_claims(claims: &Map<String, Value>, require_name: bool) -> LambdaResult<Self> {
        let user_id = claims
            .get(USER_ID_CLAIM)
            .and_then(coerce_integer)
            .ok_or_else(LambdaError::incomplete_token)?;

        let user_name = claims
            .get(USER_NAME_CLAIM)
            .and_then(Value::as_str)
            .map(str::to_string);

        if require_name && user_name.is_none() {
            return Err(LambdaError::incomplete_token());
        }

        Ok(CallerIdentity { user_id, user_name })
    }

    pub fn display_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or_default()
    }
}

// Claims may carry the id as a JSON number or a numeric string
fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}
