use crate::errors::{LambdaError, LambdaResult};

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListDiscountsRequest {
    pub brand_id: i64,
}

impl ListDiscountsRequest {
    pub fn validate(body: &Value) -> LambdaResult<Self> {
        let brand_id = body
            .get("brand_id")
            .filter(|value| value.is_i64())
            .and_then(Value::as_i64)
            .ok_or_else(|| LambdaError::Validation("Brand id should be integer".to_string()))?;

        Ok(ListDiscountsRequest { brand_id })
    }
}
