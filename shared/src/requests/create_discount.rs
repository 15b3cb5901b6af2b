use crate::entity::discount::{AmountType, DiscountCode};
use crate::errors::{LambdaError, LambdaResult};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// One validated item of a create request
#[derive(Debug, Clone, PartialEq)]
pub struct CreateDiscountItem {
    pub discount_name: String,
    pub discount_value: f64,
    pub discount_type: AmountType,
    pub minimum_basket: f64,
    pub valid_days: i64,
}

impl CreateDiscountItem {
    /// Strict field checks, no coercion. Stops at the first bad field.
    pub fn validate(item: &Value) -> LambdaResult<Self> {
        let fields = item
            .as_object()
            .ok_or_else(|| LambdaError::Validation("discount item must be an object".to_string()))?;

        let discount_name = string_field(fields, "discount_name")?.to_string();
        let discount_value = float_field(fields, "discount_value")?;
        let discount_type = string_field(fields, "discount_type")?.parse::<AmountType>()?;
        let minimum_basket = float_field(fields, "minimum_basket")?;
        let valid_days = fields
            .get("valid_days")
            .filter(|value| value.is_i64())
            .and_then(Value::as_i64)
            .ok_or_else(|| LambdaError::invalid_field("valid_days"))?;

        Ok(CreateDiscountItem {
            discount_name,
            discount_value,
            discount_type,
            minimum_basket,
            valid_days,
        })
    }

    pub fn into_discount(self, brand_id: i64, now: DateTime<Utc>) -> LambdaResult<DiscountCode> {
        DiscountCode::issue(
            brand_id,
            self.discount_name,
            self.discount_value,
            self.discount_type,
            self.minimum_basket,
            self.valid_days,
            now,
        )
    }
}

/// Validated body of the create path: a non-empty array of items
#[derive(Debug, Clone, PartialEq)]
pub struct CreateDiscountRequest {
    pub items: Vec<CreateDiscountItem>,
}

impl CreateDiscountRequest {
    pub fn validate(body: &Value) -> LambdaResult<Self> {
        let raw_items = body.as_array().ok_or_else(|| {
            LambdaError::Validation("body must be a list of discount items".to_string())
        })?;
        if raw_items.is_empty() {
            return Err(LambdaError::Validation("no discount items".to_string()));
        }

        let items = raw_items
            .iter()
            .map(CreateDiscountItem::validate)
            .collect::<LambdaResult<Vec<_>>>()?;
        Ok(CreateDiscountRequest { items })
    }
}

fn string_field<'a>(fields: &'a Map<String, Value>, name: &str) -> LambdaResult<&'a str> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| LambdaError::invalid_field(name))
}

// Only JSON float literals count; `10` is an integer and is rejected
fn float_field(fields: &Map<String, Value>, name: &str) -> LambdaResult<f64> {
    fields
        .get(name)
        .filter(|value| value.is_f64())
        .and_then(Value::as_f64)
        .ok_or_else(|| LambdaError::invalid_field(name))
}
