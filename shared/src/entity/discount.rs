use crate::errors::{LambdaError, LambdaResult};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

const CODE_PREFIX_LEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountType {
    Percent,
    Literal,
}

impl AmountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmountType::Percent => "percent",
            AmountType::Literal => "literal",
        }
    }
}

impl FromStr for AmountType {
    type Err = LambdaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "percent" => Ok(AmountType::Percent),
            "literal" => Ok(AmountType::Literal),
            _ => Err(LambdaError::invalid_field("discount_type")),
        }
    }
}

impl std::fmt::Display for AmountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A brand's discount code as stored in the `discounts` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountCode {
    #[serde(skip_serializing)]
    pub brand_id: i64,
    pub code: String,
    pub name: String,
    pub amount: f64,
    pub amount_type: AmountType,
    pub minimum_basket: f64,
    pub expiration_date: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub creation_date: DateTime<Utc>,
}

impl DiscountCode {
    /// Builds a new code for `brand_id`, valid for `valid_days` from `now`
    pub fn issue(
        brand_id: i64,
        name: String,
        amount: f64,
        amount_type: AmountType,
        minimum_basket: f64,
        valid_days: i64,
        now: DateTime<Utc>,
    ) -> LambdaResult<Self> {
        let expiration_date = Duration::try_days(valid_days)
            .and_then(|validity| now.checked_add_signed(validity))
            .ok_or_else(|| LambdaError::invalid_field("valid_days"))?;

        Ok(DiscountCode {
            brand_id,
            code: generate_code(&name),
            name,
            amount,
            amount_type,
            minimum_basket,
            expiration_date,
            creation_date: now,
        })
    }
}

/// Uppercased two-character name prefix, a hyphen, then a random UUID
pub fn generate_code(name: &str) -> String {
    let prefix: String = name
        .chars()
        .take(CODE_PREFIX_LEN)
        .flat_map(char::to_uppercase)
        .collect();
    format!("{}-{}", prefix, Uuid::new_v4())
}
