use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable error category exposed next to the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Authentication,
    Validation,
    NotFound,
    Persistence,
    AlreadyShared,
    Publish,
}

/// Unified error type for the discount Lambda functions
#[derive(Error, Debug)]
pub enum LambdaError {
    // Missing/invalid token or claim
    #[error("Error on authentication and getting user_id: {0}")]
    Authentication(String),

    // Malformed input field
    #[error("Invalid input: {0}")]
    Validation(String),

    // Referenced resource does not exist
    #[error("{0} not found")]
    NotFound(String),

    // Database connectivity or constraint failure
    #[error("{0}")]
    Persistence(String),

    // Tolerated uniqueness violation on shared_info
    #[error("Info already shared with brand {brand_id}")]
    AlreadyShared { brand_id: i64, user_id: i64 },

    // Event transport failure
    #[error("Error in put event: {0}")]
    Publish(String),
}

impl LambdaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LambdaError::Authentication(_) => ErrorKind::Authentication,
            LambdaError::Validation(_) => ErrorKind::Validation,
            LambdaError::NotFound(_) => ErrorKind::NotFound,
            LambdaError::Persistence(_) => ErrorKind::Persistence,
            LambdaError::AlreadyShared { .. } => ErrorKind::AlreadyShared,
            LambdaError::Publish(_) => ErrorKind::Publish,
        }
    }

    pub fn incomplete_token() -> Self {
        LambdaError::Authentication("Incomplete token".to_string())
    }

    pub fn invalid_field(field: &str) -> Self {
        LambdaError::Validation(format!("invalid {}", field))
    }
}

/// Result type for Lambda operations
pub type LambdaResult<T> = Result<T, LambdaError>;

/// Convert specific error types to LambdaError
pub trait ToLambdaError {
    fn to_lambda_error(self) -> LambdaError;
}

impl ToLambdaError for serde_json::Error {
    fn to_lambda_error(self) -> LambdaError {
        LambdaError::Validation(format!("JSON parsing error: {}", self))
    }
}

impl ToLambdaError for sqlx::Error {
    fn to_lambda_error(self) -> LambdaError {
        LambdaError::Persistence(format!("Database error: {}", self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            LambdaError::incomplete_token().kind(),
            ErrorKind::Authentication
        );
        assert_eq!(
            LambdaError::invalid_field("discount_name").kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            LambdaError::NotFound("Brand".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            LambdaError::AlreadyShared {
                brand_id: 1,
                user_id: 2
            }
            .kind(),
            ErrorKind::AlreadyShared
        );
    }

    #[test]
    fn test_messages_name_the_problem() {
        assert_eq!(
            LambdaError::invalid_field("valid_days").to_string(),
            "Invalid input: invalid valid_days"
        );
        assert_eq!(
            LambdaError::NotFound("Brand 7".into()).to_string(),
            "Brand 7 not found"
        );
        assert!(LambdaError::incomplete_token()
            .to_string()
            .contains("Incomplete token"));
    }

    #[test]
    fn test_error_kind_serializes_snake_case() {
        let value = serde_json::to_value(ErrorKind::AlreadyShared).unwrap();
        assert_eq!(value, serde_json::json!("already_shared"));
    }

    #[test]
    fn test_sqlx_error_becomes_persistence() {
        let err = sqlx::Error::PoolTimedOut.to_lambda_error();
        assert_eq!(err.kind(), ErrorKind::Persistence);
    }
}
