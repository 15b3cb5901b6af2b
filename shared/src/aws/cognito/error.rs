use crate::errors::LambdaError;

use jsonwebtoken::errors::Error as JwtError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CognitoError {
    #[error("JWT Error: {0}")]
    JwtError(#[from] JwtError),

    #[error("Reqwest Error: {0}")]
    ReqwestError(#[from] ReqwestError),

    #[error("Http Error: {0}")]
    HttpError(String),

    #[error("Invalid Token Error: {0}")]
    InvalidTokenError(String),
}

impl From<CognitoError> for LambdaError {
    fn from(error: CognitoError) -> Self {
        LambdaError::Authentication(error.to_string())
    }
}
