use crate::errors::LambdaError;

use aws_sdk_eventbridge::{error::SdkError, operation::put_events::PutEventsError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventBridgeError {
    #[error("PutEventsError: {0}")]
    PutEventsError(#[from] Box<SdkError<PutEventsError>>),

    #[error("SerializationError: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("FailedEntry: {0}")]
    FailedEntry(String),
}

impl From<EventBridgeError> for LambdaError {
    fn from(error: EventBridgeError) -> Self {
        LambdaError::Publish(error.to_string())
    }
}
