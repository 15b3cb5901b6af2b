pub mod cognito;
pub mod eventbridge;
pub mod lambda_events;
