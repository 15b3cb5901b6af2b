use crate::aws::eventbridge::error::EventBridgeError;
use crate::entity::shared_info::SharedInfoEvent;

use async_trait::async_trait;
use aws_config::{meta::region::RegionProviderChain, Region};
use aws_sdk_eventbridge::{types::PutEventsRequestEntry, Client};
use std::sync::Arc;
use tracing::{debug, error, instrument};

pub const EVENT_SOURCE: &str = "discounts";
pub const EVENT_DETAIL_TYPE: &str = "get_discount_code";

/// Emits cross-service events about discount activity
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &SharedInfoEvent) -> Result<(), EventBridgeError>;
}

#[derive(Clone)]
pub struct EventBridgeClient {
    client: Arc<Client>,
    event_bus_name: String,
}

impl EventBridgeClient {
    pub async fn new(region_string: String, event_bus_name: String) -> Self {
        let region = Region::new(region_string);
        let region_provider = RegionProviderChain::default_provider().or_else(region);
        let config = aws_config::from_env().region(region_provider).load().await;
        let client = Arc::new(Client::new(&config));
        EventBridgeClient {
            client,
            event_bus_name,
        }
    }
}

#[async_trait]
impl EventPublisher for EventBridgeClient {
    #[instrument(
        skip(self, event),
        fields(bus = %self.event_bus_name, brand_id = event.brand_id()),
        name = "aws.eventbridge.put_events"
    )]
    async fn publish(&self, event: &SharedInfoEvent) -> Result<(), EventBridgeError> {
        let detail = serde_json::to_string(event)?;
        debug!("Publishing event detail: {}", detail);

        let entry = PutEventsRequestEntry::builder()
            .source(EVENT_SOURCE)
            .detail_type(EVENT_DETAIL_TYPE)
            .detail(detail)
            .event_bus_name(&self.event_bus_name)
            .build();

        let output = self
            .client
            .put_events()
            .entries(entry)
            .send()
            .await
            .map_err(|e| {
                error!("EventBridge PutEvents failed: {:?}", e);
                EventBridgeError::PutEventsError(Box::new(e))
            })?;

        if let Some(failed) = output.entries().iter().find(|entry| entry.error_code().is_some()) {
            let message = format!(
                "{}: {}",
                failed.error_code().unwrap_or_default(),
                failed.error_message().unwrap_or_default()
            );
            error!("EventBridge rejected entry: {}", message);
            return Err(EventBridgeError::FailedEntry(message));
        }

        Ok(())
    }
}
