use crate::aws::cognito::token_authorizer::CognitoTokenAuthorizer;
use crate::aws::eventbridge::client::EventBridgeClient;
use crate::config::{DatabaseConfig, DiscountConfig};

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::time::Duration;
use tracing::info;

// One invocation runs at a time per Lambda container
const MAX_DB_CONNECTIONS: u32 = 1;
const DB_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the long-lived clients a Lambda container reuses across invocations
pub struct ClientManager {
    config: DiscountConfig,
}

impl ClientManager {
    pub fn new(config: DiscountConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiscountConfig {
        &self.config
    }

    /// Pool that connects on first use, so a bad database only fails requests
    pub fn pg_pool(&self) -> PgPool {
        info!(
            "Configuring database pool for {}:{}",
            self.config.database.host, self.config.database.port
        );
        PgPoolOptions::new()
            .max_connections(MAX_DB_CONNECTIONS)
            .acquire_timeout(DB_ACQUIRE_TIMEOUT)
            .connect_lazy_with(connect_options(&self.config.database))
    }

    pub fn token_authorizer(&self) -> CognitoTokenAuthorizer {
        CognitoTokenAuthorizer::new(
            self.config.jwks_url.clone(),
            self.config.issuer.clone(),
            self.config.jwks_cache_ttl,
        )
    }

    pub async fn event_publisher(&self) -> EventBridgeClient {
        EventBridgeClient::new(
            self.config.region.clone(),
            self.config.event_bus_name.clone(),
        )
        .await
    }
}

fn connect_options(database: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&database.host)
        .port(database.port)
        .database(&database.name)
        .username(&database.user)
        .password(&database.password)
}
