use shared::aws::cognito::token_authorizer::CognitoTokenAuthorizer;
use shared::aws::lambda_events::request::LambdaEventRequestHandler;
use shared::aws::lambda_events::response::{HandlerOutcome, ResponseShape};
use shared::client_manager::ClientManager;
use shared::config::DiscountConfig;
use shared::errors::LambdaResult;
use shared::repository::discount_repository::PgDiscountRepository;
use shared::service::discount_service::{create_discounts, respond};

use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use sqlx::PgPool;
use tracing::{debug, info, instrument};

/// Clients reused across warm invocations
struct HandlerState {
    pool: PgPool,
    authorizer: CognitoTokenAuthorizer,
}

async fn generate_discounts(
    state: &HandlerState,
    event: LambdaEvent<Value>,
) -> LambdaResult<HandlerOutcome> {
    let request = LambdaEventRequestHandler::parse_discount_request(event)?;
    let repository = PgDiscountRepository::begin(&state.pool).await?;
    create_discounts(&state.authorizer, repository, &request, Utc::now()).await
}

#[instrument(skip(state, event), name = "lambda.discounts.generate.handler")]
async fn handler(state: &HandlerState, event: LambdaEvent<Value>) -> Result<Value, Error> {
    debug!("handling lambda req: {:?}", event.payload);
    let result = generate_discounts(state, event).await;
    Ok(respond(result, ResponseShape::Create))
}

// Custom allocator configuration
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    shared::tracer::init_tracing("discounts-generate")?;
    info!("Starting discounts generate function");

    let client_manager = ClientManager::new(DiscountConfig::from_env()?);
    let state = HandlerState {
        pool: client_manager.pg_pool(),
        authorizer: client_manager.token_authorizer(),
    };
    let state = &state;

    lambda_runtime::run(service_fn(move |event| handler(state, event))).await
}
