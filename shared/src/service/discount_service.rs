use crate::aws::cognito::token_authorizer::{authenticate, TokenAuthorizer};
use crate::aws::eventbridge::client::EventPublisher;
use crate::aws::lambda_events::request::DiscountEventRequest;
use crate::aws::lambda_events::response::{HandlerOutcome, ResponseShape};
use crate::entity::discount::DiscountCode;
use crate::entity::shared_info::{SharedInfo, SharedInfoEvent};
use crate::errors::{LambdaError, LambdaResult};
use crate::repository::discount_repository::DiscountRepository;
use crate::requests::create_discount::CreateDiscountRequest;
use crate::requests::list_discounts::ListDiscountsRequest;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{error, info, instrument};

/// Creates every submitted discount for the calling brand in one transaction.
///
/// All items are validated before the first insert, so a bad item leaves no
/// rows behind.
#[instrument(skip_all, name = "service.discount.create_discounts")]
pub async fn create_discounts<A, R>(
    authorizer: &A,
    mut repository: R,
    request: &DiscountEventRequest,
    now: DateTime<Utc>,
) -> LambdaResult<HandlerOutcome>
where
    A: TokenAuthorizer + ?Sized,
    R: DiscountRepository,
{
    let caller = authenticate(authorizer, &request.token, false).await?;
    let brand_id = caller.user_id;

    let create_request = CreateDiscountRequest::validate(&request.json_body()?)?;
    let discounts = create_request
        .items
        .into_iter()
        .map(|item| item.into_discount(brand_id, now))
        .collect::<LambdaResult<Vec<DiscountCode>>>()?;

    for discount in &discounts {
        repository.insert_discount(discount).await?;
    }
    repository.commit().await?;

    info!("Created {} discount codes for brand {}", discounts.len(), brand_id);
    Ok(HandlerOutcome::success(discounts_to_value(&discounts)?))
}

/// Lists a brand's discounts and records that the caller shared contact info
/// with it. Nothing is shared when the brand has no discounts.
#[instrument(skip_all, name = "service.discount.list_discounts")]
pub async fn list_discounts<A, P, R>(
    authorizer: &A,
    publisher: &P,
    mut repository: R,
    request: &DiscountEventRequest,
    now: DateTime<Utc>,
) -> LambdaResult<HandlerOutcome>
where
    A: TokenAuthorizer + ?Sized,
    P: EventPublisher + ?Sized,
    R: DiscountRepository,
{
    let caller = authenticate(authorizer, &request.token, true).await?;
    let ListDiscountsRequest { brand_id } = ListDiscountsRequest::validate(&request.json_body()?)?;

    let brand_name = repository.get_brand_name(brand_id).await?;
    let discounts = repository.list_discounts(brand_id).await?;

    if discounts.is_empty() {
        info!("No discounts for brand {}", brand_id);
        return Ok(HandlerOutcome::Success {
            result: None,
            message: Some(format!(
                "There are no discount codes available for {} brand",
                brand_name
            )),
        });
    }

    let shared_info = SharedInfo::new(brand_id, caller.user_id, now);
    let message = match repository.record_shared_info(&shared_info).await {
        Ok(()) => {
            let event = SharedInfoEvent::new(&shared_info, caller.display_name());
            publisher.publish(&event).await?;
            None
        }
        Err(LambdaError::AlreadyShared { .. }) => {
            info!(
                "User {} already shared info with brand {}",
                caller.user_id, brand_id
            );
            Some(format!("You already shared your info with {}", brand_name))
        }
        Err(e) => return Err(e),
    };

    repository.commit().await?;

    Ok(HandlerOutcome::Success {
        result: Some(discounts_to_value(&discounts)?),
        message,
    })
}

/// Collapses a handler result into the envelope returned to the platform
pub fn respond(result: LambdaResult<HandlerOutcome>, shape: ResponseShape) -> Value {
    let outcome = result.unwrap_or_else(|e| {
        error!("Request failed: {}", e);
        HandlerOutcome::from(e)
    });
    outcome.into_response(shape)
}

fn discounts_to_value(discounts: &[DiscountCode]) -> LambdaResult<Value> {
    serde_json::to_value(discounts)
        .map_err(|e| LambdaError::Persistence(format!("Failed to serialize discounts: {}", e)))
}
