use crate::entity::discount::{AmountType, DiscountCode};
use crate::entity::shared_info::SharedInfo;
use crate::errors::{LambdaError, LambdaResult, ToLambdaError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, FromRow, PgPool, Postgres, Row, Transaction};
use tracing::{debug, error, instrument};

const INSERT_DISCOUNT_SQL: &str = "INSERT INTO discounts \
     (brand_id, code, name, amount, amount_type, minimum_basket, expiration_date, creation_date) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8)";

const SELECT_BRAND_NAME_SQL: &str = "SELECT name FROM brands WHERE id = $1";

const SELECT_DISCOUNTS_SQL: &str = "SELECT brand_id::int8 AS brand_id, code, name, \
     amount::float8 AS amount, amount_type, minimum_basket::float8 AS minimum_basket, \
     expiration_date, creation_date \
     FROM discounts WHERE brand_id = $1";

const INSERT_SHARED_INFO_SQL: &str = "INSERT INTO shared_info (brand_id, user_id, creation_date) \
     VALUES ($1, $2, $3) ON CONFLICT (brand_id, user_id) DO NOTHING";

/// Discount persistence scoped to a single request
#[async_trait]
pub trait DiscountRepository: Send {
    async fn insert_discount(&mut self, discount: &DiscountCode) -> LambdaResult<()>;
    async fn get_brand_name(&mut self, brand_id: i64) -> LambdaResult<String>;
    async fn list_discounts(&mut self, brand_id: i64) -> LambdaResult<Vec<DiscountCode>>;
    /// Fails with `AlreadyShared` when the (brand, user) pair exists
    async fn record_shared_info(&mut self, shared_info: &SharedInfo) -> LambdaResult<()>;
    /// Makes every write durable. Dropping without commit discards them.
    async fn commit(self) -> LambdaResult<()>;
}

pub struct PgDiscountRepository {
    tx: Transaction<'static, Postgres>,
}

impl PgDiscountRepository {
    #[instrument(skip(pool), name = "repository.discount.begin")]
    pub async fn begin(pool: &PgPool) -> LambdaResult<Self> {
        let tx = pool.begin().await.map_err(|e| {
            error!("Failed to connect to database: {:?}", e);
            LambdaError::Persistence(format!("Error in Connecting to database: {}", e))
        })?;
        Ok(Self { tx })
    }
}

#[async_trait]
impl DiscountRepository for PgDiscountRepository {
    #[instrument(skip(self, discount), fields(code = %discount.code), name = "repository.discount.insert_discount")]
    async fn insert_discount(&mut self, discount: &DiscountCode) -> LambdaResult<()> {
        sqlx::query(INSERT_DISCOUNT_SQL)
            .bind(discount.brand_id)
            .bind(&discount.code)
            .bind(&discount.name)
            .bind(discount.amount)
            .bind(discount.amount_type.as_str())
            .bind(discount.minimum_basket)
            .bind(discount.expiration_date)
            .bind(discount.creation_date)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                error!("Insert into discounts failed: {:?}", e);
                LambdaError::Persistence(format!("Error in Insert into database: {}", e))
            })?;

        debug!("Inserted discount for brand {}", discount.brand_id);
        Ok(())
    }

    #[instrument(skip(self), name = "repository.discount.get_brand_name")]
    async fn get_brand_name(&mut self, brand_id: i64) -> LambdaResult<String> {
        let row = sqlx::query(SELECT_BRAND_NAME_SQL)
            .bind(brand_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(ToLambdaError::to_lambda_error)?;

        match row {
            Some(row) => row
                .try_get::<String, _>("name")
                .map_err(ToLambdaError::to_lambda_error),
            None => Err(LambdaError::NotFound(format!("Brand {}", brand_id))),
        }
    }

    #[instrument(skip(self), name = "repository.discount.list_discounts")]
    async fn list_discounts(&mut self, brand_id: i64) -> LambdaResult<Vec<DiscountCode>> {
        let discounts = sqlx::query_as::<Postgres, DiscountCode>(SELECT_DISCOUNTS_SQL)
            .bind(brand_id)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(ToLambdaError::to_lambda_error)?;

        debug!("Found {} discounts for brand {}", discounts.len(), brand_id);
        Ok(discounts)
    }

    #[instrument(
        skip(self, shared_info),
        fields(brand_id = shared_info.brand_id, user_id = shared_info.user_id),
        name = "repository.discount.record_shared_info"
    )]
    async fn record_shared_info(&mut self, shared_info: &SharedInfo) -> LambdaResult<()> {
        let result = sqlx::query(INSERT_SHARED_INFO_SQL)
            .bind(shared_info.brand_id)
            .bind(shared_info.user_id)
            .bind(shared_info.creation_date)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_shared_info_error(e, shared_info))?;

        shared_info_outcome(result.rows_affected(), shared_info)
    }

    #[instrument(skip(self), name = "repository.discount.commit")]
    async fn commit(self) -> LambdaResult<()> {
        self.tx.commit().await.map_err(|e| {
            error!("Commit failed: {:?}", e);
            LambdaError::Persistence(format!("Error in committing changes: {}", e))
        })
    }
}

// `ON CONFLICT DO NOTHING` reports an existing pair as zero rows
fn shared_info_outcome(rows_affected: u64, shared_info: &SharedInfo) -> LambdaResult<()> {
    if rows_affected == 0 {
        return Err(LambdaError::AlreadyShared {
            brand_id: shared_info.brand_id,
            user_id: shared_info.user_id,
        });
    }
    Ok(())
}

fn map_shared_info_error(error: sqlx::Error, shared_info: &SharedInfo) -> LambdaError {
    let unique_violation = error
        .as_database_error()
        .is_some_and(|db_error| db_error.is_unique_violation());

    if unique_violation {
        LambdaError::AlreadyShared {
            brand_id: shared_info.brand_id,
            user_id: shared_info.user_id,
        }
    } else {
        error!("Insert into shared_info failed: {:?}", error);
        error.to_lambda_error()
    }
}

impl<'r> FromRow<'r, PgRow> for DiscountCode {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let amount_type = decode_amount_type(row.try_get("amount_type")?)?;

        Ok(Self {
            brand_id: row.try_get("brand_id")?,
            code: row.try_get("code")?,
            name: row.try_get("name")?,
            amount: row.try_get("amount")?,
            amount_type,
            minimum_basket: row.try_get("minimum_basket")?,
            expiration_date: row.try_get::<DateTime<Utc>, _>("expiration_date")?,
            creation_date: row.try_get::<DateTime<Utc>, _>("creation_date")?,
        })
    }
}

fn decode_amount_type(value: String) -> sqlx::Result<AmountType> {
    value
        .parse::<AmountType>()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: "amount_type".to_string(),
            source: Box::new(e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_database_errors_are_persistence_errors() {
        let shared_info = SharedInfo::new(1, 2, Utc::now());
        let err = map_shared_info_error(sqlx::Error::PoolTimedOut, &shared_info);
        assert!(matches!(err, LambdaError::Persistence(_)));
    }

    #[test]
    fn test_no_rows_inserted_means_already_shared() {
        let shared_info = SharedInfo::new(5, 77, Utc::now());

        let err = shared_info_outcome(0, &shared_info).unwrap_err();
        assert!(matches!(
            err,
            LambdaError::AlreadyShared {
                brand_id: 5,
                user_id: 77
            }
        ));
        assert!(shared_info_outcome(1, &shared_info).is_ok());
    }

    #[test]
    fn test_decode_amount_type() {
        assert_eq!(
            decode_amount_type("percent".to_string()).unwrap(),
            AmountType::Percent
        );

        let err = decode_amount_type("fixed".to_string()).unwrap_err();
        match err {
            sqlx::Error::ColumnDecode { index, source } => {
                assert_eq!(index, "amount_type");
                assert!(source.to_string().contains("discount_type"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
