//! # Promo Code Repository
//!
//! Lookups of promo codes. Codes match exactly (case-sensitive); the order
//! flow only ever sees active codes.

use rust_decimal::Decimal;
use sqlx::{SqliteConnection, SqlitePool};
use std::str::FromStr;

use crate::error::{DbError, DbResult};
use luna_core::{DiscountRule, Money, PromoCode, PromoType};

#[derive(Debug, sqlx::FromRow)]
struct PromoRow {
    id: i64,
    code: String,
    #[sqlx(rename = "type")]
    promo_type: PromoType,
    value: String,
    is_active: bool,
    min_order_amount: Money,
}

impl TryFrom<PromoRow> for PromoCode {
    type Error = DbError;

    fn try_from(row: PromoRow) -> Result<Self, Self::Error> {
        let value = Decimal::from_str(row.value.trim())
            .map_err(|e| DbError::corrupt("promo_codes.value", e))?;

        Ok(PromoCode {
            id: row.id,
            code: row.code,
            rule: DiscountRule::from_parts(row.promo_type, value),
            is_active: row.is_active,
            min_order_amount: row.min_order_amount,
        })
    }
}

/// Finds an active promo code on the given connection.
pub async fn find_active_promo(
    conn: &mut SqliteConnection,
    code: &str,
) -> DbResult<Option<PromoCode>> {
    let row = sqlx::query_as::<_, PromoRow>(
        r#"
        SELECT id, code, type, value, is_active, min_order_amount
        FROM promo_codes
        WHERE code = ?1 AND is_active = 1
        "#,
    )
    .bind(code)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(PromoCode::try_from).transpose()
}

/// Repository for promo code lookups.
#[derive(Debug, Clone)]
pub struct PromoRepository {
    pool: SqlitePool,
}

impl PromoRepository {
    /// Creates a new PromoRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PromoRepository { pool }
    }

    /// An active promo code, or `None` for unknown and inactive codes alike.
    pub async fn find_active(&self, code: &str) -> DbResult<Option<PromoCode>> {
        let mut conn = self.pool.acquire().await?;
        find_active_promo(&mut conn, code).await
    }
}
