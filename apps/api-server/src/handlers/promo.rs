//! Standalone promo code lookup, used by the cart to preview a code.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use luna_core::validation::validate_promo_code;
use luna_core::{CoreError, Money, PromoCode, PromoType};

/// Body of `POST /api/promocode`.
#[derive(Debug, Default, Deserialize)]
pub struct PromoCodeRequest {
    pub code: Option<String>,
}

/// Response of `POST /api/promocode`.
///
/// `discount` is the configured figure: a percent for `percentage` codes,
/// an amount for `fixed` ones.
#[derive(Debug, Serialize)]
pub struct PromoCodeResponse {
    pub code: String,
    #[serde(rename = "type")]
    pub promo_type: PromoType,
    pub discount: Decimal,
    pub min_order_amount: Money,
}

impl From<PromoCode> for PromoCodeResponse {
    fn from(promo: PromoCode) -> Self {
        PromoCodeResponse {
            promo_type: promo.rule.promo_type(),
            discount: promo.rule.value(),
            min_order_amount: promo.min_order_amount,
            code: promo.code,
        }
    }
}

/// `POST /api/promocode`
pub async fn lookup(
    State(state): State<AppState>,
    payload: Result<Json<PromoCodeRequest>, JsonRejection>,
) -> ApiResult<Json<PromoCodeResponse>> {
    let Json(request) = payload?;
    let code = request
        .code
        .ok_or_else(|| ApiError::bad_request("Promo code is required"))?;

    // blank or oversized codes cannot match a stored promo
    if validate_promo_code(&code).is_err() {
        return Err(CoreError::PromoCodeNotFound(code).into());
    }

    let promo = state
        .db
        .promos()
        .find_active(&code)
        .await?
        .ok_or(CoreError::PromoCodeNotFound(code))?;

    Ok(Json(promo.into()))
}
