//! Placing orders and checking on them.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{format_timestamp, required_param};
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use luna_core::validation::validate_order_uid;
use luna_core::{
    CartLine, ChosenCustomization, CoreError, CustomerInfo, OrderStatus, OrderType, PlaceOrder,
    ValidationError,
};

// =============================================================================
// POST /api/orders
// =============================================================================

/// Body of `POST /api/orders`.
///
/// Every field is optional at the serde level so a missing one is reported
/// as `Missing required field: X` instead of a generic decode error.
#[derive(Debug, Default, Deserialize)]
pub struct CreateOrderRequest {
    pub branch_id: Option<i64>,
    pub order_type: Option<String>,
    pub items: Option<Vec<CartLineRequest>>,
    pub promo_code: Option<String>,
    pub table_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CartLineRequest {
    pub branch_menu_item_id: Option<i64>,
    pub quantity: Option<i64>,
    pub customizations: Option<Vec<ChosenCustomization>>,
}

impl CreateOrderRequest {
    /// Checks presence and shape; quantities and ids are checked by the
    /// order service before it opens a transaction.
    pub fn validate(self) -> Result<PlaceOrder, ValidationError> {
        let branch_id = self.branch_id.ok_or_else(|| ValidationError::required("branch_id"))?;
        let order_type: OrderType = self
            .order_type
            .ok_or_else(|| ValidationError::required("order_type"))?
            .parse()?;
        let items = self.items.ok_or_else(|| ValidationError::required("items"))?;

        let lines = items
            .into_iter()
            .map(CartLineRequest::validate)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PlaceOrder {
            branch_id,
            order_type,
            table_id: self.table_id,
            customer: CustomerInfo {
                name: self.customer_name,
                phone: self.customer_phone,
                address: self.customer_address,
            },
            promo_code: self.promo_code,
            lines,
        })
    }
}

impl CartLineRequest {
    fn validate(self) -> Result<CartLine, ValidationError> {
        Ok(CartLine {
            branch_menu_item_id: self
                .branch_menu_item_id
                .ok_or_else(|| ValidationError::required("branch_menu_item_id"))?,
            quantity: self.quantity.ok_or_else(|| ValidationError::required("quantity"))?,
            customizations: self.customizations.unwrap_or_default(),
        })
    }
}

/// Response of `POST /api/orders`.
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub status: OrderStatus,
    pub estimated_completion_time: String,
}

/// `POST /api/orders`
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> ApiResult<Json<CreateOrderResponse>> {
    let Json(request) = payload?;
    let cmd = request.validate()?;

    debug!(
        branch_id = cmd.branch_id,
        order_type = %cmd.order_type,
        lines = cmd.lines.len(),
        "Placing order"
    );

    let placed = state.db.order_service().place_order(cmd).await?;

    Ok(Json(CreateOrderResponse {
        order_id: placed.order_uid,
        status: placed.status,
        estimated_completion_time: format_timestamp(placed.estimated_completion_time),
    }))
}

// =============================================================================
// GET /api/order_status
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct OrderStatusQuery {
    pub order_uid: Option<String>,
}

/// Response of `GET /api/order_status`.
#[derive(Debug, Serialize)]
pub struct OrderStatusResponse {
    pub order_id: String,
    pub status: OrderStatus,
    pub estimated_completion_time: Option<String>,
}

/// `GET /api/order_status?order_uid=`
pub async fn order_status(
    State(state): State<AppState>,
    query: Result<Query<OrderStatusQuery>, QueryRejection>,
) -> ApiResult<Json<OrderStatusResponse>> {
    let Query(query) = query?;
    let order_uid = required_param(query.order_uid.as_deref(), "order_uid")?;

    // a malformed uid cannot match any order
    if validate_order_uid(order_uid).is_err() {
        return Err(ApiError::not_found("Order not found"));
    }

    let summary = state
        .db
        .orders()
        .status_by_uid(order_uid)
        .await?
        .ok_or_else(|| CoreError::OrderNotFound(order_uid.to_string()))?;

    Ok(Json(OrderStatusResponse {
        order_id: summary.order_uid,
        status: summary.status,
        estimated_completion_time: summary.estimated_completion_time.map(format_timestamp),
    }))
}
