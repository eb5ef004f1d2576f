//! # Order Placement
//!
//! The one multi-step write in the system: price a cart and persist it
//! atomically.
//!
//! ## Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     OrderService::place_order                           │
//! │                                                                         │
//! │  0. validate cart (no database access)                                  │
//! │       │                                                                 │
//! │  BEGIN IMMEDIATE ───────────────────────────────────────────────────┐   │
//! │  1. branch settings ──► BranchNotFound / vat_percentage             │   │
//! │  2. table (if any)  ──► TableNotFound unless it is in the branch    │   │
//! │  3. item prices, one query ──► MenuItemNotFound                     │   │
//! │  4. promo (active only; unknown = no discount)                      │   │
//! │  5. price_order (pure)                                              │   │
//! │  6. INSERT orders + order_items                                     │   │
//! │  COMMIT ────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Any `?` between BEGIN and COMMIT drops the transaction: rolled back,   │
//! │  nothing written.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::pool::begin_write;
use crate::repository::catalog;
use crate::repository::order::{self, generate_order_uid, NewOrder};
use crate::repository::promo::find_active_promo;
use luna_core::validation::{validate_cart, validate_free_text, validate_id};
use luna_core::{
    estimated_completion, price_order, resolve_lines, CoreError, OrderPricing, OrderStatus,
    PlaceOrder,
};

/// Longest accepted customer name.
const MAX_CUSTOMER_NAME_LEN: usize = 100;
/// Longest accepted customer phone.
const MAX_CUSTOMER_PHONE_LEN: usize = 30;
/// Longest accepted delivery address.
const MAX_CUSTOMER_ADDRESS_LEN: usize = 500;

/// What the guest gets back after placing an order.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub id: i64,
    pub order_uid: String,
    pub status: OrderStatus,
    pub estimated_completion_time: DateTime<Utc>,
    pub pricing: OrderPricing,
}

/// Runs the order placement workflow.
#[derive(Debug, Clone)]
pub struct OrderService {
    pool: SqlitePool,
}

impl OrderService {
    /// Creates a new OrderService.
    pub fn new(pool: SqlitePool) -> Self {
        OrderService { pool }
    }

    /// Prices and stores an order in one transaction.
    ///
    /// ## Errors
    /// - `ValidationError` (wrapped) for an empty cart, bad quantities, bad ids
    /// - `BranchNotFound`, `TableNotFound`, `MenuItemNotFound`
    /// - any storage failure; the transaction is rolled back
    ///
    /// An unknown or inactive promo code is not an error.
    pub async fn place_order(&self, cmd: PlaceOrder) -> DbResult<PlacedOrder> {
        validate_cart(&cmd.lines)?;
        validate_id("branch_id", cmd.branch_id)?;
        if let Some(table_id) = cmd.table_id {
            validate_id("table_id", table_id)?;
        }
        validate_free_text("customer_name", cmd.customer.name.as_deref(), MAX_CUSTOMER_NAME_LEN)?;
        validate_free_text("customer_phone", cmd.customer.phone.as_deref(), MAX_CUSTOMER_PHONE_LEN)?;
        validate_free_text(
            "customer_address",
            cmd.customer.address.as_deref(),
            MAX_CUSTOMER_ADDRESS_LEN,
        )?;

        let PlaceOrder {
            branch_id,
            order_type,
            table_id,
            customer,
            promo_code,
            lines,
        } = cmd;

        let mut tx = begin_write(&self.pool).await?;

        let settings = catalog::branch_settings(&mut tx, branch_id)
            .await?
            .ok_or(CoreError::BranchNotFound(branch_id))?;
        let vat_percentage = settings.vat_percentage()?;

        if let Some(table_id) = table_id {
            catalog::find_table(&mut tx, table_id, branch_id)
                .await?
                .ok_or(CoreError::TableNotFound {
                    table_id,
                    branch_id,
                })?;
        }

        let ids: Vec<i64> = lines.iter().map(|l| l.branch_menu_item_id).collect();
        let prices = catalog::item_prices(&mut tx, &ids).await?;
        let lines = resolve_lines(lines, &prices)?;

        let promo = match promo_code.as_deref().filter(|code| !code.trim().is_empty()) {
            Some(code) => find_active_promo(&mut tx, code).await?,
            None => None,
        };
        if promo_code.is_some() && promo.is_none() {
            debug!(code = ?promo_code, "Promo code not applied: unknown or inactive");
        }

        let pricing = price_order(&lines, vat_percentage, promo.as_ref());

        let created_at = Utc::now();
        let new_order = NewOrder {
            order_uid: generate_order_uid(),
            branch_id,
            table_id,
            order_type,
            customer,
            pricing,
            created_at,
            estimated_completion_time: estimated_completion(created_at),
        };

        let id = order::insert_with_items(&mut tx, &new_order, &lines).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            order_uid = %new_order.order_uid,
            branch_id,
            order_type = %order_type,
            lines = lines.len(),
            subtotal = %pricing.subtotal,
            vat = %pricing.vat_amount,
            discount = %pricing.discount_amount,
            total = %pricing.total_amount,
            "Order placed"
        );

        Ok(PlacedOrder {
            id,
            order_uid: new_order.order_uid,
            status: OrderStatus::Placed,
            estimated_completion_time: new_order.estimated_completion_time,
            pricing,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
