//! # Order Repository
//!
//! Database operations for orders and their line items.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. PLACE (OrderService::place_order, one transaction)                 │
//! │     └── insert_with_items() → orders row + N order_items rows          │
//! │                                                                         │
//! │  2. TRACK                                                              │
//! │     └── status_by_uid() → { order_uid, status, eta }                   │
//! │                                                                         │
//! │  3. ADVANCE (kitchen / staff tooling)                                  │
//! │     └── update_status() placed → in_kitchen → ready → completed        │
//! │                         placed | in_kitchen → cancelled                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::pool::begin_write;
use luna_core::{
    CoreError, CustomerInfo, Order, OrderItem, OrderPricing, OrderStatus, OrderStatusSummary,
    OrderType, PricedLine,
};

/// Prefix of every external order id.
pub const ORDER_UID_PREFIX: &str = "ORD";

/// A fully priced order header ready to be written.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_uid: String,
    pub branch_id: i64,
    pub table_id: Option<i64>,
    pub order_type: OrderType,
    pub customer: CustomerInfo,
    pub pricing: OrderPricing,
    pub created_at: DateTime<Utc>,
    pub estimated_completion_time: DateTime<Utc>,
}

/// Generates an external order id: `ORD` + 32 uppercase hex digits.
///
/// ## Example
/// `ORD9F1C2E4B7A0D4C3E8B5F6A7D8C9E0F1A`
pub fn generate_order_uid() -> String {
    let random = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{ORDER_UID_PREFIX}{random}")
}

/// Writes an order header and its lines on the given connection.
///
/// Meant to run inside a transaction: if any insert fails, the caller drops
/// the transaction and nothing is kept.
///
/// ## Returns
/// The row id of the new order.
pub async fn insert_with_items(
    conn: &mut SqliteConnection,
    order: &NewOrder,
    lines: &[PricedLine],
) -> DbResult<i64> {
    debug!(
        order_uid = %order.order_uid,
        branch_id = order.branch_id,
        lines = lines.len(),
        total = %order.pricing.total_amount,
        "Inserting order"
    );

    let result = sqlx::query(
        r#"
        INSERT INTO orders (
            order_uid, branch_id, table_id, order_type, status,
            customer_name, customer_phone, customer_address,
            subtotal, vat_amount, discount_amount, total_amount,
            promo_code_id, estimated_completion_time, created_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5,
            ?6, ?7, ?8,
            ?9, ?10, ?11, ?12,
            ?13, ?14, ?15
        )
        "#,
    )
    .bind(&order.order_uid)
    .bind(order.branch_id)
    .bind(order.table_id)
    .bind(order.order_type)
    .bind(OrderStatus::Placed)
    .bind(&order.customer.name)
    .bind(&order.customer.phone)
    .bind(&order.customer.address)
    .bind(order.pricing.subtotal)
    .bind(order.pricing.vat_amount)
    .bind(order.pricing.discount_amount)
    .bind(order.pricing.total_amount)
    .bind(order.pricing.promo.promo_code_id)
    .bind(order.estimated_completion_time)
    .bind(order.created_at)
    .execute(&mut *conn)
    .await?;

    let order_id = result.last_insert_rowid();

    for priced in lines {
        debug!(
            order_id,
            branch_menu_item_id = priced.line.branch_menu_item_id,
            quantity = priced.line.quantity,
            "Adding order item"
        );

        sqlx::query(
            r#"
            INSERT INTO order_items (
                order_id, branch_menu_item_id, quantity, unit_price, customizations
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(order_id)
        .bind(priced.line.branch_menu_item_id)
        .bind(priced.line.quantity)
        .bind(priced.unit_price)
        .bind(Json(&priced.line.customizations))
        .execute(&mut *conn)
        .await?;
    }

    Ok(order_id)
}

const ORDER_COLUMNS: &str = r#"
    id, order_uid, branch_id, table_id, order_type, status,
    customer_name, customer_phone, customer_address,
    subtotal, vat_amount, discount_amount, total_amount,
    promo_code_id, estimated_completion_time, created_at, completed_at
"#;

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order by its external id.
    pub async fn find_by_uid(&self, order_uid: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_uid = ?1"
        ))
        .bind(order_uid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets all items of an order, in insertion order.
    pub async fn items(&self, order_id: i64) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, branch_menu_item_id, quantity, unit_price, customizations
            FROM order_items
            WHERE order_id = ?1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Status and estimated completion time of an order.
    pub async fn status_by_uid(&self, order_uid: &str) -> DbResult<Option<OrderStatusSummary>> {
        let summary = sqlx::query_as::<_, OrderStatusSummary>(
            r#"
            SELECT order_uid, status, estimated_completion_time
            FROM orders
            WHERE order_uid = ?1
            "#,
        )
        .bind(order_uid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(summary)
    }

    /// Moves an order along its state machine.
    ///
    /// ## What This Does
    /// 1. Reads the current status
    /// 2. Rejects the change unless `current.can_transition_to(next)`
    /// 3. Updates only if the status is still `current`
    /// 4. Stamps `completed_at` when entering `completed`
    ///
    /// A row that changed status between steps 1 and 3 is reported as an
    /// invalid transition and left untouched.
    pub async fn update_status(&self, order_uid: &str, next: OrderStatus) -> DbResult<Order> {
        let mut tx = begin_write(&self.pool).await?;

        let current: Option<(OrderStatus,)> =
            sqlx::query_as("SELECT status FROM orders WHERE order_uid = ?1")
                .bind(order_uid)
                .fetch_optional(&mut *tx)
                .await?;

        let (current,) = current.ok_or_else(|| CoreError::OrderNotFound(order_uid.to_string()))?;

        let invalid = || CoreError::InvalidStatusTransition {
            order_uid: order_uid.to_string(),
            from: current,
            to: next,
        };

        if !current.can_transition_to(next) {
            return Err(invalid().into());
        }

        let completed_at = (next == OrderStatus::Completed).then(Utc::now);

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = ?2,
                completed_at = COALESCE(?3, completed_at)
            WHERE order_uid = ?1 AND status = ?4
            "#,
        )
        .bind(order_uid)
        .bind(next)
        .bind(completed_at)
        .bind(current)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(invalid().into());
        }

        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_uid = ?1"
        ))
        .bind(order_uid)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(order_uid, from = %current, to = %next, "Order status changed");

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_sample_data;
    use crate::{Database, DbConfig};
    use luna_core::{CartLine, ChosenCustomization, Money, Percentage, price_order};

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_sample_data(db.pool()).await.unwrap();
        db
    }

    async fn count(db: &Database, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    fn priced(id: i64, quantity: i64, price: i64) -> PricedLine {
        PricedLine {
            line: CartLine {
                branch_menu_item_id: id,
                quantity,
                customizations: vec![],
            },
            unit_price: Money::from_major(price),
        }
    }

    fn new_order(lines: &[PricedLine]) -> NewOrder {
        let now = Utc::now();
        NewOrder {
            order_uid: generate_order_uid(),
            branch_id: 1,
            table_id: None,
            order_type: OrderType::Takeaway,
            customer: CustomerInfo::default(),
            pricing: price_order(lines, Percentage::from_whole(15), None),
            created_at: now,
            estimated_completion_time: luna_core::estimated_completion(now),
        }
    }

    #[test]
    fn test_generate_order_uid() {
        let uid = generate_order_uid();
        assert!(uid.starts_with("ORD"));
        assert_eq!(uid.len(), 35);
        assert!(uid[3..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
        assert_ne!(uid, generate_order_uid());
    }

    #[tokio::test]
    async fn test_insert_with_items_round_trip() {
        let db = seeded().await;
        let mut lines = vec![priced(1, 2, 150), priced(2, 1, 350)];
        lines[1].line.customizations = vec![ChosenCustomization {
            group: "Spice Level".to_string(),
            option: "Hot".to_string(),
        }];
        let order = new_order(&lines);

        let mut tx = db.pool().begin().await.unwrap();
        let order_id = insert_with_items(&mut tx, &order, &lines).await.unwrap();
        tx.commit().await.unwrap();

        let stored = db.orders().find_by_uid(&order.order_uid).await.unwrap().unwrap();
        assert_eq!(stored.id, order_id);
        assert_eq!(stored.status, OrderStatus::Placed);
        assert_eq!(stored.total_amount.to_string(), "747.50");

        let items = db.orders().items(order_id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].line_total(), Money::from_major(300));
        assert_eq!(items[1].customizations[0].option, "Hot");
        assert!(items[0].customizations.is_empty());
    }

    #[tokio::test]
    async fn test_foreign_key_failure_rolls_back_everything() {
        let db = seeded().await;
        let orders_before = count(&db, "orders").await;
        let items_before = count(&db, "order_items").await;

        // Second line references a menu item that does not exist
        let lines = vec![priced(1, 1, 150), priced(9999, 1, 10)];
        let order = new_order(&lines);

        let mut tx = db.pool().begin().await.unwrap();
        let err = insert_with_items(&mut tx, &order, &lines).await.unwrap_err();
        drop(tx);

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(count(&db, "orders").await, orders_before);
        assert_eq!(count(&db, "order_items").await, items_before);
        assert!(db.orders().find_by_uid(&order.order_uid).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_uid_rejected() {
        let db = seeded().await;
        let lines = vec![priced(1, 1, 150)];
        let mut order = new_order(&lines);
        order.order_uid = "ORD123456789".to_string();

        let mut tx = db.pool().begin().await.unwrap();
        let err = insert_with_items(&mut tx, &order, &lines).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_status_by_uid() {
        let db = seeded().await;

        let summary = db.orders().status_by_uid("ORD987654321").await.unwrap().unwrap();
        assert_eq!(summary.status, OrderStatus::InKitchen);

        assert!(db.orders().status_by_uid("ORDMISSING").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_status_follows_state_machine() {
        let db = seeded().await;

        let order = db
            .orders()
            .update_status("ORD987654321", OrderStatus::Ready)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Ready);
        assert!(order.completed_at.is_none());

        let order = db
            .orders()
            .update_status("ORD987654321", OrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert!(order.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_update_status_rejects_illegal_moves() {
        let db = seeded().await;

        // ORD123456789 is completed
        let err = db
            .orders()
            .update_status("ORD123456789", OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InvalidStatusTransition {
                from: OrderStatus::Completed,
                to: OrderStatus::Cancelled,
                ..
            })
        ));

        let order = db.orders().find_by_uid("ORD123456789").await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Completed);

        let err = db
            .orders()
            .update_status("ORDMISSING", OrderStatus::Ready)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_racing_status_updates_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("luna.db")).max_connections(4))
            .await
            .unwrap();
        seed_sample_data(db.pool()).await.unwrap();

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let orders = db.orders();
                tokio::spawn(async move {
                    orders.update_status("ORD987654321", OrderStatus::Ready).await
                })
            })
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        // One wins; the other sees `ready` and is refused, never a lock error
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results.iter().any(|r| matches!(
            r,
            Err(DbError::Domain(CoreError::InvalidStatusTransition { .. }))
        )));

        db.close().await;
    }
}
