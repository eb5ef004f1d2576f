//! # Sample Data
//!
//! The demo restaurant: three Dhaka branches, a shared master menu with
//! per-branch prices, tables, promo codes and a little order history.
//!
//! Used by the `seed` binary and by the test suites, which rely on the
//! exact ids below (branch 1 = Dhanmondi, item 1 = Spring Rolls at 150, ...).
//!
//! ## Dataset
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Branch 1 Dhanmondi (open, VAT 15%)  items 1-8    tables T1-T8  (1-8)  │
//! │  Branch 2 Gulshan   (open, VAT 12%)  items 9-14   tables G1-G6  (9-14) │
//! │  Branch 3 Banani    (closed, VAT 15%) items 15-17 tables B1-B3 (15-17) │
//! │                                                                         │
//! │  Promos: LUNA10 (10%, min 200)  SAVE20 (20 off, min 300)               │
//! │          WELCOME15 (15%, min 150)  EXPIRED (inactive)                   │
//! │                                                                         │
//! │  Orders: ORD123456789 (completed)  ORD987654321 (in_kitchen)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Duration, Utc};
use serde_json::json;
use sqlx::types::Json;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};
use luna_core::{
    ChosenCustomization, Money, OrderStatus, OrderType, RequestType, SelectionType,
    ServiceRequestStatus,
};

// =============================================================================
// Static Data
// =============================================================================

/// (name suffix, address, status, phone, vat)
const BRANCHES: &[(&str, &str, &str, &str, u32)] = &[
    ("Dhanmondi", "House 12, Road 8, Dhanmondi, Dhaka", "open", "+8801234567890", 15),
    ("Gulshan", "Plot 45, Avenue 2, Gulshan, Dhaka", "open", "+8801234567891", 12),
    ("Banani", "Road 11, Block C, Banani, Dhaka", "closed", "+8801234567892", 15),
];

/// (name, description, image seed, tags)
const MASTER_ITEMS: &[(&str, &str, &str, &[&str])] = &[
    ("Spring Rolls", "Crispy vegetable spring rolls with sweet chili sauce", "spring-rolls", &["vegetarian", "popular", "appetizer"]),
    ("Chicken Biryani", "Aromatic basmati rice with tender chicken and exotic spices", "biryani", &["popular", "chef-special", "main-course"]),
    ("Beef Kacchi", "Traditional beef kacchi biryani with premium basmati rice", "kacchi", &["premium", "traditional", "main-course"]),
    ("Chocolate Cake", "Rich chocolate cake with chocolate ganache", "chocolate-cake", &["vegetarian", "sweet", "dessert"]),
    ("Fresh Lemonade", "Freshly squeezed lemon juice with mint", "lemonade", &["refreshing", "vegetarian", "beverage"]),
    ("Chicken Soup", "Hearty chicken soup with vegetables and herbs", "soup", &["soup", "comfort-food", "appetizer"]),
    ("Grilled Fish", "Fresh grilled fish with herbs and lemon", "fish", &["healthy", "grilled", "main-course"]),
    ("Mango Lassi", "Traditional mango yogurt drink", "lassi", &["traditional", "refreshing", "beverage"]),
    ("Vegetable Fried Rice", "Stir-fried rice with fresh vegetables", "fried-rice", &["vegetarian", "rice", "main-course"]),
    ("Ice Cream", "Vanilla ice cream with chocolate sauce", "ice-cream", &["dessert", "sweet", "cold"]),
];

/// (branch_id, name, display_order)
const CATEGORIES: &[(i64, &str, i64)] = &[
    (1, "Appetizers", 1),
    (1, "Main Course", 2),
    (1, "Desserts", 3),
    (1, "Beverages", 4),
    (2, "Starters", 1),
    (2, "Main Dishes", 2),
    (2, "Sweets", 3),
    (2, "Drinks", 4),
    (3, "Appetizers", 1),
    (3, "Main Course", 2),
    (3, "Desserts", 3),
    (3, "Beverages", 4),
];

/// (branch_id, master_item_id, category_id, price, is_available)
const BRANCH_ITEMS: &[(i64, i64, i64, i64, bool)] = &[
    (1, 1, 1, 150, true),
    (1, 2, 2, 350, true),
    (1, 3, 2, 450, true),
    (1, 4, 3, 200, true),
    (1, 5, 4, 80, false), // sold out
    (1, 6, 1, 120, true),
    (1, 7, 2, 400, true),
    (1, 8, 4, 100, true),
    (2, 1, 5, 170, true),
    (2, 2, 6, 380, true),
    (2, 4, 7, 220, true),
    (2, 5, 8, 90, true),
    (2, 9, 6, 250, true),
    (2, 10, 7, 150, true),
    (3, 1, 9, 160, false),
    (3, 2, 10, 360, false),
    (3, 4, 11, 210, false),
];

/// (master_item_id, name, selection type)
const CUSTOMIZATION_GROUPS: &[(i64, &str, SelectionType)] = &[
    (1, "Sauce", SelectionType::Single),
    (2, "Spice Level", SelectionType::Single),
    (2, "Extra Toppings", SelectionType::Multiple),
    (3, "Spice Level", SelectionType::Single),
    (7, "Cooking Style", SelectionType::Single),
];

/// (group_id, name, additional price)
const CUSTOMIZATION_OPTIONS: &[(i64, &str, i64)] = &[
    (1, "Sweet Chili", 0),
    (1, "Soy Garlic", 10),
    (1, "Spicy Mayo", 10),
    (2, "Mild", 0),
    (2, "Medium", 0),
    (2, "Hot", 0),
    (3, "Extra Chicken", 100),
    (3, "Boiled Egg", 30),
    (3, "Fried Onion", 20),
    (4, "Medium", 0),
    (4, "Hot", 0),
    (4, "Extra Hot", 0),
    (5, "Grilled", 0),
    (5, "Pan-seared", 20),
    (5, "Herb-crusted", 40),
];

/// (branch_id, identifier, capacity)
const TABLES: &[(i64, &str, i64)] = &[
    (1, "T1", 4),
    (1, "T2", 4),
    (1, "T3", 2),
    (1, "T4", 6),
    (1, "T5", 6),
    (1, "T6", 8),
    (1, "T7", 2),
    (1, "T8", 4),
    (2, "G1", 4),
    (2, "G2", 4),
    (2, "G3", 6),
    (2, "G4", 8),
    (2, "G5", 2),
    (2, "G6", 4),
    (3, "B1", 4),
    (3, "B2", 6),
    (3, "B3", 4),
];

/// (code, type, value, is_active, min order amount)
const PROMO_CODES: &[(&str, &str, i64, bool, i64)] = &[
    ("LUNA10", "percentage", 10, true, 200),
    ("SAVE20", "fixed", 20, true, 300),
    ("WELCOME15", "percentage", 15, true, 150),
    ("EXPIRED", "percentage", 5, false, 100),
];

// =============================================================================
// Seeding
// =============================================================================

/// Inserts the sample dataset in a single transaction.
///
/// Expects empty tables; on a populated database the explicit ids collide
/// and the whole seed is rolled back.
pub async fn seed_sample_data(pool: &SqlitePool) -> DbResult<()> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

    for (i, (suffix, address, status, phone, vat)) in BRANCHES.iter().enumerate() {
        let settings = json!({
            "currency": "৳",
            "vat_percentage": vat,
            "currency_symbol": "৳",
        });
        sqlx::query(
            "INSERT INTO branches (id, name, address, status, phone, settings) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(i as i64 + 1)
        .bind(format!("Luna dine - {suffix}"))
        .bind(*address)
        .bind(*status)
        .bind(*phone)
        .bind(settings.to_string())
        .execute(&mut *tx)
        .await?;
    }

    for (i, (name, description, image, tags)) in MASTER_ITEMS.iter().enumerate() {
        sqlx::query(
            "INSERT INTO master_menu_items (id, name, description, image_url, tags) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(i as i64 + 1)
        .bind(*name)
        .bind(*description)
        .bind(format!("https://picsum.photos/seed/{image}/300/200.jpg"))
        .bind(Json(tags))
        .execute(&mut *tx)
        .await?;
    }

    for (i, (branch_id, name, display_order)) in CATEGORIES.iter().enumerate() {
        sqlx::query(
            "INSERT INTO menu_categories (id, branch_id, name, display_order) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(i as i64 + 1)
        .bind(branch_id)
        .bind(*name)
        .bind(display_order)
        .execute(&mut *tx)
        .await?;
    }

    for (i, (branch_id, master_item_id, category_id, price, is_available)) in
        BRANCH_ITEMS.iter().enumerate()
    {
        sqlx::query(
            r#"
            INSERT INTO branch_menu_items (id, branch_id, master_item_id, category_id, price, is_available)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(i as i64 + 1)
        .bind(branch_id)
        .bind(master_item_id)
        .bind(category_id)
        .bind(Money::from_major(*price))
        .bind(is_available)
        .execute(&mut *tx)
        .await?;
    }

    for (i, (master_item_id, name, selection_type)) in CUSTOMIZATION_GROUPS.iter().enumerate() {
        sqlx::query(
            "INSERT INTO customization_groups (id, master_item_id, name, selection_type) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(i as i64 + 1)
        .bind(master_item_id)
        .bind(*name)
        .bind(*selection_type)
        .execute(&mut *tx)
        .await?;
    }

    for (i, (group_id, name, price)) in CUSTOMIZATION_OPTIONS.iter().enumerate() {
        sqlx::query(
            "INSERT INTO customization_options (id, group_id, name, additional_price) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(i as i64 + 1)
        .bind(group_id)
        .bind(*name)
        .bind(Money::from_major(*price))
        .execute(&mut *tx)
        .await?;
    }

    for (i, (branch_id, identifier, capacity)) in TABLES.iter().enumerate() {
        sqlx::query(
            "INSERT INTO restaurant_tables (id, branch_id, table_identifier, capacity) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(i as i64 + 1)
        .bind(branch_id)
        .bind(*identifier)
        .bind(capacity)
        .execute(&mut *tx)
        .await?;
    }

    for (i, (code, promo_type, value, is_active, min_order)) in PROMO_CODES.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO promo_codes (id, code, type, value, is_active, min_order_amount)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(i as i64 + 1)
        .bind(*code)
        .bind(*promo_type)
        .bind(value.to_string())
        .bind(is_active)
        .bind(Money::from_major(*min_order))
        .execute(&mut *tx)
        .await?;
    }

    seed_history(&mut tx).await?;

    tx.commit()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

    info!(
        branches = BRANCHES.len(),
        menu_items = BRANCH_ITEMS.len(),
        tables = TABLES.len(),
        promo_codes = PROMO_CODES.len(),
        "Sample data seeded"
    );

    Ok(())
}

/// Two past orders with their lines, one feedback and two service requests.
async fn seed_history(conn: &mut sqlx::SqliteConnection) -> DbResult<()> {
    let now = Utc::now();
    let two_days_ago = now - Duration::days(2);
    let half_hour_ago = now - Duration::minutes(30);

    // (uid, branch, table, type, status, name, phone, [subtotal, vat, discount, total], promo, created, completed)
    let orders = [
        (
            "ORD123456789",
            1_i64,
            Some(1_i64),
            OrderType::DineIn,
            OrderStatus::Completed,
            "John Doe",
            "+8801712345678",
            [500_i64, 75, 0, 575],
            None::<i64>,
            two_days_ago,
            Some(two_days_ago + Duration::hours(1)),
        ),
        (
            "ORD987654321",
            2,
            None,
            OrderType::Takeaway,
            OrderStatus::InKitchen,
            "Jane Smith",
            "+8801812345678",
            [350, 42, 35, 357],
            Some(1),
            half_hour_ago,
            None,
        ),
    ];

    for (i, (uid, branch_id, table_id, order_type, status, name, phone, amounts, promo_id, created, completed)) in
        orders.into_iter().enumerate()
    {
        let [subtotal, vat, discount, total] = amounts.map(Money::from_major);
        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_uid, branch_id, table_id, order_type, status,
                customer_name, customer_phone,
                subtotal, vat_amount, discount_amount, total_amount,
                promo_code_id, estimated_completion_time, created_at, completed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
        )
        .bind(i as i64 + 1)
        .bind(uid)
        .bind(branch_id)
        .bind(table_id)
        .bind(order_type)
        .bind(status)
        .bind(name)
        .bind(phone)
        .bind(subtotal)
        .bind(vat)
        .bind(discount)
        .bind(total)
        .bind(promo_id)
        .bind(luna_core::estimated_completion(created))
        .bind(created)
        .bind(completed)
        .execute(&mut *conn)
        .await?;
    }

    let choice = |group: &str, option: &str| ChosenCustomization {
        group: group.to_string(),
        option: option.to_string(),
    };

    // (order_id, branch_menu_item_id, quantity, unit price, customizations)
    let items = [
        (1_i64, 1_i64, 2_i64, 150_i64, vec![choice("Sauce", "Sweet Chili")]),
        (
            1,
            2,
            1,
            350,
            vec![choice("Spice Level", "Medium"), choice("Extra Toppings", "Boiled Egg")],
        ),
        (2, 10, 1, 220, vec![]),
        (2, 11, 1, 90, vec![]),
    ];

    for (order_id, item_id, quantity, price, customizations) in items {
        sqlx::query(
            r#"
            INSERT INTO order_items (order_id, branch_menu_item_id, quantity, unit_price, customizations)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(order_id)
        .bind(item_id)
        .bind(quantity)
        .bind(Money::from_major(price))
        .bind(Json(&customizations))
        .execute(&mut *conn)
        .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO feedback (
            order_id, overall_rating, food_rating, service_rating,
            item_feedback, comment, created_at
        ) VALUES (1, 5, 5, 4, ?1, ?2, ?3)
        "#,
    )
    .bind(Json(json!([
        {"item_id": 1, "rating": "thumb_up"},
        {"item_id": 2, "rating": "thumb_up"},
    ])))
    .bind("Excellent food quality and service!")
    .bind(two_days_ago + Duration::hours(1))
    .execute(&mut *conn)
    .await?;

    let requests = [
        (
            1_i64,
            RequestType::Water,
            ServiceRequestStatus::Fulfilled,
            two_days_ago + Duration::minutes(30),
            Some(two_days_ago + Duration::minutes(35)),
        ),
        (
            2,
            RequestType::Assistance,
            ServiceRequestStatus::Pending,
            now - Duration::minutes(10),
            None,
        ),
    ];

    for (table_id, request_type, status, created, fulfilled) in requests {
        sqlx::query(
            r#"
            INSERT INTO service_requests (table_id, request_type, status, created_at, fulfilled_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(table_id)
        .bind(request_type)
        .bind(status)
        .bind(created)
        .bind(fulfilled)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}
