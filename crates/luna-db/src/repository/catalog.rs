//! # Catalog Repository
//!
//! Read-only access to branches, menus and tables.
//!
//! ## Two Entry Points
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Free functions (branch_settings, item_prices, find_table)             │
//! │    take &mut SqliteConnection so the order transaction can run them    │
//! │    on its own connection, inside its own snapshot.                     │
//! │                                                                         │
//! │  CatalogRepository methods                                             │
//! │    acquire a pooled connection and delegate to the free functions.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use luna_core::{
    parse_tags, BranchSettings, BranchSummary, CustomizationGroup, CustomizationOption, Menu,
    MenuCategory, MenuItem, Money, RestaurantTable, SelectionType,
};

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    branch_menu_item_id: i64,
    price: Money,
    is_available: bool,
    master_item_id: i64,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    tags: Option<String>,
    category_id: i64,
    category_name: String,
}

/// One (group, option) pair; `option_*` are NULL for a group without options.
#[derive(Debug, sqlx::FromRow)]
struct CustomizationRow {
    master_item_id: i64,
    group_id: i64,
    group_name: String,
    selection_type: SelectionType,
    option_id: Option<i64>,
    option_name: Option<String>,
    additional_price: Option<Money>,
}

// =============================================================================
// Connection-Level Lookups
// =============================================================================

/// Loads and parses the settings of a branch. `None` if the branch is absent.
pub async fn branch_settings(
    conn: &mut SqliteConnection,
    branch_id: i64,
) -> DbResult<Option<BranchSettings>> {
    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT settings FROM branches WHERE id = ?1")
            .bind(branch_id)
            .fetch_optional(&mut *conn)
            .await?;

    match row {
        Some((raw,)) => Ok(Some(BranchSettings::parse(branch_id, raw.as_deref())?)),
        None => Ok(None),
    }
}

/// Resolves branch prices for a set of branch menu item ids.
///
/// Unknown ids are simply absent from the map. Duplicate ids are queried once.
pub async fn item_prices(
    conn: &mut SqliteConnection,
    ids: &[i64],
) -> DbResult<HashMap<i64, Money>> {
    let mut unique: Vec<i64> = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();

    if unique.is_empty() {
        return Ok(HashMap::new());
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT id, price FROM branch_menu_items WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in &unique {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let rows: Vec<(i64, Money)> = builder.build_query_as().fetch_all(&mut *conn).await?;

    debug!(requested = unique.len(), found = rows.len(), "Resolved item prices");

    Ok(rows.into_iter().collect())
}

/// Finds a table only if it belongs to `branch_id`.
pub async fn find_table(
    conn: &mut SqliteConnection,
    table_id: i64,
    branch_id: i64,
) -> DbResult<Option<RestaurantTable>> {
    let table = sqlx::query_as::<_, RestaurantTable>(
        r#"
        SELECT id, branch_id, table_identifier, capacity
        FROM restaurant_tables
        WHERE id = ?1 AND branch_id = ?2
        "#,
    )
    .bind(table_id)
    .bind(branch_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(table)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for branch, menu and table lookups.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// All branches, ordered by id.
    pub async fn list_branches(&self) -> DbResult<Vec<BranchSummary>> {
        let branches = sqlx::query_as::<_, BranchSummary>(
            "SELECT id, name, address, status, phone FROM branches ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(branches)
    }

    /// Settings of one branch.
    pub async fn branch_settings(&self, branch_id: i64) -> DbResult<Option<BranchSettings>> {
        let mut conn = self.pool.acquire().await?;
        branch_settings(&mut conn, branch_id).await
    }

    /// Branch price of a single menu item.
    pub async fn item_price(&self, branch_menu_item_id: i64) -> DbResult<Option<Money>> {
        let mut conn = self.pool.acquire().await?;
        let prices = item_prices(&mut conn, &[branch_menu_item_id]).await?;
        Ok(prices.get(&branch_menu_item_id).copied())
    }

    /// Prices of several menu items in one query.
    pub async fn item_prices(&self, ids: &[i64]) -> DbResult<HashMap<i64, Money>> {
        let mut conn = self.pool.acquire().await?;
        item_prices(&mut conn, ids).await
    }

    /// A table, if it belongs to the branch.
    pub async fn find_table(
        &self,
        table_id: i64,
        branch_id: i64,
    ) -> DbResult<Option<RestaurantTable>> {
        let mut conn = self.pool.acquire().await?;
        find_table(&mut conn, table_id, branch_id).await
    }

    /// Tables of a branch, ordered by identifier.
    ///
    /// An unknown branch has no tables.
    pub async fn list_tables(&self, branch_id: i64) -> DbResult<Vec<RestaurantTable>> {
        let tables = sqlx::query_as::<_, RestaurantTable>(
            r#"
            SELECT id, branch_id, table_identifier, capacity
            FROM restaurant_tables
            WHERE branch_id = ?1
            ORDER BY table_identifier
            "#,
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tables)
    }

    /// The full menu of a branch.
    ///
    /// ## Query Plan
    /// Three queries on one connection, regardless of menu size:
    /// 1. categories of the branch, by `display_order`
    /// 2. items of the branch, by category `display_order` then name
    /// 3. every customization group/option of those items, by group id then option id
    ///
    /// An unknown branch yields a menu with no categories.
    pub async fn menu(&self, branch_id: i64) -> DbResult<Menu> {
        let mut conn = self.pool.acquire().await?;

        let categories = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name
            FROM menu_categories
            WHERE branch_id = ?1
            ORDER BY display_order, id
            "#,
        )
        .bind(branch_id)
        .fetch_all(&mut *conn)
        .await?;

        if categories.is_empty() {
            return Ok(Menu::default());
        }

        let items = sqlx::query_as::<_, MenuItemRow>(
            r#"
            SELECT
                bmi.id AS branch_menu_item_id,
                bmi.price,
                bmi.is_available,
                mmi.id AS master_item_id,
                mmi.name,
                mmi.description,
                mmi.image_url,
                mmi.tags,
                mc.id AS category_id,
                mc.name AS category_name
            FROM branch_menu_items bmi
            JOIN master_menu_items mmi ON bmi.master_item_id = mmi.id
            JOIN menu_categories mc ON bmi.category_id = mc.id
            WHERE bmi.branch_id = ?1
            ORDER BY mc.display_order, mmi.name
            "#,
        )
        .bind(branch_id)
        .fetch_all(&mut *conn)
        .await?;

        let customization_rows = sqlx::query_as::<_, CustomizationRow>(
            r#"
            SELECT
                cg.master_item_id,
                cg.id AS group_id,
                cg.name AS group_name,
                cg.selection_type,
                co.id AS option_id,
                co.name AS option_name,
                co.additional_price
            FROM customization_groups cg
            LEFT JOIN customization_options co ON co.group_id = cg.id
            WHERE cg.master_item_id IN (
                SELECT master_item_id FROM branch_menu_items WHERE branch_id = ?1
            )
            ORDER BY cg.master_item_id, cg.id, co.id
            "#,
        )
        .bind(branch_id)
        .fetch_all(&mut *conn)
        .await?;

        debug!(
            branch_id,
            categories = categories.len(),
            items = items.len(),
            customization_rows = customization_rows.len(),
            "Loaded menu"
        );

        let customizations = group_customizations(customization_rows);

        let mut by_category: HashMap<i64, Vec<MenuItem>> = HashMap::new();
        for row in items {
            let item = MenuItem {
                branch_menu_item_id: row.branch_menu_item_id,
                price: row.price,
                is_available: row.is_available,
                master_item_id: row.master_item_id,
                name: row.name,
                description: row.description,
                image_url: row.image_url,
                tags: parse_tags(row.tags.as_deref()),
                category_id: row.category_id,
                category_name: row.category_name,
                // Cloned: two branch items may share one master item
                customizations: customizations
                    .get(&row.master_item_id)
                    .cloned()
                    .unwrap_or_default(),
            };
            by_category.entry(item.category_id).or_default().push(item);
        }

        let categories = categories
            .into_iter()
            .map(|category| MenuCategory {
                items: by_category.remove(&category.id).unwrap_or_default(),
                id: category.id,
                name: category.name,
            })
            .collect();

        Ok(Menu { categories })
    }
}

/// Folds ordered (group, option) rows into groups per master item.
fn group_customizations(rows: Vec<CustomizationRow>) -> HashMap<i64, Vec<CustomizationGroup>> {
    let mut groups: HashMap<i64, Vec<CustomizationGroup>> = HashMap::new();

    for row in rows {
        let item_groups = groups.entry(row.master_item_id).or_default();

        let starts_new_group = item_groups.last().map_or(true, |g| g.id != row.group_id);
        if starts_new_group {
            item_groups.push(CustomizationGroup {
                id: row.group_id,
                name: row.group_name,
                selection_type: row.selection_type,
                options: Vec::new(),
            });
        }

        if let (Some(id), Some(name), Some(group)) =
            (row.option_id, row.option_name, item_groups.last_mut())
        {
            group.options.push(CustomizationOption {
                id,
                name,
                additional_price: row.additional_price.unwrap_or_default(),
            });
        }
    }

    groups
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::seed::seed_sample_data;
    use crate::{Database, DbConfig};
    use luna_core::{BranchStatus, Percentage};

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_sample_data(db.pool()).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_list_branches() {
        let db = seeded().await;
        let branches = db.catalog().list_branches().await.unwrap();

        assert_eq!(branches.len(), 3);
        assert_eq!(branches[0].id, 1);
        assert_eq!(branches[0].status, BranchStatus::Open);
        assert_eq!(branches[2].status, BranchStatus::Closed);
    }

    #[tokio::test]
    async fn test_branch_settings() {
        let db = seeded().await;

        let settings = db.catalog().branch_settings(2).await.unwrap().unwrap();
        assert_eq!(settings.vat_percentage().unwrap(), Percentage::from_whole(12));
        assert_eq!(settings.get("currency_symbol").unwrap(), "৳");

        assert!(db.catalog().branch_settings(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_branch_without_settings_uses_default_vat() {
        let db = seeded().await;
        sqlx::query("INSERT INTO branches (id, name, status) VALUES (10, 'Pop-up', 'open')")
            .execute(db.pool())
            .await
            .unwrap();

        let settings = db.catalog().branch_settings(10).await.unwrap().unwrap();
        assert_eq!(settings.vat_percentage().unwrap(), Percentage::from_whole(15));
    }

    #[tokio::test]
    async fn test_menu_structure() {
        let db = seeded().await;
        let menu = db.catalog().menu(1).await.unwrap();

        let names: Vec<&str> = menu.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Appetizers", "Main Course", "Desserts", "Beverages"]);

        // Appetizers are ordered by name
        let appetizers: Vec<&str> = menu.categories[0]
            .items
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(appetizers, ["Chicken Soup", "Spring Rolls"]);

        let spring_rolls = &menu.categories[0].items[1];
        assert_eq!(spring_rolls.branch_menu_item_id, 1);
        assert_eq!(spring_rolls.price, luna_core::Money::from_major(150));
        assert_eq!(spring_rolls.tags, ["vegetarian", "popular", "appetizer"]);
        assert_eq!(spring_rolls.customizations.len(), 1);
        assert_eq!(spring_rolls.customizations[0].name, "Sauce");
        assert_eq!(spring_rolls.customizations[0].options.len(), 3);

        let biryani = menu.categories[1]
            .items
            .iter()
            .find(|i| i.name == "Chicken Biryani")
            .unwrap();
        let group_names: Vec<&str> = biryani.customizations.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(group_names, ["Spice Level", "Extra Toppings"]);

        let lemonade = menu.categories[3]
            .items
            .iter()
            .find(|i| i.name == "Fresh Lemonade")
            .unwrap();
        assert!(!lemonade.is_available);
        assert!(lemonade.customizations.is_empty());
    }

    #[tokio::test]
    async fn test_menu_group_without_options() {
        let db = seeded().await;
        sqlx::query(
            "INSERT INTO customization_groups (master_item_id, name, selection_type) VALUES (4, 'Candles', 'multiple')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let menu = db.catalog().menu(1).await.unwrap();
        let cake = &menu.categories[2].items[0];
        assert_eq!(cake.name, "Chocolate Cake");
        assert_eq!(cake.customizations.len(), 1);
        assert!(cake.customizations[0].options.is_empty());
    }

    #[tokio::test]
    async fn test_menu_unknown_branch_is_empty() {
        let db = seeded().await;
        let menu = db.catalog().menu(404).await.unwrap();
        assert!(menu.categories.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_tags_become_empty() {
        let db = seeded().await;
        sqlx::query("UPDATE master_menu_items SET tags = 'oops' WHERE id = 1")
            .execute(db.pool())
            .await
            .unwrap();

        let menu = db.catalog().menu(1).await.unwrap();
        let spring_rolls = &menu.categories[0].items[1];
        assert!(spring_rolls.tags.is_empty());
    }

    #[tokio::test]
    async fn test_list_tables() {
        let db = seeded().await;

        let tables = db.catalog().list_tables(2).await.unwrap();
        let ids: Vec<&str> = tables.iter().map(|t| t.table_identifier.as_str()).collect();
        assert_eq!(ids, ["G1", "G2", "G3", "G4", "G5", "G6"]);

        assert!(db.catalog().list_tables(404).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_table_checks_branch() {
        let db = seeded().await;

        assert!(db.catalog().find_table(1, 1).await.unwrap().is_some());
        // Table 9 (G1) belongs to branch 2
        assert!(db.catalog().find_table(9, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_item_prices() {
        let db = seeded().await;

        let prices = db.catalog().item_prices(&[1, 2, 2, 999]).await.unwrap();
        assert_eq!(prices.len(), 2);
        assert_eq!(prices[&2], luna_core::Money::from_major(350));

        assert_eq!(
            db.catalog().item_price(5).await.unwrap(),
            Some(luna_core::Money::from_major(80))
        );
        assert_eq!(db.catalog().item_price(999).await.unwrap(), None);
    }
}
