//! # Domain Types
//!
//! Core domain types used throughout Luna Dine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Catalog (read-only during ordering)                                    │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ BranchSummary   │   │   MenuItem      │   │ RestaurantTable │       │
//! │  │ BranchSettings  │   │   price: Money  │   │  identifier     │       │
//! │  │  vat_percentage │   │   customizations│   │  capacity       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Ordering                                                               │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   PlaceOrder    │   │     Order       │   │   OrderItem     │       │
//! │  │   CartLine[]    │──►│  order_uid      │──►│  unit_price     │       │
//! │  │   promo_code?   │   │  status         │   │  (snapshot)     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  After the meal                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │  NewFeedback    │   │ ServiceRequest  │                             │
//! │  │  Ratings 1..=5  │   │ water/bill/...  │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Orders have:
//! - `id`: integer row key, used for database relations only
//! - `order_uid`: opaque external id (`ORD…`), the only id clients ever see

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{Money, Percentage};
use crate::{DEFAULT_VAT_PERCENTAGE, ORDER_PREPARATION_MINUTES};

// =============================================================================
// Branch
// =============================================================================

/// Whether a branch is currently taking guests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum BranchStatus {
    Open,
    Closed,
}

impl BranchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BranchStatus::Open => "open",
            BranchStatus::Closed => "closed",
        }
    }
}

/// A branch as listed by `GET /api/branches`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BranchSummary {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub status: BranchStatus,
    pub phone: Option<String>,
}

/// Branch-scoped configuration (VAT, currency symbol, ...).
///
/// Stored as a free-form JSON object. Only `vat_percentage` is interpreted
/// by the backend; every other key is passed through to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchSettings {
    branch_id: i64,
    values: serde_json::Map<String, serde_json::Value>,
}

impl BranchSettings {
    /// Parses the stored settings blob of a branch.
    ///
    /// A missing or blank blob is an empty settings object.
    pub fn parse(branch_id: i64, raw: Option<&str>) -> CoreResult<Self> {
        let raw = raw.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Ok(BranchSettings {
                branch_id,
                values: serde_json::Map::new(),
            });
        }

        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Object(values)) => Ok(BranchSettings { branch_id, values }),
            Ok(serde_json::Value::Null) => Ok(BranchSettings {
                branch_id,
                values: serde_json::Map::new(),
            }),
            Ok(_) => Err(CoreError::InvalidBranchSettings {
                branch_id,
                reason: "settings must be a JSON object".to_string(),
            }),
            Err(e) => Err(CoreError::InvalidBranchSettings {
                branch_id,
                reason: e.to_string(),
            }),
        }
    }

    /// The branch these settings belong to.
    #[inline]
    pub fn branch_id(&self) -> i64 {
        self.branch_id
    }

    /// Raw value of a settings key.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// VAT percentage applied to orders of this branch.
    ///
    /// Falls back to [`DEFAULT_VAT_PERCENTAGE`] when the key is absent or null.
    /// Numeric strings are accepted; anything else, or a negative figure,
    /// is an [`CoreError::InvalidBranchSettings`].
    pub fn vat_percentage(&self) -> CoreResult<Percentage> {
        let text = match self.values.get("vat_percentage") {
            None | Some(serde_json::Value::Null) => {
                return Ok(Percentage::from_whole(DEFAULT_VAT_PERCENTAGE))
            }
            Some(serde_json::Value::Number(n)) => n.to_string(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(self.invalid(format!("vat_percentage is not a number: {other}")))
            }
        };

        let pct = parse_percentage(&text)
            .ok_or_else(|| self.invalid(format!("vat_percentage is not a number: {text}")))?;

        if pct.value().is_sign_negative() && !pct.value().is_zero() {
            return Err(self.invalid("vat_percentage must not be negative".to_string()));
        }

        Ok(pct)
    }

    /// Settings object as returned to clients, with `branch_id` injected.
    pub fn to_response(&self) -> serde_json::Value {
        let mut values = self.values.clone();
        values.insert("branch_id".to_string(), serde_json::Value::from(self.branch_id));
        serde_json::Value::Object(values)
    }

    fn invalid(&self, reason: String) -> CoreError {
        CoreError::InvalidBranchSettings {
            branch_id: self.branch_id,
            reason,
        }
    }
}

/// Parses decimal text, also accepting exponent notation (`1.5e1`).
fn parse_percentage(text: &str) -> Option<Percentage> {
    Percentage::from_str(text)
        .ok()
        .or_else(|| Decimal::from_scientific(text.trim()).ok().map(Percentage::new))
}

// =============================================================================
// Menu
// =============================================================================

/// The full menu of one branch, grouped by category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Menu {
    pub categories: Vec<MenuCategory>,
}

/// A menu section such as "Appetizers".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategory {
    pub id: i64,
    pub name: String,
    pub items: Vec<MenuItem>,
}

/// A dish as offered by one branch.
///
/// Combines the shared master item (name, description, tags) with the
/// branch-specific price and availability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub branch_menu_item_id: i64,
    pub price: Money,
    pub is_available: bool,
    pub master_item_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub category_id: i64,
    pub category_name: String,
    pub customizations: Vec<CustomizationGroup>,
}

/// How many options of a group a guest may pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum SelectionType {
    Single,
    Multiple,
}

/// A configurable attribute of a dish, e.g. "Spice Level".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomizationGroup {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub selection_type: SelectionType,
    pub options: Vec<CustomizationOption>,
}

/// One selectable option of a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomizationOption {
    pub id: i64,
    pub name: String,
    /// Surcharge shown on the menu. Not added to order totals.
    #[serde(rename = "price")]
    pub additional_price: Money,
}

/// Parses the stored `tags` column of a master item.
///
/// Malformed JSON, `null` and non-string entries yield no tags.
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|text| serde_json::from_str::<Vec<serde_json::Value>>(text).ok())
        .map(|values| {
            values
                .into_iter()
                .filter_map(|v| match v {
                    serde_json::Value::String(s) => Some(s),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// Tables
// =============================================================================

/// A physical table of a branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RestaurantTable {
    pub id: i64,
    #[serde(skip_serializing)]
    pub branch_id: i64,
    /// Label printed on the table, e.g. `T1`.
    pub table_identifier: String,
    pub capacity: i64,
}

// =============================================================================
// Promo Codes
// =============================================================================

/// Stored discriminator of a promo code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PromoType {
    Percentage,
    Fixed,
}

/// What a promo code takes off the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountRule {
    /// Percent of the subtotal.
    Percentage(Percentage),
    /// Flat amount.
    Fixed(Money),
}

impl DiscountRule {
    /// Builds a rule from the stored `(type, value)` pair.
    pub fn from_parts(promo_type: PromoType, value: Decimal) -> Self {
        match promo_type {
            PromoType::Percentage => DiscountRule::Percentage(Percentage::new(value)),
            PromoType::Fixed => DiscountRule::Fixed(Money::new(value)),
        }
    }

    /// The stored discriminator.
    pub fn promo_type(&self) -> PromoType {
        match self {
            DiscountRule::Percentage(_) => PromoType::Percentage,
            DiscountRule::Fixed(_) => PromoType::Fixed,
        }
    }

    /// The configured figure (percent or amount).
    pub fn value(&self) -> Decimal {
        match self {
            DiscountRule::Percentage(pct) => pct.value(),
            DiscountRule::Fixed(amount) => amount.amount(),
        }
    }
}

/// A discount rule keyed by a case-sensitive code.
#[derive(Debug, Clone, PartialEq)]
pub struct PromoCode {
    pub id: i64,
    pub code: String,
    pub rule: DiscountRule,
    pub is_active: bool,
    pub min_order_amount: Money,
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle of an order.
///
/// ```text
///   placed ──► in_kitchen ──► ready ──► completed
///     │            │
///     └────────────┴──► cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Accepted, waiting for the kitchen.
    Placed,
    /// Being prepared.
    InKitchen,
    /// Ready for pickup or serving.
    Ready,
    /// Handed over.
    Completed,
    /// Withdrawn before preparation finished.
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Placed,
        OrderStatus::InKitchen,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Stored/serialized name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "placed",
            OrderStatus::InKitchen => "in_kitchen",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// No transition leaves a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Placed, InKitchen)
                | (InKitchen, Ready)
                | (Ready, Completed)
                | (Placed, Cancelled)
                | (InKitchen, Cancelled)
        )
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Placed
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| not_allowed("status", OrderStatus::ALL.iter().map(|s| s.as_str())))
    }
}

// =============================================================================
// Order Type
// =============================================================================

/// How the guest receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    DineIn,
    Takeaway,
    Delivery,
}

impl OrderType {
    pub const ALL: [OrderType; 3] = [OrderType::DineIn, OrderType::Takeaway, OrderType::Delivery];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::DineIn => "dine-in",
            OrderType::Takeaway => "takeaway",
            OrderType::Delivery => "delivery",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| not_allowed("order type", OrderType::ALL.iter().map(|t| t.as_str())))
    }
}

fn not_allowed<'a>(field: &str, allowed: impl Iterator<Item = &'a str>) -> ValidationError {
    ValidationError::NotAllowed {
        field: field.to_string(),
        allowed: allowed.map(str::to_string).collect(),
    }
}

// =============================================================================
// Placing an Order
// =============================================================================

/// Optional contact details captured with an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A customization picked by the guest, stored as labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChosenCustomization {
    pub group: String,
    pub option: String,
}

/// One line of the guest's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub branch_menu_item_id: i64,
    pub quantity: i64,
    #[serde(default)]
    pub customizations: Vec<ChosenCustomization>,
}

/// A validated request to place an order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceOrder {
    pub branch_id: i64,
    pub order_type: OrderType,
    pub table_id: Option<i64>,
    pub customer: CustomerInfo,
    pub promo_code: Option<String>,
    pub lines: Vec<CartLine>,
}

/// Estimated completion time of an order placed at `placed_at`.
pub fn estimated_completion(placed_at: DateTime<Utc>) -> DateTime<Utc> {
    placed_at + Duration::minutes(ORDER_PREPARATION_MINUTES)
}

// =============================================================================
// Stored Orders
// =============================================================================

/// An order header as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub order_uid: String,
    pub branch_id: i64,
    pub table_id: Option<i64>,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub subtotal: Money,
    pub vat_amount: Money,
    pub discount_amount: Money,
    pub total_amount: Money,
    pub promo_code_id: Option<i64>,
    pub estimated_completion_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A line item of an order.
/// Uses snapshot pattern to freeze the branch price at order time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub branch_menu_item_id: i64,
    pub quantity: i64,
    /// Unit price at time of order (frozen).
    pub unit_price: Money,
    #[cfg_attr(feature = "sqlx", sqlx(json))]
    pub customizations: Vec<ChosenCustomization>,
}

impl OrderItem {
    /// unit_price × quantity
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// What `GET /api/order_status` reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderStatusSummary {
    pub order_uid: String,
    pub status: OrderStatus,
    pub estimated_completion_time: Option<DateTime<Utc>>,
}

// =============================================================================
// Feedback
// =============================================================================

/// Guest ratings, each 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratings {
    pub overall: i64,
    pub food: Option<i64>,
    pub service: Option<i64>,
}

/// Feedback to attach to an order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedback {
    pub ratings: Ratings,
    /// Free-form per-item feedback, stored verbatim.
    pub item_feedback: serde_json::Value,
    pub comment: Option<String>,
}

/// Stored feedback row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Feedback {
    pub id: i64,
    pub order_id: i64,
    pub overall_rating: i64,
    pub food_rating: Option<i64>,
    pub service_rating: Option<i64>,
    #[cfg_attr(feature = "sqlx", sqlx(json))]
    pub item_feedback: serde_json::Value,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Service Requests
// =============================================================================

/// What a table is asking staff for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    Assistance,
    Water,
    Bill,
}

impl RequestType {
    pub const ALL: [RequestType; 3] = [RequestType::Assistance, RequestType::Water, RequestType::Bill];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Assistance => "assistance",
            RequestType::Water => "water",
            RequestType::Bill => "bill",
        }
    }
}

impl FromStr for RequestType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| not_allowed("request type", RequestType::ALL.iter().map(|t| t.as_str())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ServiceRequestStatus {
    Pending,
    Fulfilled,
}

/// A call for staff from a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ServiceRequest {
    pub id: i64,
    pub table_id: i64,
    pub request_type: RequestType,
    pub status: ServiceRequestStatus,
    pub created_at: DateTime<Utc>,
    pub fulfilled_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_transitions() {
        use OrderStatus::*;

        assert!(Placed.can_transition_to(InKitchen));
        assert!(InKitchen.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Completed));
        assert!(Placed.can_transition_to(Cancelled));
        assert!(InKitchen.can_transition_to(Cancelled));

        assert!(!Placed.can_transition_to(Ready));
        assert!(!Ready.can_transition_to(Cancelled));
        assert!(!Placed.can_transition_to(Placed));

        for next in OrderStatus::ALL {
            assert!(!Completed.can_transition_to(next));
            assert!(!Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_status_names() {
        assert_eq!(OrderStatus::InKitchen.to_string(), "in_kitchen");
        assert_eq!("in_kitchen".parse::<OrderStatus>().unwrap(), OrderStatus::InKitchen);
        assert!("kitchen".parse::<OrderStatus>().is_err());
        assert_eq!(
            serde_json::to_value(OrderStatus::InKitchen).unwrap(),
            serde_json::json!("in_kitchen")
        );
        assert_eq!(OrderStatus::default(), OrderStatus::Placed);
    }

    #[test]
    fn test_order_type_names() {
        assert_eq!("dine-in".parse::<OrderType>().unwrap(), OrderType::DineIn);
        assert_eq!("takeaway".parse::<OrderType>().unwrap(), OrderType::Takeaway);
        assert!("dine_in".parse::<OrderType>().is_err());
        assert_eq!(
            serde_json::to_value(OrderType::DineIn).unwrap(),
            serde_json::json!("dine-in")
        );
    }

    #[test]
    fn test_request_type_parse() {
        assert_eq!("bill".parse::<RequestType>().unwrap(), RequestType::Bill);
        let err = "coffee".parse::<RequestType>().unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { .. }));
    }

    #[test]
    fn test_settings_vat_percentage() {
        let settings =
            BranchSettings::parse(2, Some(r#"{"currency":"৳","vat_percentage":12}"#)).unwrap();
        assert_eq!(settings.vat_percentage().unwrap(), Percentage::from_whole(12));

        let settings = BranchSettings::parse(1, Some(r#"{"vat_percentage":"7.5"}"#)).unwrap();
        assert_eq!(settings.vat_percentage().unwrap(), Percentage::new(dec!(7.5)));

        let settings = BranchSettings::parse(1, Some(r#"{"currency":"৳"}"#)).unwrap();
        assert_eq!(settings.vat_percentage().unwrap(), Percentage::from_whole(15));

        let settings = BranchSettings::parse(1, None).unwrap();
        assert_eq!(settings.vat_percentage().unwrap(), Percentage::from_whole(15));
    }

    #[test]
    fn test_settings_invalid() {
        assert!(matches!(
            BranchSettings::parse(1, Some("[1,2]")),
            Err(CoreError::InvalidBranchSettings { branch_id: 1, .. })
        ));
        assert!(BranchSettings::parse(1, Some("{not json")).is_err());

        let settings = BranchSettings::parse(1, Some(r#"{"vat_percentage":true}"#)).unwrap();
        assert!(settings.vat_percentage().is_err());

        let settings = BranchSettings::parse(1, Some(r#"{"vat_percentage":-5}"#)).unwrap();
        assert!(settings.vat_percentage().is_err());
    }

    #[test]
    fn test_settings_response_injects_branch_id() {
        let settings = BranchSettings::parse(3, Some(r#"{"currency_symbol":"৳"}"#)).unwrap();
        let json = settings.to_response();
        assert_eq!(json["branch_id"], 3);
        assert_eq!(json["currency_symbol"], "৳");
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(Some(r#"["vegetarian","popular"]"#)), vec!["vegetarian", "popular"]);
        assert!(parse_tags(Some("null")).is_empty());
        assert!(parse_tags(Some("not json")).is_empty());
        assert!(parse_tags(None).is_empty());
        assert_eq!(parse_tags(Some(r#"["a", 1, null]"#)), vec!["a"]);
    }

    #[test]
    fn test_discount_rule_parts() {
        let rule = DiscountRule::from_parts(PromoType::Fixed, dec!(20));
        assert_eq!(rule, DiscountRule::Fixed(Money::from_major(20)));
        assert_eq!(rule.promo_type(), PromoType::Fixed);
        assert_eq!(rule.value(), dec!(20));
    }

    #[test]
    fn test_estimated_completion() {
        let placed = DateTime::parse_from_rfc3339("2025-01-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let eta = estimated_completion(placed);
        assert_eq!(eta.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-01-01 12:30:00");
    }

    #[test]
    fn test_cart_line_customizations_default_empty() {
        let line: CartLine =
            serde_json::from_str(r#"{"branch_menu_item_id":1,"quantity":2}"#).unwrap();
        assert!(line.customizations.is_empty());
    }
}
