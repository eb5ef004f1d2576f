//! # Validation Module
//!
//! Input validation utilities for Luna Dine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (api-server)                                    │
//! │  ├── JSON shape (deserialization into request structs)                 │
//! │  └── Required fields present                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Quantities, ratings, cart size                                    │
//! │  └── Free-text lengths                                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE (order_uid, promo code)                                    │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Everything here runs before any database access.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use luna_core::validation::{validate_quantity, validate_rating};
//!
//! assert!(validate_quantity(2).is_ok());
//! assert!(validate_rating("overall rating", 6).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{CartLine, Ratings};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, MAX_RATING};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted order uid.
const MAX_ORDER_UID_LEN: usize = 64;

/// Longest accepted promo code.
const MAX_PROMO_CODE_LEN: usize = 50;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a row id supplied by a client.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a single rating (1..=5).
pub fn validate_rating(field: &str, rating: i64) -> ValidationResult<()> {
    if !(1..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_RATING,
        });
    }

    Ok(())
}

/// Validates a full set of ratings.
///
/// `overall` is always checked; `food` and `service` only when present.
///
/// ## Example
/// ```rust
/// use luna_core::types::Ratings;
/// use luna_core::validation::validate_ratings;
///
/// assert!(validate_ratings(&Ratings { overall: 3, food: None, service: None }).is_ok());
/// assert!(validate_ratings(&Ratings { overall: 0, food: None, service: None }).is_err());
/// assert!(validate_ratings(&Ratings { overall: 4, food: Some(9), service: None }).is_err());
/// ```
pub fn validate_ratings(ratings: &Ratings) -> ValidationResult<()> {
    validate_rating("overall rating", ratings.overall)?;

    if let Some(food) = ratings.food {
        validate_rating("food rating", food)?;
    }
    if let Some(service) = ratings.service {
        validate_rating("service rating", service)?;
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates a cart before pricing.
///
/// ## Rules
/// - At least one line
/// - At most MAX_CART_ITEMS (100) lines
/// - Every line has a positive item id and a valid quantity
pub fn validate_cart(lines: &[CartLine]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::required("items"));
    }

    if lines.len() > MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_CART_ITEMS as i64,
        });
    }

    for line in lines {
        validate_id("branch_menu_item_id", line.branch_menu_item_id)?;
        validate_quantity(line.quantity)?;
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates an external order id.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters, ASCII letters and digits only
pub fn validate_order_uid(uid: &str) -> ValidationResult<()> {
    if uid.trim().is_empty() {
        return Err(ValidationError::required("order_uid"));
    }

    if uid.len() > MAX_ORDER_UID_LEN {
        return Err(ValidationError::TooLong {
            field: "order_uid".to_string(),
            max: MAX_ORDER_UID_LEN,
        });
    }

    if !uid.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: "order_uid".to_string(),
            reason: "must contain only letters and digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a promo code as typed by the guest.
///
/// Codes are case-sensitive and are not trimmed.
pub fn validate_promo_code(code: &str) -> ValidationResult<()> {
    if code.trim().is_empty() {
        return Err(ValidationError::required("code"));
    }

    if code.len() > MAX_PROMO_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: MAX_PROMO_CODE_LEN,
        });
    }

    Ok(())
}

/// Validates optional free text (names, comments, addresses).
///
/// Length is counted in characters, not bytes.
pub fn validate_free_text(field: &str, text: Option<&str>, max: usize) -> ValidationResult<()> {
    match text {
        Some(text) if text.chars().count() > max => Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
