//! # Promo Evaluation
//!
//! Decides whether a promo code applies to a subtotal and how much it takes
//! off.
//!
//! ## Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  code looked up (active only)                                           │
//! │       │                                                                 │
//! │       ├── none / inactive ───────────────► no discount                  │
//! │       │                                                                 │
//! │       ├── subtotal < min_order_amount ───► no discount                  │
//! │       │                                                                 │
//! │       ├── percentage: subtotal × value / 100                            │
//! │       ├── fixed:      value                                             │
//! │       │                                                                 │
//! │       └── clamp to subtotal                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An unknown code is never an error here. The order still goes through,
//! just without a discount.

use crate::money::Money;
use crate::types::{DiscountRule, PromoCode};

/// Result of evaluating a promo code against a subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromoOutcome {
    pub applies: bool,
    pub discount: Money,
    /// Row id of the applied promo, persisted on the order.
    pub promo_code_id: Option<i64>,
}

impl PromoOutcome {
    /// No promo applied.
    pub const fn none() -> Self {
        PromoOutcome {
            applies: false,
            discount: Money::zero(),
            promo_code_id: None,
        }
    }
}

/// Evaluates `promo` against a pre-VAT subtotal.
///
/// ## Example
/// ```rust
/// use luna_core::money::{Money, Percentage};
/// use luna_core::promo::evaluate;
/// use luna_core::types::{DiscountRule, PromoCode};
///
/// let luna10 = PromoCode {
///     id: 1,
///     code: "LUNA10".to_string(),
///     rule: DiscountRule::Percentage(Percentage::from_whole(10)),
///     is_active: true,
///     min_order_amount: Money::from_major(200),
/// };
///
/// let outcome = evaluate(Some(&luna10), Money::from_major(650));
/// assert!(outcome.applies);
/// assert_eq!(outcome.discount, Money::from_major(65));
///
/// let below_minimum = evaluate(Some(&luna10), Money::from_major(150));
/// assert!(!below_minimum.applies);
/// ```
pub fn evaluate(promo: Option<&PromoCode>, subtotal: Money) -> PromoOutcome {
    let Some(promo) = promo else {
        return PromoOutcome::none();
    };

    if !promo.is_active || subtotal < promo.min_order_amount {
        return PromoOutcome::none();
    }

    let raw = match promo.rule {
        DiscountRule::Percentage(pct) => pct.of(subtotal),
        DiscountRule::Fixed(amount) => amount,
    };

    PromoOutcome {
        applies: true,
        discount: raw.min(subtotal),
        promo_code_id: Some(promo.id),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
