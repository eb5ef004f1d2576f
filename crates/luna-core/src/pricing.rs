//! # Order Pricing
//!
//! Turns a resolved cart into the four amounts stored on an order.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartLine[] + prices ──► resolve_lines ──► PricedLine[]                │
//! │                                               │                         │
//! │                     ┌─────────────────────────┴──────────┐              │
//! │                     ▼                                    ▼              │
//! │               price_order                          order_items rows     │
//! │   subtotal = Σ unit_price × quantity                                    │
//! │   vat      = subtotal × vat% / 100                                      │
//! │   discount = promo on subtotal (pre-VAT), ≤ subtotal                    │
//! │   total    = subtotal + vat - discount                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices are resolved once. The same `PricedLine`s feed the totals and the
//! stored line items, so both always agree.
//!
//! Customization surcharges are shown on the menu but are not part of the
//! line total.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Percentage};
use crate::promo::{self, PromoOutcome};
use crate::types::{CartLine, PromoCode};

// =============================================================================
// Priced Lines
// =============================================================================

/// A cart line paired with the branch price it was resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub line: CartLine,
    pub unit_price: Money,
}

impl PricedLine {
    /// unit_price × quantity
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.line.quantity)
    }
}

/// Pairs every cart line with its price.
///
/// Fails with [`CoreError::MenuItemNotFound`] on the first line whose item
/// has no price.
pub fn resolve_lines(
    lines: Vec<CartLine>,
    prices: &HashMap<i64, Money>,
) -> CoreResult<Vec<PricedLine>> {
    lines
        .into_iter()
        .map(|line| {
            let unit_price = *prices
                .get(&line.branch_menu_item_id)
                .ok_or(CoreError::MenuItemNotFound(line.branch_menu_item_id))?;
            Ok(PricedLine { line, unit_price })
        })
        .collect()
}

// =============================================================================
// Order Totals
// =============================================================================

/// Computed amounts of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderPricing {
    pub subtotal: Money,
    pub vat_percentage: Percentage,
    pub vat_amount: Money,
    pub discount_amount: Money,
    pub total_amount: Money,
    pub promo: PromoOutcome,
}

/// Prices an order. Pure; no rounding.
///
/// ## Example
/// ```rust
/// use luna_core::money::{Money, Percentage};
/// use luna_core::pricing::{price_order, PricedLine};
/// use luna_core::types::CartLine;
///
/// let line = |id, quantity, price| PricedLine {
///     line: CartLine { branch_menu_item_id: id, quantity, customizations: vec![] },
///     unit_price: Money::from_major(price),
/// };
///
/// let pricing = price_order(&[line(1, 2, 150), line(2, 1, 350)], Percentage::from_whole(15), None);
///
/// assert_eq!(pricing.subtotal, Money::from_major(650));
/// assert_eq!(pricing.vat_amount.to_string(), "97.50");
/// assert_eq!(pricing.total_amount.to_string(), "747.50");
/// ```
pub fn price_order(
    lines: &[PricedLine],
    vat_percentage: Percentage,
    promo: Option<&PromoCode>,
) -> OrderPricing {
    let subtotal: Money = lines.iter().map(PricedLine::line_total).sum();
    let vat_amount = vat_percentage.of(subtotal);
    let promo = promo::evaluate(promo, subtotal);
    let discount_amount = promo.discount;

    OrderPricing {
        subtotal,
        vat_percentage,
        vat_amount,
        discount_amount,
        total_amount: subtotal + vat_amount - discount_amount,
        promo,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
