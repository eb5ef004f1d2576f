//! # luna-core: Pure Business Logic for Luna Dine
//!
//! This crate is the **heart** of the ordering backend. It contains the
//! order pricing rules, promo evaluation and order status rules as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Luna Dine Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Digital Menu (browser, QR code)                 │   │
//! │  │    Menu UI ──► Cart UI ──► Place Order ──► Order Status        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    api-server (axum)                            │   │
//! │  │    /api/menu, /api/orders, /api/promocode, ...                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ luna-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │  Order    │  │   Money   │  │  promo    │  │   rules   │  │   │
//! │  │   │  Menu     │  │Percentage │  │  status   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    luna-db (Database Layer)                     │   │
//! │  │         SQLite queries, migrations, order transaction           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Branch, Menu, Order, PromoCode, etc.)
//! - [`money`] - `Money` and `Percentage` with exact decimal arithmetic
//! - [`promo`] - Promo code evaluation
//! - [`pricing`] - Order pricing engine (subtotal, VAT, discount, total)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use luna_core::money::{Money, Percentage};
//!
//! let subtotal = Money::from_major(650);
//! let vat = Percentage::from_whole(15).of(subtotal);
//!
//! assert_eq!(vat.to_string(), "97.50");
//! ```

pub mod error;
pub mod money;
pub mod pricing;
pub mod promo;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Percentage};
pub use pricing::{price_order, resolve_lines, OrderPricing, PricedLine};
pub use promo::{evaluate as evaluate_promo, PromoOutcome};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// VAT applied when a branch's settings carry no `vat_percentage`.
pub const DEFAULT_VAT_PERCENTAGE: u32 = 15;

/// Fixed preparation estimate added to the placement time of every order.
pub const ORDER_PREPARATION_MINUTES: i64 = 30;

/// Maximum lines allowed in a single order.
///
/// ## Business Reason
/// Keeps a single order (and its transaction) to a reasonable size.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest value of any rating (overall, food, service).
pub const MAX_RATING: i64 = 5;
