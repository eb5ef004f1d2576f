//! # Money Module
//!
//! Provides the `Money` and `Percentage` types for handling monetary values
//! safely.
//!
//! ## Why Exact Decimals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Menu prices are whole or two-place amounts, but VAT and percentage     │
//! │  discounts produce fractions (650 × 15% = 97.5). Those must survive    │
//! │  unchanged into the stored order and the response.                     │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal::Decimal                                    │
//! │    650 × 15 / 100 = 97.5 exactly, no rounding until display            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use luna_core::money::{Money, Percentage};
//!
//! let price = Money::from_major(150);
//! let line = price.multiply_quantity(2);
//! let vat = Percentage::from_whole(15).of(line);
//!
//! assert_eq!(line, Money::from_major(300));
//! assert_eq!(vat, Money::from_major(45));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

/// Decimal places shown when an amount is displayed.
const DISPLAY_DECIMAL_PLACES: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the branch currency.
///
/// ## Design Decisions
/// - **Decimal (signed)**: exact arithmetic; negative values are representable
///   but never produced by pricing (discounts are clamped to the subtotal)
/// - **Single field tuple struct**: zero-cost wrapper, serializes as a bare
///   JSON number
/// - **Currency-less**: the currency symbol lives in branch settings
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  MenuItem.price ──► PricedLine.unit_price ──► line_total                │
/// │                                                 │                       │
/// │                                                 ▼                       │
/// │  subtotal ──► VAT (Percentage::of) ──► discount (promo) ──► total      │
/// │                                                                         │
/// │  OrderItem.unit_price is a snapshot of MenuItem.price at order time     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    /// Creates Money from an exact decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates Money from a whole number of currency units.
    ///
    /// ## Example
    /// ```rust
    /// use luna_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(150).to_string(), "150.00");
    /// ```
    #[inline]
    pub fn from_major(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Returns the exact decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use luna_core::money::Money;
    ///
    /// let unit_price = Money::from_major(350);
    /// assert_eq!(unit_price.multiply_quantity(3), Money::from_major(1050));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Rounds to two decimal places, midpoint away from zero.
    ///
    /// Presentation only. Nothing in the pricing path rounds.
    pub fn round_for_display(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(DISPLAY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

// =============================================================================
// Percentage Type
// =============================================================================

/// A percentage such as a VAT rate or a percentage promo value.
///
/// Stored as the percent figure itself: `15` means 15%, `12.5` means 12.5%.
///
/// ## Example
/// ```rust
/// use luna_core::money::{Money, Percentage};
///
/// let vat = Percentage::from_whole(15);
/// assert_eq!(vat.of(Money::from_major(650)).to_string(), "97.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Percentage(Decimal);

impl Percentage {
    /// Creates a percentage from an exact decimal figure.
    #[inline]
    pub const fn new(percent: Decimal) -> Self {
        Percentage(percent)
    }

    /// Creates a percentage from a whole percent figure.
    #[inline]
    pub fn from_whole(percent: u32) -> Self {
        Percentage(Decimal::from(percent))
    }

    /// Returns the percent figure.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percentage(Decimal::ZERO)
    }

    /// Applies the percentage to an amount: `amount * percent / 100`.
    ///
    /// No rounding is applied.
    pub fn of(&self, amount: Money) -> Money {
        Money(amount.0 * self.0 / Decimal::ONE_HUNDRED)
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Percentage::zero()
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display rounds to two decimal places.
///
/// ## Note
/// This is for logs. Responses carry the exact amount.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.round_for_display().0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl FromStr for Percentage {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Percentage)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a line quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// SQLite Mapping
// =============================================================================
// Amounts and percentages are stored as decimal TEXT so nothing passes
// through a float on the way in or out of the database.

#[cfg(feature = "sqlx")]
macro_rules! impl_decimal_text_column {
    ($ty:ident) => {
        impl sqlx::Type<sqlx::Sqlite> for $ty {
            fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
                <String as sqlx::Type<sqlx::Sqlite>>::type_info()
            }

            // Numbers written by hand into a TEXT column still decode.
            fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
                    || <i64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
                    || <f64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for $ty {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode(self.0.to_string(), buf)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for $ty {
            fn decode(
                value: sqlx::sqlite::SqliteValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let text = <&str as sqlx::Decode<'r, sqlx::Sqlite>>::decode(value)?;
                Ok($ty::from_str(text)?)
            }
        }
    };
}

#[cfg(feature = "sqlx")]
impl_decimal_text_column!(Money);
#[cfg(feature = "sqlx")]
impl_decimal_text_column!(Percentage);

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_major() {
        let money = Money::from_major(150);
        assert_eq!(money.amount(), dec!(150));
        assert!(!money.is_zero());
        assert!(!money.is_negative());
    }

    #[test]
    fn test_display_rounds_to_two_places() {
        assert_eq!(Money::new(dec!(97.5)).to_string(), "97.50");
        assert_eq!(Money::new(dec!(1.005)).to_string(), "1.01");
        assert_eq!(Money::new(dec!(-2.345)).to_string(), "-2.35");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_major(1000);
        let b = Money::new(dec!(0.5));

        assert_eq!(a + b, Money::new(dec!(1000.5)));
        assert_eq!(a - b, Money::new(dec!(999.5)));
        assert_eq!(a * 3, Money::from_major(3000));

        let mut running = Money::zero();
        running += a;
        running -= b;
        assert_eq!(running, Money::new(dec!(999.5)));
    }

    #[test]
    fn test_sum() {
        let total: Money = [150, 150, 350].into_iter().map(Money::from_major).sum();
        assert_eq!(total, Money::from_major(650));
    }

    #[test]
    fn test_percentage_of_is_exact() {
        let vat = Percentage::from_whole(15).of(Money::from_major(650));
        assert_eq!(vat.amount(), dec!(97.5));

        let odd = Percentage::new(dec!(12.5)).of(Money::new(dec!(10.99)));
        assert_eq!(odd.amount(), dec!(1.37375));
    }

    #[test]
    fn test_parse() {
        assert_eq!("150".parse::<Money>().unwrap(), Money::from_major(150));
        assert_eq!(" 97.5 ".parse::<Money>().unwrap(), Money::new(dec!(97.5)));
        assert!("abc".parse::<Money>().is_err());
        assert_eq!("12.5".parse::<Percentage>().unwrap(), Percentage::new(dec!(12.5)));
    }

    #[test]
    fn test_serializes_as_json_number() {
        let json = serde_json::to_value(Money::new(dec!(97.5))).unwrap();
        assert_eq!(json, serde_json::json!(97.5));

        let parsed: Money = serde_json::from_str("682.5").unwrap();
        assert_eq!(parsed, Money::new(dec!(682.5)));
    }

    #[test]
    fn test_percentage_display() {
        assert_eq!(Percentage::new(dec!(15.00)).to_string(), "15%");
        assert_eq!(Percentage::new(dec!(12.5)).to_string(), "12.5%");
    }
}
