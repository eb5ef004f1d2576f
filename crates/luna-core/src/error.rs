//! # Error Types
//!
//! Domain-specific error types for luna-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  luna-core errors (this file)                                          │
//! │  ├── CoreError        - Domain errors (not found, bad transition)      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  luna-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  api-server errors                                                     │
//! │  └── ApiError         - What the client sees: status + {"error": ..}   │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Branch does not exist.
    #[error("Branch not found: {0}")]
    BranchNotFound(i64),

    /// A cart line references a branch menu item that does not exist.
    ///
    /// ## When This Occurs
    /// - Stale menu in the client (item deleted since the menu was loaded)
    /// - Hand-crafted request with a made-up id
    #[error("Menu item not found: {0}")]
    MenuItemNotFound(i64),

    /// Table does not exist or belongs to another branch.
    #[error("Invalid table for this branch")]
    TableNotFound { table_id: i64, branch_id: i64 },

    /// No order with this external id.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// No active promo code with this code.
    #[error("Invalid or expired promo code")]
    PromoCodeNotFound(String),

    /// No pending service request with this id.
    #[error("Service request not found: {0}")]
    ServiceRequestNotFound(i64),

    /// Status change outside the order state machine.
    ///
    /// ## When This Occurs
    /// - Moving a `completed` or `cancelled` order anywhere
    /// - Cancelling an order that is already `ready`
    /// - Skipping a step (`placed` → `ready`)
    #[error("Order {order_uid} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        order_uid: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Branch settings blob is present but unusable.
    #[error("Invalid settings for branch {branch_id}: {reason}")]
    InvalidBranchSettings { branch_id: i64, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Whether this error means "the referenced thing does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::BranchNotFound(_)
                | CoreError::MenuItemNotFound(_)
                | CoreError::TableNotFound { .. }
                | CoreError::OrderNotFound(_)
                | CoreError::PromoCodeNotFound(_)
                | CoreError::ServiceRequestNotFound(_)
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any storage access; a request that fails validation never
/// touches the database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("Missing required field: {field}")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-numeric id).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("Invalid {field}: must be one of {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Creates a Required error.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidStatusTransition {
            order_uid: "ORD1".to_string(),
            from: OrderStatus::Completed,
            to: OrderStatus::Placed,
        };
        assert_eq!(err.to_string(), "Order ORD1 cannot move from completed to placed");

        let err = CoreError::TableNotFound {
            table_id: 9,
            branch_id: 1,
        };
        assert_eq!(err.to_string(), "Invalid table for this branch");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::required("branch_id").to_string(),
            "Missing required field: branch_id"
        );

        let err = ValidationError::OutOfRange {
            field: "overall rating".to_string(),
            min: 1,
            max: 5,
        };
        assert_eq!(err.to_string(), "overall rating must be between 1 and 5");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("items").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert!(!core_err.is_not_found());
    }

    #[test]
    fn test_not_found_classification() {
        assert!(CoreError::MenuItemNotFound(99).is_not_found());
        assert!(CoreError::OrderNotFound("ORDX".to_string()).is_not_found());
        assert!(!CoreError::InvalidBranchSettings {
            branch_id: 1,
            reason: "bad".to_string()
        }
        .is_not_found());
    }
}
