//! # HTTP Handlers
//!
//! One module per resource. Handlers parse the request into typed values,
//! call into `luna-db`, and shape the JSON response; they hold no logic of
//! their own beyond that.
//!
//! ```text
//! GET  /api/branches          catalog::list_branches
//! GET  /api/settings          catalog::settings
//! GET  /api/menu              catalog::menu
//! GET  /api/tables            catalog::tables
//! GET  /api/order_status      orders::order_status
//! POST /api/orders            orders::create_order
//! POST /api/promocode         promo::lookup
//! POST /api/feedback          feedback::create
//! POST /api/service_request   service_request::create
//! ```

pub mod catalog;
pub mod feedback;
pub mod orders;
pub mod promo;
pub mod service_request;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Renders a timestamp the way the menu displays it.
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// A required query parameter; blank counts as missing.
pub(crate) fn required_param<'a>(value: Option<&'a str>, name: &str) -> ApiResult<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::missing_param(name))
}

/// A required integer id in the query string.
pub(crate) fn required_id(value: Option<&str>, name: &str) -> ApiResult<i64> {
    required_param(value, name)?
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid {name}: must be an integer")))
}

/// `?branch_id=`
#[derive(Debug, Default, Deserialize)]
pub struct BranchQuery {
    pub branch_id: Option<String>,
}

impl BranchQuery {
    pub fn branch_id(&self) -> ApiResult<i64> {
        required_id(self.branch_id.as_deref(), "branch_id")
    }
}

/// `{"success": true}`
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        SuccessResponse { success: true }
    }
}
