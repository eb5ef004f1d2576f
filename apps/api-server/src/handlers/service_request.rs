//! "Call waiter" requests from a table.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::SuccessResponse;
use crate::error::ApiResult;
use crate::AppState;
use luna_core::{RequestType, ValidationError};

/// Body of `POST /api/service_request`.
#[derive(Debug, Default, Deserialize)]
pub struct ServiceRequestBody {
    pub branch_id: Option<i64>,
    pub table_id: Option<i64>,
    pub request_type: Option<String>,
}

impl ServiceRequestBody {
    pub fn validate(self) -> Result<(i64, i64, RequestType), ValidationError> {
        let branch_id = self.branch_id.ok_or_else(|| ValidationError::required("branch_id"))?;
        let table_id = self.table_id.ok_or_else(|| ValidationError::required("table_id"))?;
        let request_type = self
            .request_type
            .ok_or_else(|| ValidationError::required("request_type"))?
            .parse()?;

        Ok((branch_id, table_id, request_type))
    }
}

/// `POST /api/service_request`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<ServiceRequestBody>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Json(body) = payload?;
    let (branch_id, table_id, request_type) = body.validate()?;

    state
        .db
        .service_requests()
        .create(branch_id, table_id, request_type)
        .await?;

    Ok(Json(SuccessResponse::ok()))
}
