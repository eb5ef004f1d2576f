//! Guest feedback after a meal.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use super::SuccessResponse;
use crate::error::ApiResult;
use crate::AppState;
use luna_core::{NewFeedback, Ratings, ValidationError};

/// Body of `POST /api/feedback`. `order_id` is the order uid.
#[derive(Debug, Default, Deserialize)]
pub struct FeedbackRequest {
    pub order_id: Option<String>,
    pub ratings: Option<RatingsRequest>,
    pub item_feedback: Option<Value>,
    pub comment: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RatingsRequest {
    pub overall: Option<i64>,
    pub food: Option<i64>,
    pub service: Option<i64>,
}

impl FeedbackRequest {
    /// Splits the body into the order uid and the feedback to store.
    pub fn validate(self) -> Result<(String, NewFeedback), ValidationError> {
        let order_uid = self.order_id.ok_or_else(|| ValidationError::required("order_id"))?;
        let ratings = self.ratings.ok_or_else(|| ValidationError::required("ratings"))?;
        let overall = ratings
            .overall
            .ok_or_else(|| ValidationError::required("ratings.overall"))?;

        Ok((
            order_uid,
            NewFeedback {
                ratings: Ratings {
                    overall,
                    food: ratings.food,
                    service: ratings.service,
                },
                item_feedback: self.item_feedback.unwrap_or(Value::Null),
                comment: self.comment,
            },
        ))
    }
}

/// `POST /api/feedback`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Json(request) = payload?;
    let (order_uid, feedback) = request.validate()?;

    state.db.feedback().create(&order_uid, feedback).await?;

    Ok(Json(SuccessResponse::ok()))
}
