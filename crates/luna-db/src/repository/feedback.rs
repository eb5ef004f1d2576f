//! # Feedback Repository
//!
//! Guest ratings attached to an order, addressed by the order uid printed
//! on the guest's screen.

use chrono::Utc;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;
use luna_core::validation::{validate_free_text, validate_order_uid, validate_ratings};
use luna_core::{CoreError, Feedback, NewFeedback};

/// Longest accepted feedback comment.
const MAX_COMMENT_LEN: usize = 1000;

/// Repository for guest feedback.
#[derive(Debug, Clone)]
pub struct FeedbackRepository {
    pool: SqlitePool,
}

impl FeedbackRepository {
    /// Creates a new FeedbackRepository.
    pub fn new(pool: SqlitePool) -> Self {
        FeedbackRepository { pool }
    }

    /// Stores feedback for the order with `order_uid` and returns its id.
    ///
    /// Ratings are checked before the order is looked up, so a bad rating
    /// is reported even for an unknown order.
    pub async fn create(&self, order_uid: &str, feedback: NewFeedback) -> DbResult<i64> {
        validate_ratings(&feedback.ratings)?;
        validate_order_uid(order_uid)?;
        validate_free_text("comment", feedback.comment.as_deref(), MAX_COMMENT_LEN)?;

        let mut conn = self.pool.acquire().await?;

        let order_id: i64 = sqlx::query_scalar("SELECT id FROM orders WHERE order_uid = ?1")
            .bind(order_uid)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| CoreError::OrderNotFound(order_uid.to_string()))?;

        let item_feedback = match feedback.item_feedback {
            Value::Null => Value::Array(vec![]),
            other => other,
        };

        let id = sqlx::query(
            r#"
            INSERT INTO feedback (
                order_id, overall_rating, food_rating, service_rating,
                item_feedback, comment, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(order_id)
        .bind(feedback.ratings.overall)
        .bind(feedback.ratings.food)
        .bind(feedback.ratings.service)
        .bind(Json(&item_feedback))
        .bind(feedback.comment.as_deref())
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();

        info!(
            feedback_id = id,
            order_uid,
            overall = feedback.ratings.overall,
            "Feedback received"
        );

        Ok(id)
    }

    /// All feedback left for an order, oldest first.
    pub async fn list_for_order(&self, order_id: i64) -> DbResult<Vec<Feedback>> {
        let rows = sqlx::query_as::<_, Feedback>(
            r#"
            SELECT id, order_id, overall_rating, food_rating, service_rating,
                   item_feedback, comment, created_at
            FROM feedback
            WHERE order_id = ?1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_sample_data;
    use crate::{Database, DbConfig, DbError};
    use luna_core::Ratings;
    use serde_json::json;

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_sample_data(db.pool()).await.unwrap();
        db
    }

    fn feedback(overall: i64) -> NewFeedback {
        NewFeedback {
            ratings: Ratings {
                overall,
                food: None,
                service: None,
            },
            item_feedback: Value::Null,
            comment: None,
        }
    }

    #[tokio::test]
    async fn test_create_minimal_feedback() {
        let db = seeded().await;

        let id = db.feedback().create("ORD987654321", feedback(3)).await.unwrap();
        assert!(id > 0);

        let stored = db.feedback().list_for_order(2).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].overall_rating, 3);
        assert_eq!(stored[0].food_rating, None);
        assert_eq!(stored[0].item_feedback, json!([]));
    }

    #[tokio::test]
    async fn test_create_full_feedback() {
        let db = seeded().await;
        let new = NewFeedback {
            ratings: Ratings {
                overall: 4,
                food: Some(5),
                service: Some(3),
            },
            item_feedback: json!([{"item_id": 1, "rating": "thumb_down"}]),
            comment: Some("Soup was cold".to_string()),
        };

        db.feedback().create("ORD123456789", new).await.unwrap();

        let stored = db.feedback().list_for_order(1).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].service_rating, Some(3));
        assert_eq!(stored[1].item_feedback[0]["rating"], "thumb_down");
        assert_eq!(stored[1].comment.as_deref(), Some("Soup was cold"));
    }

    #[tokio::test]
    async fn test_out_of_range_ratings() {
        let db = seeded().await;

        for overall in [0, 6] {
            let err = db
                .feedback()
                .create("ORD123456789", feedback(overall))
                .await
                .unwrap_err();
            assert!(err.is_validation());
        }

        let mut bad_food = feedback(4);
        bad_food.ratings.food = Some(9);
        let err = db.feedback().create("ORD123456789", bad_food).await.unwrap_err();
        assert!(err.is_validation());

        assert_eq!(db.feedback().list_for_order(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let db = seeded().await;

        let err = db.feedback().create("ORDMISSING", feedback(5)).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::OrderNotFound(_))));
        assert!(err.is_not_found());
    }
}
