//! # Service Request Repository
//!
//! "Call waiter" requests from a table: created pending, later fulfilled
//! by staff.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;
use crate::repository::catalog;
use luna_core::validation::validate_id;
use luna_core::{CoreError, RequestType, ServiceRequest, ServiceRequestStatus};

const SERVICE_REQUEST_COLUMNS: &str =
    "id, table_id, request_type, status, created_at, fulfilled_at";

/// Repository for table service requests.
#[derive(Debug, Clone)]
pub struct ServiceRequestRepository {
    pool: SqlitePool,
}

impl ServiceRequestRepository {
    /// Creates a new ServiceRequestRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ServiceRequestRepository { pool }
    }

    /// Records a pending request for a table of the given branch.
    ///
    /// ## Errors
    /// `TableNotFound` if the table does not exist or belongs to another
    /// branch.
    pub async fn create(
        &self,
        branch_id: i64,
        table_id: i64,
        request_type: RequestType,
    ) -> DbResult<ServiceRequest> {
        validate_id("branch_id", branch_id)?;
        validate_id("table_id", table_id)?;

        let mut conn = self.pool.acquire().await?;

        catalog::find_table(&mut conn, table_id, branch_id)
            .await?
            .ok_or(CoreError::TableNotFound {
                table_id,
                branch_id,
            })?;

        let request = sqlx::query_as::<_, ServiceRequest>(&format!(
            r#"
            INSERT INTO service_requests (table_id, request_type, status, created_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING {SERVICE_REQUEST_COLUMNS}
            "#
        ))
        .bind(table_id)
        .bind(request_type)
        .bind(ServiceRequestStatus::Pending)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        info!(
            request_id = request.id,
            branch_id,
            table_id,
            request_type = request_type.as_str(),
            "Service request created"
        );

        Ok(request)
    }

    /// Finds a request by id.
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<ServiceRequest>> {
        let request = sqlx::query_as::<_, ServiceRequest>(&format!(
            "SELECT {SERVICE_REQUEST_COLUMNS} FROM service_requests WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Pending requests of a branch, oldest first.
    pub async fn list_pending(&self, branch_id: i64) -> DbResult<Vec<ServiceRequest>> {
        let requests = sqlx::query_as::<_, ServiceRequest>(
            r#"
            SELECT sr.id, sr.table_id, sr.request_type, sr.status,
                   sr.created_at, sr.fulfilled_at
            FROM service_requests sr
            JOIN restaurant_tables t ON t.id = sr.table_id
            WHERE t.branch_id = ?1 AND sr.status = ?2
            ORDER BY sr.created_at, sr.id
            "#,
        )
        .bind(branch_id)
        .bind(ServiceRequestStatus::Pending)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Marks a pending request fulfilled.
    ///
    /// ## Errors
    /// `ServiceRequestNotFound` if there is no pending request with this id.
    pub async fn fulfill(&self, id: i64) -> DbResult<ServiceRequest> {
        let request = sqlx::query_as::<_, ServiceRequest>(&format!(
            r#"
            UPDATE service_requests
            SET status = ?2, fulfilled_at = ?3
            WHERE id = ?1 AND status = ?4
            RETURNING {SERVICE_REQUEST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(ServiceRequestStatus::Fulfilled)
        .bind(Utc::now())
        .bind(ServiceRequestStatus::Pending)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CoreError::ServiceRequestNotFound(id))?;

        info!(request_id = id, "Service request fulfilled");
        Ok(request)
    }
}
