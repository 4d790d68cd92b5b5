use crate::error::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    sqlx::Type,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum LeaveType {
    Annual,
    Sick,
    Personal,
    Unpaid,
}

impl LeaveType {
    pub fn label(&self) -> &'static str {
        match self {
            LeaveType::Annual => "Annual",
            LeaveType::Sick => "Sick",
            LeaveType::Personal => "Personal",
            LeaveType::Unpaid => "Unpaid",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    sqlx::Type,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Jane Doe")]
    pub employee_name: String,
    #[schema(example = "jane.doe@company.com")]
    pub email: String,
    pub leave_type: LeaveType,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family trip booked months ago")]
    pub reason: String,
    pub status: LeaveStatus,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

/// Validated field set, used for both insert and in-place update.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLeaveRequest {
    pub employee_name: String,
    pub email: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, employee_name, email, leave_type, start_date, end_date, reason, status, created_at
    FROM leave_requests
"#;

impl LeaveRequest {
    /// Inclusive length of the leave in calendar days.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub async fn create(pool: &SqlitePool, new: &NewLeaveRequest) -> Result<i64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests
                (employee_name, email, leave_type, start_date, end_date, reason, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.employee_name)
        .bind(&new.email)
        .bind(new.leave_type)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(&new.reason)
        .bind(new.status)
        .bind(Utc::now())
        .execute(pool)
        .await
        .map_err(|e| {
            error!(error = %e, employee_name = %new.employee_name, "Failed to create leave request");
            AppError::Database(e)
        })?;

        let leave_id = result.last_insert_rowid();
        debug!(leave_id, "Leave request created");
        Ok(leave_id)
    }

    pub async fn get(pool: &SqlitePool, leave_id: i64) -> Result<LeaveRequest, AppError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?");

        sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(leave_id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                error!(error = %e, leave_id, "Failed to fetch leave request");
                AppError::Database(e)
            })?
            .ok_or(AppError::NotFound)
    }

    /// Newest first.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<LeaveRequest>, AppError> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC");

        sqlx::query_as::<_, LeaveRequest>(&sql)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch leave list");
                AppError::Database(e)
            })
    }

    pub async fn update(
        pool: &SqlitePool,
        leave_id: i64,
        fields: &NewLeaveRequest,
    ) -> Result<LeaveRequest, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE leave_requests
            SET employee_name = ?,
                email = ?,
                leave_type = ?,
                start_date = ?,
                end_date = ?,
                reason = ?,
                status = ?
            WHERE id = ?
            "#,
        )
        .bind(&fields.employee_name)
        .bind(&fields.email)
        .bind(fields.leave_type)
        .bind(fields.start_date)
        .bind(fields.end_date)
        .bind(&fields.reason)
        .bind(fields.status)
        .bind(leave_id)
        .execute(pool)
        .await
        .map_err(|e| {
            error!(error = %e, leave_id, "Update leave failed");
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Self::get(pool, leave_id).await
    }

    pub async fn delete(pool: &SqlitePool, leave_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM leave_requests WHERE id = ?")
            .bind(leave_id)
            .execute(pool)
            .await
            .map_err(|e| {
                error!(error = %e, leave_id, "Failed to delete leave request");
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        debug!(leave_id, "Leave request deleted");
        Ok(())
    }
}
