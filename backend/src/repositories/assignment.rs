use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::assignment::{AssignmentStatus, ShiftAssignment};
use crate::types::{AssignmentId, ShiftId};

const ASSIGNMENT_COLUMNS: &str =
    "id, shift_id, worker_id, role_code, status, created_at, updated_at";

pub async fn insert_assignment(
    pool: &PgPool,
    assignment: &ShiftAssignment,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO shift_assignments (id, shift_id, worker_id, role_code, status, \
         created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(&assignment.id)
    .bind(&assignment.shift_id)
    .bind(&assignment.worker_id)
    .bind(assignment.role_code)
    .bind(assignment.status)
    .bind(assignment.created_at)
    .bind(assignment.updated_at)
    .execute(pool)
    .await
    .map(|_| ())
}

pub async fn fetch_assignment(
    pool: &PgPool,
    id: AssignmentId,
) -> Result<Option<ShiftAssignment>, sqlx::Error> {
    sqlx::query_as::<_, ShiftAssignment>(&format!(
        "SELECT {} FROM shift_assignments WHERE id = $1",
        ASSIGNMENT_COLUMNS
    ))
    .bind(id.to_string())
    .fetch_optional(pool)
    .await
}

pub async fn list_assignments_for_shift(
    pool: &PgPool,
    shift_id: ShiftId,
) -> Result<Vec<ShiftAssignment>, sqlx::Error> {
    sqlx::query_as::<_, ShiftAssignment>(&format!(
        "SELECT {} FROM shift_assignments WHERE shift_id = $1 ORDER BY created_at",
        ASSIGNMENT_COLUMNS
    ))
    .bind(shift_id.to_string())
    .fetch_all(pool)
    .await
}

pub async fn list_assignments_for_shift_raw(
    pool: &PgPool,
    shift_id: &str,
) -> Result<Vec<ShiftAssignment>, sqlx::Error> {
    sqlx::query_as::<_, ShiftAssignment>(&format!(
        "SELECT {} FROM shift_assignments WHERE shift_id = $1 ORDER BY created_at",
        ASSIGNMENT_COLUMNS
    ))
    .bind(shift_id)
    .fetch_all(pool)
    .await
}

pub async fn update_assignment_status(
    pool: &PgPool,
    id: AssignmentId,
    status: AssignmentStatus,
    timestamp: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    sqlx::query("UPDATE shift_assignments SET status = $1, updated_at = $2 WHERE id = $3")
        .bind(status)
        .bind(timestamp)
        .bind(id.to_string())
        .execute(pool)
        .await
        .map(|result| result.rows_affected())
}
