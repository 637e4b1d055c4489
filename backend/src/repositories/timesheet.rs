//! Timesheet persistence.
//!
//! All lifecycle transitions are single status-guarded UPDATEs: the WHERE
//! clause pins the status the caller observed, so of two concurrent
//! transitions exactly one wins and the loser sees zero rows affected.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgTransaction;
use sqlx::PgPool;

use crate::models::timesheet::{Timesheet, TimesheetStatus};
use crate::types::TimesheetId;

const TIMESHEET_COLUMNS: &str = "id, shift_id, status, company_signature, company_approved_at, \
    manager_signature, manager_approved_at, rejection_reason, rejected_by, rejected_at, \
    unsigned_pdf_url, signed_pdf_url, created_at, updated_at";

pub async fn insert_timesheet(pool: &PgPool, timesheet: &Timesheet) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO timesheets (id, shift_id, status, company_signature, company_approved_at, \
         manager_signature, manager_approved_at, rejection_reason, rejected_by, rejected_at, \
         unsigned_pdf_url, signed_pdf_url, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
    )
    .bind(&timesheet.id)
    .bind(&timesheet.shift_id)
    .bind(timesheet.status)
    .bind(&timesheet.company_signature)
    .bind(timesheet.company_approved_at)
    .bind(&timesheet.manager_signature)
    .bind(timesheet.manager_approved_at)
    .bind(&timesheet.rejection_reason)
    .bind(&timesheet.rejected_by)
    .bind(timesheet.rejected_at)
    .bind(&timesheet.unsigned_pdf_url)
    .bind(&timesheet.signed_pdf_url)
    .bind(timesheet.created_at)
    .bind(timesheet.updated_at)
    .execute(pool)
    .await
    .map(|_| ())
}

pub async fn fetch_timesheet(
    pool: &PgPool,
    id: TimesheetId,
) -> Result<Option<Timesheet>, sqlx::Error> {
    sqlx::query_as::<_, Timesheet>(&format!(
        "SELECT {} FROM timesheets WHERE id = $1",
        TIMESHEET_COLUMNS
    ))
    .bind(id.to_string())
    .fetch_optional(pool)
    .await
}

pub async fn fetch_timesheet_for_shift(
    pool: &PgPool,
    shift_id: &str,
) -> Result<Option<Timesheet>, sqlx::Error> {
    sqlx::query_as::<_, Timesheet>(&format!(
        "SELECT {} FROM timesheets WHERE shift_id = $1",
        TIMESHEET_COLUMNS
    ))
    .bind(shift_id)
    .fetch_optional(pool)
    .await
}

/// draft → pending_company_approval, storing the unsigned snapshot.
pub async fn mark_submitted(
    tx: &mut PgTransaction<'_>,
    id: TimesheetId,
    unsigned_pdf_url: &str,
    timestamp: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    sqlx::query(
        "UPDATE timesheets SET status = 'pending_company_approval', unsigned_pdf_url = $1, \
         updated_at = $2 WHERE id = $3 AND status = 'draft'",
    )
    .bind(unsigned_pdf_url)
    .bind(timestamp)
    .bind(id.to_string())
    .execute(&mut **tx)
    .await
    .map(|result| result.rows_affected())
}

/// pending_company_approval → pending_manager_approval. The signature, its
/// timestamp, the status, and the signed artifact land in one statement.
pub async fn apply_company_approval(
    tx: &mut PgTransaction<'_>,
    id: TimesheetId,
    signature: &str,
    signed_pdf_url: &str,
    timestamp: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    sqlx::query(
        "UPDATE timesheets SET status = 'pending_manager_approval', company_signature = $1, \
         company_approved_at = $2, signed_pdf_url = $3, updated_at = $4 \
         WHERE id = $5 AND status = 'pending_company_approval'",
    )
    .bind(signature)
    .bind(timestamp)
    .bind(signed_pdf_url)
    .bind(timestamp)
    .bind(id.to_string())
    .execute(&mut **tx)
    .await
    .map(|result| result.rows_affected())
}

/// pending_manager_approval → completed; the final artifact replaces the
/// company-signed one.
pub async fn apply_manager_approval(
    tx: &mut PgTransaction<'_>,
    id: TimesheetId,
    signature: &str,
    final_pdf_url: &str,
    timestamp: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    sqlx::query(
        "UPDATE timesheets SET status = 'completed', manager_signature = $1, \
         manager_approved_at = $2, signed_pdf_url = $3, updated_at = $4 \
         WHERE id = $5 AND status = 'pending_manager_approval'",
    )
    .bind(signature)
    .bind(timestamp)
    .bind(final_pdf_url)
    .bind(timestamp)
    .bind(id.to_string())
    .execute(&mut **tx)
    .await
    .map(|result| result.rows_affected())
}

/// Either pending state → rejected. Guards on the exact status the caller
/// observed so a concurrent approval cannot be silently overwritten.
pub async fn apply_rejection(
    tx: &mut PgTransaction<'_>,
    id: TimesheetId,
    observed_status: TimesheetStatus,
    reason: &str,
    rejected_by: &str,
    timestamp: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    sqlx::query(
        "UPDATE timesheets SET status = 'rejected', rejection_reason = $1, rejected_by = $2, \
         rejected_at = $3, updated_at = $4 WHERE id = $5 AND status = $6",
    )
    .bind(reason)
    .bind(rejected_by)
    .bind(timestamp)
    .bind(timestamp)
    .bind(id.to_string())
    .bind(observed_status.db_value())
    .execute(&mut **tx)
    .await
    .map(|result| result.rows_affected())
}
