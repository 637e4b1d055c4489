use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::models::shift::RoleCode;
use crate::models::time_entry::TimeEntry;
use crate::types::AssignmentId;

const TIME_ENTRY_COLUMNS: &str =
    "id, assignment_id, entry_number, clock_in, clock_out, created_at, updated_at";

pub async fn insert_time_entry(pool: &PgPool, entry: &TimeEntry) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO time_entries (id, assignment_id, entry_number, clock_in, clock_out, \
         created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(&entry.id)
    .bind(&entry.assignment_id)
    .bind(entry.entry_number)
    .bind(entry.clock_in)
    .bind(entry.clock_out)
    .bind(entry.created_at)
    .bind(entry.updated_at)
    .execute(pool)
    .await
    .map(|_| ())
}

pub async fn list_entries_for_assignment(
    pool: &PgPool,
    assignment_id: AssignmentId,
) -> Result<Vec<TimeEntry>, sqlx::Error> {
    sqlx::query_as::<_, TimeEntry>(&format!(
        "SELECT {} FROM time_entries WHERE assignment_id = $1 ORDER BY entry_number",
        TIME_ENTRY_COLUMNS
    ))
    .bind(assignment_id.to_string())
    .fetch_all(pool)
    .await
}

/// Closes the open entry (if any) for an assignment. Returns the number of
/// rows touched; zero means there was nothing open.
pub async fn close_open_entry(
    pool: &PgPool,
    assignment_id: AssignmentId,
    clock_out: NaiveDateTime,
    timestamp: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    sqlx::query(
        "UPDATE time_entries SET clock_out = $1, updated_at = $2 \
         WHERE assignment_id = $3 AND clock_out IS NULL",
    )
    .bind(clock_out)
    .bind(timestamp)
    .bind(assignment_id.to_string())
    .execute(pool)
    .await
    .map(|result| result.rows_affected())
}

/// One worker's aggregated hours on a shift, for the rendered timesheet.
#[derive(Debug, Clone, FromRow)]
pub struct WorkedHoursRow {
    pub assignment_id: String,
    pub full_name: String,
    pub role_code: RoleCode,
    pub worked_seconds: f64,
}

/// Summed worked time per valid assignment on a shift. The status exclusion
/// set mirrors [`AssignmentStatus::counts_toward_fill`]; open entries
/// contribute nothing until they are clocked out.
///
/// [`AssignmentStatus::counts_toward_fill`]: crate::models::assignment::AssignmentStatus::counts_toward_fill
pub async fn worked_hours_for_shift(
    pool: &PgPool,
    shift_id: &str,
) -> Result<Vec<WorkedHoursRow>, sqlx::Error> {
    sqlx::query_as::<_, WorkedHoursRow>(
        "SELECT sa.id AS assignment_id, u.full_name, sa.role_code, \
         CAST(COALESCE(SUM(CASE WHEN te.clock_out IS NOT NULL \
              THEN EXTRACT(EPOCH FROM (te.clock_out - te.clock_in)) ELSE 0 END), 0) \
              AS DOUBLE PRECISION) AS worked_seconds \
         FROM shift_assignments sa \
         JOIN users u ON u.id = sa.worker_id \
         LEFT JOIN time_entries te ON te.assignment_id = sa.id \
         WHERE sa.shift_id = $1 \
           AND sa.worker_id IS NOT NULL \
           AND sa.status NOT IN ('cancelled', 'withdrawn', 'rejected') \
         GROUP BY sa.id, u.full_name, sa.role_code \
         ORDER BY u.full_name",
    )
    .bind(shift_id)
    .fetch_all(pool)
    .await
}
