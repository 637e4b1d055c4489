use sqlx::PgPool;

use crate::models::shift::Shift;
use crate::types::ShiftId;

const SHIFT_COLUMNS: &str = "id, job_id, date, start_time, end_time, status, \
    required_crew_chiefs, required_stagehands, required_fork_operators, \
    required_reach_fork_operators, required_riggers, required_general_laborers, \
    created_at, updated_at";

pub async fn insert_shift(pool: &PgPool, shift: &Shift) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO shifts (id, job_id, date, start_time, end_time, status, \
         required_crew_chiefs, required_stagehands, required_fork_operators, \
         required_reach_fork_operators, required_riggers, required_general_laborers, \
         created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
    )
    .bind(&shift.id)
    .bind(&shift.job_id)
    .bind(shift.date)
    .bind(shift.start_time)
    .bind(shift.end_time)
    .bind(shift.status)
    .bind(shift.required_crew_chiefs)
    .bind(shift.required_stagehands)
    .bind(shift.required_fork_operators)
    .bind(shift.required_reach_fork_operators)
    .bind(shift.required_riggers)
    .bind(shift.required_general_laborers)
    .bind(shift.created_at)
    .bind(shift.updated_at)
    .execute(pool)
    .await
    .map(|_| ())
}

pub async fn fetch_shift(pool: &PgPool, id: ShiftId) -> Result<Option<Shift>, sqlx::Error> {
    sqlx::query_as::<_, Shift>(&format!(
        "SELECT {} FROM shifts WHERE id = $1",
        SHIFT_COLUMNS
    ))
    .bind(id.to_string())
    .fetch_optional(pool)
    .await
}

pub async fn fetch_shift_by_raw_id(pool: &PgPool, id: &str) -> Result<Option<Shift>, sqlx::Error> {
    sqlx::query_as::<_, Shift>(&format!(
        "SELECT {} FROM shifts WHERE id = $1",
        SHIFT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_shifts(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<Shift>, sqlx::Error> {
    sqlx::query_as::<_, Shift>(&format!(
        "SELECT {} FROM shifts ORDER BY date DESC, start_time DESC LIMIT $1 OFFSET $2",
        SHIFT_COLUMNS
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_shifts(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM shifts")
        .fetch_one(pool)
        .await
}
