use sqlx::PgPool;

use crate::models::job::Job;
use crate::types::JobId;

pub async fn insert_job(pool: &PgPool, job: &Job) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO jobs (id, company_id, name, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(&job.id)
    .bind(&job.company_id)
    .bind(&job.name)
    .bind(job.created_at)
    .bind(job.updated_at)
    .execute(pool)
    .await
    .map(|_| ())
}

pub async fn fetch_job(pool: &PgPool, id: JobId) -> Result<Option<Job>, sqlx::Error> {
    sqlx::query_as::<_, Job>(
        "SELECT id, company_id, name, created_at, updated_at FROM jobs WHERE id = $1",
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await
}

pub async fn fetch_job_by_raw_id(pool: &PgPool, id: &str) -> Result<Option<Job>, sqlx::Error> {
    sqlx::query_as::<_, Job>(
        "SELECT id, company_id, name, created_at, updated_at FROM jobs WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}
