use sqlx::PgPool;

use crate::models::company::Company;
use crate::types::CompanyId;

pub async fn insert_company(pool: &PgPool, company: &Company) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO companies (id, name, created_at, updated_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(&company.id)
    .bind(&company.name)
    .bind(company.created_at)
    .bind(company.updated_at)
    .execute(pool)
    .await
    .map(|_| ())
}

pub async fn fetch_company(pool: &PgPool, id: CompanyId) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>(
        "SELECT id, name, created_at, updated_at FROM companies WHERE id = $1",
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await
}

pub async fn fetch_company_by_raw_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>(
        "SELECT id, name, created_at, updated_at FROM companies WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}
