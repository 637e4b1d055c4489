use axum::{
    extract::{Extension, Path, State},
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::company::{Company, CompanyResponse, CreateCompany},
    models::user::User,
    repositories,
    state::AppState,
    types::CompanyId,
    utils::time,
};

pub async fn create_company(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateCompany>,
) -> Result<Json<CompanyResponse>, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    payload.validate()?;
    let company = Company::new(payload.name, time::now_utc(&state.config.time_zone));
    repositories::company::insert_company(&state.pool, &company).await?;
    Ok(Json(company.into()))
}

pub async fn get_company(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
) -> Result<Json<CompanyResponse>, AppError> {
    let company = repositories::company::fetch_company(&state.pool, company_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;
    Ok(Json(company.into()))
}
