use axum::{
    extract::{Extension, Path, State},
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::job::{CreateJob, Job, JobResponse},
    models::user::User,
    repositories,
    state::AppState,
    types::JobId,
    utils::time,
};

pub async fn create_job(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateJob>,
) -> Result<Json<JobResponse>, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    payload.validate()?;
    let company = repositories::company::fetch_company_by_raw_id(&state.pool, &payload.company_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;
    let job = Job::new(
        company.id,
        payload.name,
        time::now_utc(&state.config.time_zone),
    );
    repositories::job::insert_job(&state.pool, &job).await?;
    Ok(Json(job.into()))
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<JobId>,
) -> Result<Json<JobResponse>, AppError> {
    let job = repositories::job::fetch_job(&state.pool, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    Ok(Json(job.into()))
}
