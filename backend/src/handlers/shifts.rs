use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::shift::{CreateShiftRequest, Shift, ShiftResponse},
    models::user::User,
    models::{PaginatedResponse, PaginationQuery},
    repositories,
    services::staffing::{self, StaffingSummary},
    state::AppState,
    types::{JobId, ShiftId},
    utils::time,
};

pub async fn create_shift(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(job_id): Path<JobId>,
    Json(payload): Json<CreateShiftRequest>,
) -> Result<Json<ShiftResponse>, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    payload.validate()?;
    if payload.end_time <= payload.start_time {
        return Err(AppError::BadRequest(
            "Shift end time must be after start time".to_string(),
        ));
    }
    let job = repositories::job::fetch_job(&state.pool, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    // Requirement vectors are normalized here, at construction, so the
    // minimum-crew-chief policy never leaks into the staffing calculator.
    let requirements = payload
        .requirements()
        .with_minimum_crew_chiefs(state.config.min_crew_chiefs);

    let shift = Shift::new(
        job.id,
        payload.date,
        payload.start_time,
        payload.end_time,
        requirements,
        time::now_utc(&state.config.time_zone),
    );
    repositories::shift::insert_shift(&state.pool, &shift).await?;
    Ok(Json(shift.into()))
}

pub async fn get_shift(
    State(state): State<AppState>,
    Path(shift_id): Path<ShiftId>,
) -> Result<Json<ShiftResponse>, AppError> {
    let shift = repositories::shift::fetch_shift(&state.pool, shift_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Shift not found".to_string()))?;
    Ok(Json(shift.into()))
}

pub async fn list_shifts(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<PaginatedResponse<ShiftResponse>>, AppError> {
    let limit = pagination.limit();
    let offset = pagination.offset();
    let shifts = repositories::shift::list_shifts(&state.pool, limit, offset).await?;
    let total = repositories::shift::count_shifts(&state.pool).await?;
    let data = shifts.into_iter().map(ShiftResponse::from).collect();
    Ok(Json(PaginatedResponse::new(data, total, limit, offset)))
}

/// Staffing picture for one shift: totals, fulfillment band, and per-role
/// shortages.
pub async fn get_shift_staffing(
    State(state): State<AppState>,
    Path(shift_id): Path<ShiftId>,
) -> Result<Json<StaffingSummary>, AppError> {
    let shift = repositories::shift::fetch_shift(&state.pool, shift_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Shift not found".to_string()))?;
    let assignments =
        repositories::assignment::list_assignments_for_shift(&state.pool, shift_id).await?;
    let summary = staffing::summarize(&shift.role_requirements(), &assignments);
    Ok(Json(summary))
}
