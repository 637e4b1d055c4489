use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppError,
    models::timesheet::{ApproveTimesheetRequest, RejectTimesheetRequest, TimesheetResponse},
    models::user::User,
    repositories,
    services::approval::ApprovalAction,
    state::AppState,
    types::{ShiftId, TimesheetId},
    utils::time,
};

/// Opens a draft timesheet for a shift.
pub async fn create_timesheet(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(shift_id): Path<ShiftId>,
) -> Result<Json<TimesheetResponse>, AppError> {
    let now = time::now_utc(&state.config.time_zone);
    let timesheet = state
        .approvals
        .create_for_shift(&shift_id.to_string(), &user, now)
        .await?;
    Ok(Json(timesheet.into()))
}

pub async fn get_timesheet(
    State(state): State<AppState>,
    Path(timesheet_id): Path<TimesheetId>,
) -> Result<Json<TimesheetResponse>, AppError> {
    let timesheet = repositories::timesheet::fetch_timesheet(&state.pool, timesheet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Timesheet not found".to_string()))?;
    Ok(Json(timesheet.into()))
}

/// draft → pending company approval, with the unsigned PDF snapshot.
pub async fn submit_timesheet(
    State(state): State<AppState>,
    Path(timesheet_id): Path<TimesheetId>,
) -> Result<Json<TimesheetResponse>, AppError> {
    let now = time::now_utc(&state.config.time_zone);
    let timesheet = state.approvals.submit(timesheet_id, now).await?;
    Ok(Json(timesheet.into()))
}

pub async fn approve_timesheet(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(timesheet_id): Path<TimesheetId>,
    Json(payload): Json<ApproveTimesheetRequest>,
) -> Result<Json<TimesheetResponse>, AppError> {
    let now = time::now_utc(&state.config.time_zone);
    let timesheet = state
        .approvals
        .approve(timesheet_id, &user, payload.stage, &payload.signature, now)
        .await?;
    Ok(Json(timesheet.into()))
}

pub async fn reject_timesheet(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(timesheet_id): Path<TimesheetId>,
    Json(payload): Json<RejectTimesheetRequest>,
) -> Result<Json<TimesheetResponse>, AppError> {
    let now = time::now_utc(&state.config.time_zone);
    let timesheet = state
        .approvals
        .reject(timesheet_id, &user, &payload.reason, now)
        .await?;
    Ok(Json(timesheet.into()))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailableActionsResponse {
    pub actions: Vec<ApprovalAction>,
}

/// The approve/reject actions the calling user may currently perform.
/// Derived from the same predicates the mutating endpoints enforce.
pub async fn get_available_actions(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(timesheet_id): Path<TimesheetId>,
) -> Result<Json<AvailableActionsResponse>, AppError> {
    let actions = state.approvals.actions_for(timesheet_id, &user).await?;
    Ok(Json(AvailableActionsResponse { actions }))
}
