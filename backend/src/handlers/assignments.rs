use axum::{
    extract::{Extension, Path, State},
    Json,
};

use crate::{
    error::AppError,
    models::assignment::{
        AssignmentResponse, CreateAssignmentRequest, ShiftAssignment, UpdateAssignmentStatusRequest,
        AssignmentStatus,
    },
    models::time_entry::{
        total_worked_hours, ClockOutRequest, TimeEntry, TimeEntryResponse,
        MAX_ENTRIES_PER_ASSIGNMENT,
    },
    models::user::User,
    repositories,
    state::AppState,
    types::{AssignmentId, ShiftId},
    utils::time,
};

pub async fn create_assignment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(shift_id): Path<ShiftId>,
    Json(payload): Json<CreateAssignmentRequest>,
) -> Result<Json<AssignmentResponse>, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    let shift = repositories::shift::fetch_shift(&state.pool, shift_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Shift not found".to_string()))?;

    let worker_id = match payload.worker_id {
        Some(id) => {
            let worker = repositories::user::fetch_user(&state.pool, id)
                .await?
                .ok_or_else(|| AppError::NotFound("Worker not found".to_string()))?;
            Some(worker.id)
        }
        None => None,
    };

    let assignment = ShiftAssignment::new(
        shift.id,
        worker_id,
        payload.role_code,
        time::now_utc(&state.config.time_zone),
    );
    repositories::assignment::insert_assignment(&state.pool, &assignment).await?;
    Ok(Json(assignment.into()))
}

pub async fn list_assignments(
    State(state): State<AppState>,
    Path(shift_id): Path<ShiftId>,
) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let assignments =
        repositories::assignment::list_assignments_for_shift(&state.pool, shift_id).await?;
    Ok(Json(
        assignments.into_iter().map(AssignmentResponse::from).collect(),
    ))
}

pub async fn update_assignment_status(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(assignment_id): Path<AssignmentId>,
    Json(payload): Json<UpdateAssignmentStatusRequest>,
) -> Result<Json<AssignmentResponse>, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    let now = time::now_utc(&state.config.time_zone);
    let rows = repositories::assignment::update_assignment_status(
        &state.pool,
        assignment_id,
        payload.status,
        now,
    )
    .await?;
    if rows == 0 {
        return Err(AppError::NotFound("Assignment not found".to_string()));
    }
    let assignment = repositories::assignment::fetch_assignment(&state.pool, assignment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;
    Ok(Json(assignment.into()))
}

/// The assigned worker (or an admin acting for them) opens the next time
/// entry and goes on the clock.
pub async fn clock_in(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(assignment_id): Path<AssignmentId>,
) -> Result<Json<TimeEntryResponse>, AppError> {
    let assignment = fetch_owned_assignment(&state, &user, assignment_id).await?;

    let entries =
        repositories::time_entry::list_entries_for_assignment(&state.pool, assignment_id).await?;
    if entries.iter().any(TimeEntry::is_open) {
        return Err(AppError::Conflict("Already clocked in".to_string()));
    }
    if entries.len() as i32 >= MAX_ENTRIES_PER_ASSIGNMENT {
        return Err(AppError::Conflict(format!(
            "At most {} time entries per shift",
            MAX_ENTRIES_PER_ASSIGNMENT
        )));
    }

    let tz = &state.config.time_zone;
    let now_utc = time::now_utc(tz);
    let entry = TimeEntry::new(
        assignment.id.clone(),
        entries.len() as i32 + 1,
        time::now_in_timezone(tz).naive_local(),
        now_utc,
    );
    repositories::time_entry::insert_time_entry(&state.pool, &entry).await?;
    repositories::assignment::update_assignment_status(
        &state.pool,
        assignment_id,
        AssignmentStatus::ClockedIn,
        now_utc,
    )
    .await?;
    Ok(Json(entry.into()))
}

/// Closes the open entry. Ends the shift or starts a break depending on
/// the payload.
pub async fn clock_out(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(assignment_id): Path<AssignmentId>,
    Json(payload): Json<ClockOutRequest>,
) -> Result<Json<Vec<TimeEntryResponse>>, AppError> {
    fetch_owned_assignment(&state, &user, assignment_id).await?;

    let tz = &state.config.time_zone;
    let now_utc = time::now_utc(tz);
    let rows = repositories::time_entry::close_open_entry(
        &state.pool,
        assignment_id,
        time::now_in_timezone(tz).naive_local(),
        now_utc,
    )
    .await?;
    if rows == 0 {
        return Err(AppError::Conflict("Not clocked in".to_string()));
    }

    let next_status = if payload.end_shift {
        AssignmentStatus::ShiftEnded
    } else {
        AssignmentStatus::OnBreak
    };
    repositories::assignment::update_assignment_status(
        &state.pool,
        assignment_id,
        next_status,
        now_utc,
    )
    .await?;

    let entries =
        repositories::time_entry::list_entries_for_assignment(&state.pool, assignment_id).await?;
    Ok(Json(
        entries.into_iter().map(TimeEntryResponse::from).collect(),
    ))
}

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct WorkedHoursResponse {
    pub entries: Vec<TimeEntryResponse>,
    pub total_hours: f64,
}

pub async fn list_time_entries(
    State(state): State<AppState>,
    Path(assignment_id): Path<AssignmentId>,
) -> Result<Json<WorkedHoursResponse>, AppError> {
    let entries =
        repositories::time_entry::list_entries_for_assignment(&state.pool, assignment_id).await?;
    let total_hours = total_worked_hours(&entries);
    Ok(Json(WorkedHoursResponse {
        entries: entries.into_iter().map(TimeEntryResponse::from).collect(),
        total_hours,
    }))
}

/// Loads the assignment and checks the actor is its worker or an admin.
async fn fetch_owned_assignment(
    state: &AppState,
    user: &User,
    assignment_id: AssignmentId,
) -> Result<ShiftAssignment, AppError> {
    let assignment = repositories::assignment::fetch_assignment(&state.pool, assignment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;
    let owns = assignment.worker_id.as_deref() == Some(user.id.as_str());
    if !owns && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Only the assigned worker may clock this assignment".to_string(),
        ));
    }
    if !assignment.status.counts_toward_fill() {
        return Err(AppError::Conflict(
            "Assignment is no longer active".to_string(),
        ));
    }
    Ok(assignment)
}
