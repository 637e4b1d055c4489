use axum::{
    extract::{Extension, Path, State},
    Json,
};

use crate::{
    error::AppError,
    models::user::{CreateUser, User, UserResponse},
    repositories,
    state::AppState,
    types::UserId,
    utils::time,
};

pub async fn create_user(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Json(payload): Json<CreateUser>,
) -> Result<Json<UserResponse>, AppError> {
    if !actor.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    if payload.full_name.trim().is_empty() {
        return Err(AppError::Validation(vec![
            "full_name: must not be empty".to_string()
        ]));
    }
    if let Some(company_id) = &payload.company_id {
        repositories::company::fetch_company_by_raw_id(&state.pool, company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;
    }
    let user = User::new(
        payload.full_name,
        payload.role,
        payload.company_id,
        time::now_utc(&state.config.time_zone),
    );
    repositories::user::insert_user(&state.pool, &user).await?;
    Ok(Json(user.into()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<UserResponse>, AppError> {
    let user = repositories::user::fetch_user(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user.into()))
}
