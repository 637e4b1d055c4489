//! Actor identity resolution.
//!
//! Authentication is handled by an upstream gateway; requests arrive with
//! the acting user's id in the `X-User-Id` header. This middleware loads
//! the account and injects it as an [`Extension<User>`] so handlers and the
//! approval rules can evaluate role and company relationships.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::{models::user::User, repositories, state::AppState, types::UserId};

pub const USER_ID_HEADER: &str = "x-user-id";

pub async fn identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let user = resolve_user(request.headers(), &state).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

async fn resolve_user(headers: &HeaderMap, state: &AppState) -> Result<User, StatusCode> {
    let raw = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let user_id: UserId = raw.parse().map_err(|_| StatusCode::UNAUTHORIZED)?;
    repositories::user::fetch_user(&state.pool, user_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::UNAUTHORIZED)
}
