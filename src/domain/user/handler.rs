use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::state::AppState;
use crate::utils::{auth::AuthUser, error::AppError, response::ErrorResponse};

use super::{
    dto::{ProfileResponse, UpdateProfileRequest},
    service::UserService,
};

/// Authenticated caller's profile.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, body = ProfileResponse),
        (status = 401, body = ErrorResponse),
        (status = 403, body = ErrorResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn get_profile_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user_id = auth.user_id()?;

    let profile = UserService::get_profile(&*state.db, user_id).await?;

    Ok(Json(profile))
}

/// Partial profile update (birth date, gender, location).
#[utoipa::path(
    patch,
    path = "/api/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, body = ProfileResponse),
        (status = 400, body = ErrorResponse),
        (status = 401, body = ErrorResponse),
        (status = 403, body = ErrorResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn update_profile_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    req: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = req?;
    req.validate()?;
    let user_id = auth.user_id()?;

    let profile = UserService::update_profile(&*state.db, user_id, req).await?;

    Ok(Json(profile))
}
