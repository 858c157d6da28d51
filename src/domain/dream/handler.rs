use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::state::AppState;
use crate::utils::{
    auth::{AuthUser, OptionalAuthUser},
    error::AppError,
    response::ErrorResponse,
};

use super::{
    dto::{DreamHistoryItem, HistoryQuery, InterpretRequest, InterpretationResult, RateRequest},
    service::DreamService,
};

/// Dream interpretation endpoint. Anonymous callers are interpreted without
/// persistence or quota; authenticated callers go through the full pipeline.
#[utoipa::path(
    post,
    path = "/api/interpret",
    request_body = InterpretRequest,
    responses(
        (status = 200, body = InterpretationResult),
        (status = 400, body = ErrorResponse),
        (status = 401, body = ErrorResponse),
        (status = 429, body = ErrorResponse),
        (status = 500, body = ErrorResponse)
    ),
    tag = "dreams"
)]
pub async fn interpret_handler(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    req: Result<Json<InterpretRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = req?;
    req.validate()?;
    let caller = auth.user_id()?;

    let result = DreamService::interpret(&state, caller, &req.dream_text).await?;

    Ok(Json(result))
}

/// Dream history for the authenticated caller, newest first.
#[utoipa::path(
    get,
    path = "/api/dreams",
    params(("search" = Option<String>, Query, description = "Substring filter on dream text")),
    responses(
        (status = 200, body = Vec<DreamHistoryItem>),
        (status = 401, body = ErrorResponse),
        (status = 500, body = ErrorResponse)
    ),
    tag = "dreams"
)]
pub async fn history_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = auth.user_id()?;

    let items = DreamService::history(&*state.db, user_id, query.search.as_deref()).await?;

    Ok(Json(items))
}

/// Soft-deletes one of the caller's dreams.
#[utoipa::path(
    delete,
    path = "/api/dreams/{id}",
    params(("id" = Uuid, Path, description = "Dream id")),
    responses(
        (status = 204),
        (status = 401, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse)
    ),
    tag = "dreams"
)]
pub async fn delete_dream_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(dream_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = auth.user_id()?;

    DreamService::soft_delete(&*state.db, user_id, dream_id).await?;

    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// Rates the interpretation of one of the caller's dreams (1-5 stars).
#[utoipa::path(
    post,
    path = "/api/dreams/{id}/rating",
    params(("id" = Uuid, Path, description = "Dream id")),
    request_body = RateRequest,
    responses(
        (status = 204),
        (status = 400, body = ErrorResponse),
        (status = 401, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse)
    ),
    tag = "dreams"
)]
pub async fn rate_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(dream_id): Path<Uuid>,
    req: Result<Json<RateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = req?;
    req.validate()?;
    let user_id = auth.user_id()?;

    DreamService::rate(&*state.db, user_id, dream_id, req.rating).await?;

    Ok(axum::http::StatusCode::NO_CONTENT)
}
