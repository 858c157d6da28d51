use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::state::AppState;
use crate::utils::{auth::AuthUser, error::AppError, response::ErrorResponse};

use super::{
    dto::{
        AdminDreamItem, AdminSearchQuery, AdminUserItem, AuditLogItem, EditInterpretationRequest,
        OverviewResponse, SettingItem, UpdateSettingRequest,
    },
    service::AdminService,
};

/// Console landing data.
#[utoipa::path(
    get,
    path = "/api/admin/overview",
    responses(
        (status = 200, body = OverviewResponse),
        (status = 401, body = ErrorResponse),
        (status = 403, body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn overview_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    AdminService::require_admin(&*state.db, auth.user_id()?).await?;

    let overview = AdminService::overview(&*state.db).await?;

    Ok(Json(overview))
}

/// Latest active dreams for moderation.
#[utoipa::path(
    get,
    path = "/api/admin/dreams",
    params(("search" = Option<String>, Query, description = "Substring filter on dream text")),
    responses(
        (status = 200, body = Vec<AdminDreamItem>),
        (status = 401, body = ErrorResponse),
        (status = 403, body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn list_dreams_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AdminSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    AdminService::require_admin(&*state.db, auth.user_id()?).await?;

    let dreams = AdminService::list_dreams(&*state.db, query.search.as_deref()).await?;

    Ok(Json(dreams))
}

/// Latest registered users.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(("search" = Option<String>, Query, description = "Substring filter on email")),
    responses(
        (status = 200, body = Vec<AdminUserItem>),
        (status = 401, body = ErrorResponse),
        (status = 403, body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn list_users_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AdminSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    AdminService::require_admin(&*state.db, auth.user_id()?).await?;

    let users = AdminService::list_users(&*state.db, query.search.as_deref()).await?;

    Ok(Json(users))
}

/// Latest audit trail entries.
#[utoipa::path(
    get,
    path = "/api/admin/logs",
    responses(
        (status = 200, body = Vec<AuditLogItem>),
        (status = 401, body = ErrorResponse),
        (status = 403, body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn list_logs_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    AdminService::require_admin(&*state.db, auth.user_id()?).await?;

    let logs = AdminService::list_logs(&*state.db).await?;

    Ok(Json(logs))
}

/// Boolean feature switches.
#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses(
        (status = 200, body = Vec<SettingItem>),
        (status = 401, body = ErrorResponse),
        (status = 403, body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn list_settings_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    AdminService::require_admin(&*state.db, auth.user_id()?).await?;

    let settings = AdminService::list_settings(&*state.db).await?;

    Ok(Json(settings))
}

/// Sets a feature switch to an explicit value.
#[utoipa::path(
    patch,
    path = "/api/admin/settings/{key}",
    params(("key" = String, Path, description = "Setting key")),
    request_body = UpdateSettingRequest,
    responses(
        (status = 200, body = SettingItem),
        (status = 401, body = ErrorResponse),
        (status = 403, body = ErrorResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn update_setting_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(key): Path<String>,
    req: Result<Json<UpdateSettingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = req?;
    let admin = AdminService::require_admin(&*state.db, auth.user_id()?).await?;

    let setting = AdminService::update_setting(&*state.db, admin.id, &key, req.value).await?;

    Ok(Json(setting))
}

/// Soft-deletes (bans) a user account.
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/ban",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204),
        (status = 400, body = ErrorResponse),
        (status = 401, body = ErrorResponse),
        (status = 403, body = ErrorResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn ban_user_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AdminService::require_admin(&*state.db, auth.user_id()?).await?;

    AdminService::ban_user(&*state.db, admin.id, user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Restores a banned user account.
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/restore",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204),
        (status = 400, body = ErrorResponse),
        (status = 401, body = ErrorResponse),
        (status = 403, body = ErrorResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn restore_user_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AdminService::require_admin(&*state.db, auth.user_id()?).await?;

    AdminService::restore_user(&*state.db, admin.id, user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Soft-deletes any dream.
#[utoipa::path(
    delete,
    path = "/api/admin/dreams/{id}",
    params(("id" = Uuid, Path, description = "Dream id")),
    responses(
        (status = 204),
        (status = 401, body = ErrorResponse),
        (status = 403, body = ErrorResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn delete_dream_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(dream_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AdminService::require_admin(&*state.db, auth.user_id()?).await?;

    AdminService::delete_dream(&*state.db, admin.id, dream_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Restores a soft-deleted dream.
#[utoipa::path(
    post,
    path = "/api/admin/dreams/{id}/restore",
    params(("id" = Uuid, Path, description = "Dream id")),
    responses(
        (status = 204),
        (status = 401, body = ErrorResponse),
        (status = 403, body = ErrorResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn restore_dream_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(dream_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AdminService::require_admin(&*state.db, auth.user_id()?).await?;

    AdminService::restore_dream(&*state.db, admin.id, dream_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Manual analysis override, stamped with a researcher note.
#[utoipa::path(
    patch,
    path = "/api/admin/interpretations/{id}",
    params(("id" = Uuid, Path, description = "Interpretation id")),
    request_body = EditInterpretationRequest,
    responses(
        (status = 204),
        (status = 400, body = ErrorResponse),
        (status = 401, body = ErrorResponse),
        (status = 403, body = ErrorResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn edit_interpretation_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(interpretation_id): Path<Uuid>,
    req: Result<Json<EditInterpretationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = req?;
    req.validate()?;
    let admin = AdminService::require_admin(&*state.db, auth.user_id()?).await?;

    AdminService::edit_interpretation(&*state.db, admin.id, interpretation_id, req.analysis)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Daily-activity report download.
#[utoipa::path(
    get,
    path = "/api/admin/export",
    responses(
        (status = 200, content_type = "text/csv", body = String),
        (status = 401, body = ErrorResponse),
        (status = 403, body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn export_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let admin = AdminService::require_admin(&*state.db, auth.user_id()?).await?;

    let csv = AdminService::export_report(&*state.db, admin.id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"daily_report.csv\"",
            ),
        ],
        csv,
    ))
}
