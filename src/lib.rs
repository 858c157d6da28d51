pub mod config;
pub mod domain;
pub mod global;
pub mod state;
pub mod utils;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        domain::health::handler::health_check,
        domain::dream::handler::interpret_handler,
        domain::dream::handler::history_handler,
        domain::dream::handler::delete_dream_handler,
        domain::dream::handler::rate_handler,
        domain::user::handler::get_profile_handler,
        domain::user::handler::update_profile_handler,
        domain::admin::handler::overview_handler,
        domain::admin::handler::list_dreams_handler,
        domain::admin::handler::list_users_handler,
        domain::admin::handler::list_logs_handler,
        domain::admin::handler::list_settings_handler,
        domain::admin::handler::update_setting_handler,
        domain::admin::handler::ban_user_handler,
        domain::admin::handler::restore_user_handler,
        domain::admin::handler::delete_dream_handler,
        domain::admin::handler::restore_dream_handler,
        domain::admin::handler::edit_interpretation_handler,
        domain::admin::handler::export_handler,
    ),
    components(
        schemas(
            domain::health::dto::HealthStatus,
            domain::health::dto::HealthState,
            domain::health::dto::HealthChecks,
            domain::health::dto::CheckResult,
            domain::dream::dto::InterpretRequest,
            domain::dream::dto::InterpretationResult,
            domain::dream::dto::DreamHistoryItem,
            domain::dream::dto::InterpretationSummary,
            domain::dream::dto::RateRequest,
            domain::user::dto::ProfileResponse,
            domain::user::dto::UpdateProfileRequest,
            domain::user::entity::user::UserRole,
            domain::user::entity::user::Gender,
            domain::user::entity::user::Lifecycle,
            domain::admin::dto::OverviewResponse,
            domain::admin::dto::DailyDreams,
            domain::admin::dto::SentimentStat,
            domain::admin::dto::TopTag,
            domain::admin::dto::AdminDreamItem,
            domain::admin::dto::AdminUserItem,
            domain::admin::dto::AuditLogItem,
            domain::admin::dto::SettingItem,
            domain::admin::dto::UpdateSettingRequest,
            domain::admin::dto::EditInterpretationRequest,
            utils::response::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Liveness and dependency checks"),
        (name = "dreams", description = "Dream interpretation, history, rating"),
        (name = "users", description = "Profile"),
        (name = "admin", description = "Console: moderation, settings, reports")
    )
)]
pub struct ApiDoc;

/// Builds the application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(domain::health::health_check))
        .route("/api/interpret", post(domain::dream::handler::interpret_handler))
        .route("/api/dreams", get(domain::dream::handler::history_handler))
        .route(
            "/api/dreams/:id",
            delete(domain::dream::handler::delete_dream_handler),
        )
        .route(
            "/api/dreams/:id/rating",
            post(domain::dream::handler::rate_handler),
        )
        .route(
            "/api/users/me",
            get(domain::user::handler::get_profile_handler)
                .patch(domain::user::handler::update_profile_handler),
        )
        .route(
            "/api/admin/overview",
            get(domain::admin::handler::overview_handler),
        )
        .route(
            "/api/admin/dreams",
            get(domain::admin::handler::list_dreams_handler),
        )
        .route(
            "/api/admin/users",
            get(domain::admin::handler::list_users_handler),
        )
        .route(
            "/api/admin/logs",
            get(domain::admin::handler::list_logs_handler),
        )
        .route(
            "/api/admin/settings",
            get(domain::admin::handler::list_settings_handler),
        )
        .route(
            "/api/admin/settings/:key",
            patch(domain::admin::handler::update_setting_handler),
        )
        .route(
            "/api/admin/users/:id/ban",
            post(domain::admin::handler::ban_user_handler),
        )
        .route(
            "/api/admin/users/:id/restore",
            post(domain::admin::handler::restore_user_handler),
        )
        .route(
            "/api/admin/dreams/:id",
            delete(domain::admin::handler::delete_dream_handler),
        )
        .route(
            "/api/admin/dreams/:id/restore",
            post(domain::admin::handler::restore_dream_handler),
        )
        .route(
            "/api/admin/interpretations/:id",
            patch(domain::admin::handler::edit_interpretation_handler),
        )
        .route(
            "/api/admin/export",
            get(domain::admin::handler::export_handler),
        )
        .layer(middleware::from_fn(
            global::middleware::request_trace_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
