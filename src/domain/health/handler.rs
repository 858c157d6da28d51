use axum::{extract::State, Json};

use crate::state::AppState;

use super::dto::HealthStatus;
use super::service::check_health;

/// Liveness plus dependency checks (database, OpenAI API).
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, body = HealthStatus)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    let status = check_health(&state).await;
    Json(status)
}
