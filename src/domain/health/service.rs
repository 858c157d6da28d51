use std::sync::OnceLock;
use std::time::{Duration, Instant};

use tokio::time::timeout;

use crate::state::AppState;

use super::dto::{CheckResult, HealthChecks, HealthState, HealthStatus};

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Records the process start time; called once from `main`.
pub fn init_start_time() {
    START_TIME.get_or_init(Instant::now);
}

fn uptime_secs() -> u64 {
    START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0)
}

pub async fn check_health(state: &AppState) -> HealthStatus {
    let database = check_database(state).await;
    let openai_api = check_openai(state).await;

    let healthy = [database.status, openai_api.status]
        .iter()
        .filter(|s| **s)
        .count();
    let status = match healthy {
        2 => HealthState::Healthy,
        1 => HealthState::Degraded,
        _ => HealthState::Unhealthy,
    };

    HealthStatus {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: uptime_secs(),
        checks: HealthChecks {
            database,
            openai_api,
        },
    }
}

async fn check_database(state: &AppState) -> CheckResult {
    let started = Instant::now();
    match timeout(CHECK_TIMEOUT, state.db.ping()).await {
        Ok(Ok(())) => CheckResult::success(started.elapsed().as_millis() as u64),
        Ok(Err(e)) => CheckResult::failure(started.elapsed().as_millis() as u64, e.to_string()),
        Err(_) => CheckResult::timeout(CHECK_TIMEOUT.as_millis() as u64),
    }
}

async fn check_openai(state: &AppState) -> CheckResult {
    let started = Instant::now();
    match timeout(CHECK_TIMEOUT, state.ai.check_connectivity()).await {
        Ok(Ok(())) => CheckResult::success(started.elapsed().as_millis() as u64),
        Ok(Err(e)) => {
            CheckResult::failure(started.elapsed().as_millis() as u64, e.message())
        }
        Err(_) => CheckResult::timeout(CHECK_TIMEOUT.as_millis() as u64),
    }
}
