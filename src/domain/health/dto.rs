use serde::Serialize;
use utoipa::ToSchema;

/// Full health report.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Overall state (healthy/degraded/unhealthy)
    pub status: HealthState,
    #[schema(example = "0.1.0")]
    pub version: &'static str,
    /// Seconds since startup
    #[schema(example = 3600)]
    pub uptime_secs: u64,
    pub checks: HealthChecks,
}

#[derive(Serialize, Debug, PartialEq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    /// At least one dependency is failing.
    Degraded,
    /// All dependencies are failing.
    Unhealthy,
}

/// Dependency check results.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthChecks {
    pub database: CheckResult,
    pub openai_api: CheckResult,
}

/// One dependency check.
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    #[schema(example = true)]
    pub status: bool,
    /// Round-trip latency (ms)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 150)]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    pub fn success(latency_ms: u64) -> Self {
        Self {
            status: true,
            latency_ms: Some(latency_ms),
            error: None,
        }
    }

    pub fn failure(latency_ms: u64, error: String) -> Self {
        Self {
            status: false,
            latency_ms: Some(latency_ms),
            error: Some(error),
        }
    }

    pub fn timeout(timeout_ms: u64) -> Self {
        Self {
            status: false,
            latency_ms: Some(timeout_ms),
            error: Some("Timeout".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_result_success_has_no_error() {
        let result = CheckResult::success(150);

        assert!(result.status);
        assert_eq!(result.latency_ms, Some(150));
        assert!(result.error.is_none());
    }

    #[test]
    fn check_result_failure_carries_the_error() {
        let result = CheckResult::failure(200, "connection error".to_string());

        assert!(!result.status);
        assert_eq!(result.error, Some("connection error".to_string()));
    }

    #[test]
    fn health_state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&HealthState::Degraded).unwrap(),
            "\"degraded\""
        );
    }

    #[test]
    fn health_status_serializes_camel_case() {
        let status = HealthStatus {
            status: HealthState::Healthy,
            version: "0.1.0",
            uptime_secs: 3600,
            checks: HealthChecks {
                database: CheckResult::success(5),
                openai_api: CheckResult::success(150),
            },
        };

        let json = serde_json::to_string(&status).unwrap();

        assert!(json.contains("\"uptimeSecs\""));
        assert!(json.contains("\"openaiApi\""));
        assert!(json.contains("\"latencyMs\""));
    }
}
