use serde::Serialize;
use utoipa::ToSchema;

/// Uniform error payload.
///
/// Every failure, whatever its internal kind, reaches the client as:
/// ```json
/// { "error": "..." }
/// ```
/// The HTTP status code carries the distinction; no structured error codes
/// exist beyond it.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
