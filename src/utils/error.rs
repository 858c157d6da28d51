use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use super::response::ErrorResponse;

/// Application-wide error type.
///
/// Validation and quota failures are raised before any generation API call;
/// everything else is converted to a uniform `{ "error": message }` payload
/// at the top of the request handler.
#[derive(Debug)]
pub enum AppError {
    /// Empty dream text.
    InvalidInput(String),
    /// Input contains no Thai-script character.
    UnsupportedLanguage(String),
    /// Daily interpretation cap reached.
    QuotaExceeded(String),
    /// The completion response was not the expected JSON object.
    GenerationFormat(String),
    /// A read/write against the relational store failed.
    Storage(String),
    /// LLM provider rejected our credentials.
    UpstreamAuth,
    /// LLM provider rate-limited us.
    UpstreamRateLimited,
    /// Transient LLM provider failure (timeout, 5xx, network).
    UpstreamTemporary,
    /// Any other LLM provider failure.
    Upstream(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    ValidationError(String),
    JsonParseFailed(String),
    Internal(String),
}

impl AppError {
    pub fn message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::UnsupportedLanguage(msg) => msg.clone(),
            AppError::QuotaExceeded(msg) => msg.clone(),
            AppError::GenerationFormat(_) => {
                "ระบบไม่สามารถประมวลผลคำทำนายได้ กรุณาลองใหม่อีกครั้ง".to_string()
            }
            AppError::Storage(msg) => msg.clone(),
            AppError::UpstreamAuth => {
                "การตั้งค่าระบบ AI ไม่ถูกต้อง กรุณาติดต่อผู้ดูแลระบบ".to_string()
            }
            AppError::UpstreamRateLimited | AppError::UpstreamTemporary => {
                "ระบบ AI ไม่พร้อมใช้งานชั่วคราว กรุณาลองใหม่ในอีกสักครู่".to_string()
            }
            AppError::Upstream(msg) => msg.clone(),
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::Forbidden(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::ValidationError(msg) => msg.clone(),
            AppError::JsonParseFailed(msg) => format!("คำขอไม่ถูกต้อง: {}", msg),
            AppError::Internal(msg) => msg.clone(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_)
            | AppError::UnsupportedLanguage(_)
            | AppError::ValidationError(_)
            | AppError::JsonParseFailed(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::QuotaExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::GenerationFormat(_)
            | AppError::Storage(_)
            | AppError::UpstreamAuth
            | AppError::UpstreamRateLimited
            | AppError::UpstreamTemporary
            | AppError::Upstream(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::GenerationFormat(detail) => {
                error!("Generation format error: {}", detail);
            }
            AppError::Storage(detail) => {
                error!("Storage error: {}", detail);
            }
            AppError::Internal(detail) => {
                error!("Internal server error: {}", detail);
            }
            other => {
                error!("Error [{}]: {}", status, other.message());
            }
        }

        (status, Json(ErrorResponse::new(self.message()))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::JsonParseFailed(rejection.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Storage(err.to_string())
    }
}

/// Convenience constructors.
impl AppError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_exceeded_maps_to_429() {
        let err = AppError::QuotaExceeded("โควต้าวันนี้เต็มแล้ว (5/5)".to_string());
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn language_gate_maps_to_400() {
        let err = AppError::UnsupportedLanguage("ระบบรองรับเฉพาะภาษาไทยครับ".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "ระบบรองรับเฉพาะภาษาไทยครับ");
    }

    #[test]
    fn upstream_errors_map_to_500() {
        assert_eq!(
            AppError::UpstreamTemporary.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::GenerationFormat("not json".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
