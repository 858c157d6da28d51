use axum::{
    async_trait,
    extract::FromRequestParts,
    http::header::{AUTHORIZATION, COOKIE},
    http::request::Parts,
};
use uuid::Uuid;

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::jwt::{decode_access_token, Claims};

/// Cookie used by the identity provider's session mechanism.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Extractor for endpoints that require an authenticated session.
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// User id carried in the JWT subject.
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        self.0
            .sub
            .parse()
            .map_err(|_| AppError::Unauthorized("รหัสผู้ใช้ไม่ถูกต้อง".to_string()))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?
            .ok_or_else(|| AppError::Unauthorized("กรุณาเข้าสู่ระบบ".to_string()))?;

        let claims = decode_access_token(&token, &state.config.jwt_secret)?;

        Ok(AuthUser(claims))
    }
}

/// Extractor for endpoints that accept anonymous callers.
///
/// A missing token resolves to an anonymous session; a token that is
/// present but invalid is still rejected.
pub struct OptionalAuthUser(pub Option<Claims>);

impl OptionalAuthUser {
    pub fn user_id(&self) -> Result<Option<Uuid>, AppError> {
        match &self.0 {
            Some(claims) => claims
                .sub
                .parse()
                .map(Some)
                .map_err(|_| AppError::Unauthorized("รหัสผู้ใช้ไม่ถูกต้อง".to_string())),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match extract_token(parts)? {
            Some(token) => {
                let claims = decode_access_token(&token, &state.config.jwt_secret)?;
                Ok(OptionalAuthUser(Some(claims)))
            }
            None => Ok(OptionalAuthUser(None)),
        }
    }
}

/// Pulls a bearer token from the Authorization header, falling back to the
/// session cookie.
fn extract_token(parts: &Parts) -> Result<Option<String>, AppError> {
    if let Some(auth_header) = parts.headers.get(AUTHORIZATION) {
        let auth_header_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("รูปแบบ header ไม่ถูกต้อง".to_string()))?;

        if !auth_header_str.starts_with("Bearer ") {
            return Err(AppError::Unauthorized(
                "รูปแบบโทเค็นไม่ถูกต้อง".to_string(),
            ));
        }

        return Ok(Some(auth_header_str[7..].to_string()));
    }

    extract_token_from_cookie(parts)
}

fn extract_token_from_cookie(parts: &Parts) -> Result<Option<String>, AppError> {
    let Some(cookie_header) = parts.headers.get(COOKIE) else {
        return Ok(None);
    };

    let cookie_str = cookie_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("รูปแบบคุกกี้ไม่ถูกต้อง".to_string()))?;

    // "name1=value1; name2=value2"
    for cookie in cookie_str.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(&format!("{}=", ACCESS_TOKEN_COOKIE)) {
            if !value.is_empty() {
                return Ok(Some(value.to_string()));
            }
        }
    }

    Ok(None)
}
