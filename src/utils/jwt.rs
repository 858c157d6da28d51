use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::error::AppError;

/// JWT claims issued by the external identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id, UUID string)
    pub sub: String,
    /// Issued At
    pub iat: usize,
    /// Expiration
    pub exp: usize,
    /// Token type ("access"); absent on older tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// Validates an access token and returns its claims.
pub fn decode_access_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let validation = Validation::default();

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("เซสชันหมดอายุ กรุณาเข้าสู่ระบบใหม่".into())
        }
        _ => AppError::Unauthorized("โทเค็นไม่ถูกต้อง".into()),
    })?;

    if let Some(token_type) = &claims.token_type {
        if token_type != "access" {
            return Err(AppError::Unauthorized("ประเภทโทเค็นไม่ถูกต้อง".into()));
        }
    }

    Ok(claims)
}

/// Mints an access token. The identity provider owns issuance in
/// production; this exists for tests and local tooling.
pub fn encode_access_token(
    sub: String,
    secret: &str,
    expiration_seconds: i64,
) -> Result<String, AppError> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub,
        iat: now as usize,
        exp: (now + expiration_seconds) as usize,
        token_type: Some("access".to_string()),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token creation failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_and_decode_round_trip() {
        let secret = "test_secret";
        let sub = "7b6a3f64-55f5-4f08-9b0a-0d2b8e8c0a11".to_string();

        let token = encode_access_token(sub.clone(), secret, 3600).expect("token generation");
        let claims = decode_access_token(&token, secret).expect("token validation");

        assert_eq!(claims.sub, sub);
        assert_eq!(claims.token_type.as_deref(), Some("access"));
    }

    #[test]
    fn invalid_token_is_rejected() {
        let result = decode_access_token("not-a-token", "test_secret");
        assert!(result.is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = encode_access_token("user".into(), "secret-a", 3600).unwrap();
        assert!(decode_access_token(&token, "secret-b").is_err());
    }
}
