use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::entity::user::{self, Gender, Lifecycle, UserRole};

/// Profile payload for `GET /api/users/me`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub lifecycle: Lifecycle,
    pub created_at: NaiveDateTime,
}

impl From<user::Model> for ProfileResponse {
    fn from(model: user::Model) -> Self {
        let lifecycle = model.lifecycle();
        Self {
            id: model.id,
            email: model.email,
            role: model.role,
            birth_date: model.birth_date,
            gender: model.gender,
            location: model.location,
            lifecycle,
            created_at: model.created_at,
        }
    }
}

/// Profile update. Absent fields are left untouched.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    #[validate(length(max = 120, message = "ที่อยู่ยาวเกินไป (สูงสุด 120 ตัวอักษร)"))]
    pub location: Option<String>,
}
