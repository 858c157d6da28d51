use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use crate::utils::error::AppError;

use super::dto::{ProfileResponse, UpdateProfileRequest};
use super::entity::user::{self, Lifecycle};

pub struct UserService;

impl UserService {
    /// Loads the caller's own profile. Banned accounts are locked out of
    /// everything except the admin restore path.
    pub async fn get_profile(
        db: &DatabaseConnection,
        user_id: Uuid,
    ) -> Result<ProfileResponse, AppError> {
        let found = Self::find_active(db, user_id).await?;
        Ok(ProfileResponse::from(found))
    }

    /// Partial profile update: only the fields present in the request
    /// change.
    pub async fn update_profile(
        db: &DatabaseConnection,
        user_id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<ProfileResponse, AppError> {
        let found = Self::find_active(db, user_id).await?;

        let mut active: user::ActiveModel = found.into();
        if let Some(birth_date) = req.birth_date {
            active.birth_date = Set(Some(birth_date));
        }
        if let Some(gender) = req.gender {
            active.gender = Set(Some(gender));
        }
        if let Some(location) = req.location {
            active.location = Set(Some(location));
        }
        let updated = active.update(db).await?;

        Ok(ProfileResponse::from(updated))
    }

    async fn find_active(db: &DatabaseConnection, user_id: Uuid) -> Result<user::Model, AppError> {
        let found = user::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("ไม่พบบัญชีผู้ใช้"))?;

        if found.lifecycle() == Lifecycle::Deleted {
            return Err(AppError::forbidden("บัญชีนี้ถูกระงับการใช้งาน"));
        }
        Ok(found)
    }
}
