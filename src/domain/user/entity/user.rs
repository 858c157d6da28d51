use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "admin")]
    Admin,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[sea_orm(string_value = "male")]
    Male,
    #[sea_orm(string_value = "female")]
    Female,
    #[sea_orm(string_value = "lgbtq")]
    Lgbtq,
    #[sea_orm(string_value = "prefer_not_to_say")]
    PreferNotToSay,
}

/// User account. Managed by the external identity provider at signup;
/// profile attributes are edited here.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub role: UserRole,
    pub birth_date: Option<Date>,
    pub gender: Option<Gender>,
    pub location: Option<String>,
    pub created_at: DateTime,
    /// Soft delete ("ban"); reversible only by an admin.
    pub deleted_at: Option<DateTime>,
}

/// Explicit two-state lifecycle behind the nullable deletion timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Active,
    Deleted,
}

impl Model {
    pub fn lifecycle(&self) -> Lifecycle {
        if self.deleted_at.is_some() {
            Lifecycle::Deleted
        } else {
            Lifecycle::Active
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::domain::dream::entity::dream::Entity")]
    Dream,
    #[sea_orm(has_many = "super::user_usage::Entity")]
    UserUsage,
    #[sea_orm(has_many = "crate::domain::audit::entity::audit_log::Entity")]
    AuditLog,
}

impl Related<crate::domain::dream::entity::dream::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dream.def()
    }
}

impl Related<super::user_usage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserUsage.def()
    }
}

impl Related<crate::domain::audit::entity::audit_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuditLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(deleted_at: Option<DateTime>) -> Model {
        Model {
            id: Uuid::new_v4(),
            email: "dreamer@example.com".to_string(),
            role: UserRole::User,
            birth_date: None,
            gender: Some(Gender::PreferNotToSay),
            location: None,
            created_at: chrono::Utc::now().naive_utc(),
            deleted_at,
        }
    }

    #[test]
    fn lifecycle_follows_deletion_timestamp() {
        assert_eq!(sample_user(None).lifecycle(), Lifecycle::Active);
        assert_eq!(
            sample_user(Some(chrono::Utc::now().naive_utc())).lifecycle(),
            Lifecycle::Deleted
        );
    }
}
