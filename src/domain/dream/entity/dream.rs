use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::user::entity::user::Lifecycle;

/// A submitted dream narrative with its retrieval embedding.
///
/// `user_id` is nullable: anonymous submissions are interpreted but never
/// persisted, so a null owner only appears through admin tooling.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dreams")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    #[sea_orm(column_type = "Text")]
    pub dream_text: String,
    /// Embedding of `dream_text`; queried through the `match_dreams`
    /// stored procedure, never compared in-process.
    pub embedding: Vec<f32>,
    pub tags: Vec<String>,
    pub created_at: DateTime,
    /// Soft delete; reversible only by an admin.
    pub deleted_at: Option<DateTime>,
}

impl Model {
    pub fn lifecycle(&self) -> Lifecycle {
        if self.deleted_at.is_some() {
            Lifecycle::Deleted
        } else {
            Lifecycle::Active
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::user::entity::user::Entity",
        from = "Column::UserId",
        to = "crate::domain::user::entity::user::Column::Id"
    )]
    User,
    #[sea_orm(has_one = "super::interpretation::Entity")]
    Interpretation,
}

impl Related<crate::domain::user::entity::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::interpretation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Interpretation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
