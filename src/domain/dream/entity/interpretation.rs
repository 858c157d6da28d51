use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Generated interpretation of a dream.
///
/// `dream_id` carries a unique index (see schema sync), so the 1:1
/// relation is a database constraint rather than an array-index
/// convention.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "interpretations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub dream_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub analysis_text: String,
    pub lucky_numbers: String,
    /// Mental-health research metrics, each clamped to [0, 10].
    pub stress_score: i32,
    pub anxiety_score: i32,
    pub happiness_score: i32,
    /// End-user star rating (1-5).
    pub rating: Option<i32>,
    /// Set when an admin manually overrides the analysis.
    pub researcher_note: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::dream::Entity",
        from = "Column::DreamId",
        to = "super::dream::Column::Id"
    )]
    Dream,
}

impl Related<super::dream::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dream.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
