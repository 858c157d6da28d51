use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Dream-symbol dictionary, grown opportunistically from model-extracted
/// tags. Analytics-only: the pipeline writes it but never reads it back.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "symbol_dictionary")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub symbol_word: String,
    pub meaning: String,
    pub cultural_context: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
