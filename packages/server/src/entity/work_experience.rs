use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_experience")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub role: String,
    pub company: String,
    pub start_date: String,
    /// NULL when unknown or open-ended; `open_ended` tells them apart.
    pub end_date: Option<String>,
    pub open_ended: bool,
    pub duration: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Achievements joined with ", ".
    #[sea_orm(column_type = "Text")]
    pub achievements: String,

    pub resume_id: Uuid,
    #[sea_orm(belongs_to, from = "resume_id", to = "id", on_delete = "Cascade")]
    pub resume: HasOne<super::resume::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
