use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Comma-joined technology list.
    #[sea_orm(column_type = "Text")]
    pub technologies: String,
    pub start_date: String,
    pub end_date: String,
    pub project_url: String,

    pub resume_id: Uuid,
    #[sea_orm(belongs_to, from = "resume_id", to = "id", on_delete = "Cascade")]
    pub resume: HasOne<super::resume::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
