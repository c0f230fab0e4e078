use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "education")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub degree: String,
    pub institution: String,
    pub field_of_study: String,
    pub start_year: i32, // 0 when unknown
    pub end_year: i32,

    pub resume_id: Uuid,
    #[sea_orm(belongs_to, from = "resume_id", to = "id", on_delete = "Cascade")]
    pub resume: HasOne<super::resume::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
