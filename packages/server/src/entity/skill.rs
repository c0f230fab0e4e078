use common::Proficiency;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "skill")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub proficiency: Proficiency,
    pub years_of_experience: i32,

    pub resume_id: Uuid,
    #[sea_orm(belongs_to, from = "resume_id", to = "id", on_delete = "Cascade")]
    pub resume: HasOne<super::resume::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
