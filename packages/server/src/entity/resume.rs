use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A candidate profile. Text columns hold "" when nothing is known.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "resume")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    pub address: String,
    pub headline: String,
    #[sea_orm(column_type = "Text")]
    pub summary: String,
    pub country: String,
    pub city: String,
    pub postal_code: String,
    pub category: String,
    pub total_experience: i32,
    /// One of: created, uploaded, parsed.
    pub status: String,

    #[sea_orm(has_many)]
    pub skills: HasMany<super::skill::Entity>,
    #[sea_orm(has_many)]
    pub educations: HasMany<super::education::Entity>,
    #[sea_orm(has_many)]
    pub projects: HasMany<super::project::Entity>,
    #[sea_orm(has_many)]
    pub work_experiences: HasMany<super::work_experience::Entity>,
    #[sea_orm(has_many)]
    pub languages: HasMany<super::language::Entity>,
    #[sea_orm(has_one)]
    pub file: HasOne<super::resume_file::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
