use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The uploaded source document of a resume. Bytes live in the document store.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "resume_file")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub resume_id: Uuid,
    #[sea_orm(belongs_to, from = "resume_id", to = "id", on_delete = "Cascade")]
    pub resume: HasOne<super::resume::Entity>,

    /// Hex SHA-256 of the stored bytes.
    pub content_hash: String,

    /// Original upload filename.
    pub filename: String,

    /// MIME content type.
    pub content_type: Option<String>,

    pub size: i64,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
