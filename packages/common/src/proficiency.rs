#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};

/// Self-reported skill level.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
#[serde(rename_all = "lowercase")]
pub enum Proficiency {
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "beginner"))]
    Beginner,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "intermediate"))]
    Intermediate,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "advanced"))]
    Advanced,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "expert"))]
    Expert,
}

impl Proficiency {
    pub const ALL: &'static [Proficiency] = &[
        Self::Beginner,
        Self::Intermediate,
        Self::Advanced,
        Self::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }

    /// Case-insensitive match against the four levels. Anything else is `Beginner`.
    pub fn normalize(raw: &str) -> Self {
        let raw = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(raw))
            .unwrap_or_default()
    }
}
