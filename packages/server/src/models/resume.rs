use chrono::{DateTime, Utc};
use common::ProfileFields;
use common::mapper::{ResumeView, to_view};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::resume_file;
use crate::error::{AppError, FieldError};
use crate::services::resume_store::LoadedResume;

pub use super::shared::{Pagination, escape_like};
use super::shared::{MAX_TEXT_LEN, check_len};

/// Maximum length of the free-text summary, in characters.
pub const MAX_SUMMARY_LEN: usize = 10_000;

/// Lifecycle status of a stored resume.
pub const STATUS_CREATED: &str = "created";
pub const STATUS_UPLOADED: &str = "uploaded";
pub const STATUS_PARSED: &str = "parsed";

/// Raw profile text fields collected from the multipart form.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProfileInput {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    pub address: String,
    pub category: String,
    pub total_experience: String,
    pub headline: String,
    pub summary: String,
    pub country: String,
    pub city: String,
    pub postal_code: String,
}

impl ProfileInput {
    /// Store a form field by name. Returns `false` for unknown names.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "first_name" => &mut self.first_name,
            "last_name" => &mut self.last_name,
            "full_name" => &mut self.full_name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "linkedin" => &mut self.linkedin,
            "github" => &mut self.github,
            "portfolio" => &mut self.portfolio,
            "address" => &mut self.address,
            "category" => &mut self.category,
            "total_experience" => &mut self.total_experience,
            "headline" => &mut self.headline,
            "summary" => &mut self.summary,
            "country" => &mut self.country,
            "city" => &mut self.city,
            "postal_code" => &mut self.postal_code,
            _ => return false,
        };
        *slot = value.trim().to_string();
        true
    }

    fn text_fields(&self) -> [(&'static str, &str); 15] {
        [
            ("first_name", self.first_name.as_str()),
            ("last_name", self.last_name.as_str()),
            ("full_name", self.full_name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
            ("linkedin", self.linkedin.as_str()),
            ("github", self.github.as_str()),
            ("portfolio", self.portfolio.as_str()),
            ("address", self.address.as_str()),
            ("category", self.category.as_str()),
            ("headline", self.headline.as_str()),
            ("country", self.country.as_str()),
            ("city", self.city.as_str()),
            ("postal_code", self.postal_code.as_str()),
            ("total_experience", self.total_experience.as_str()),
        ]
    }

    /// Validate the form and produce initial profile fields.
    ///
    /// All violations are reported together.
    pub fn validate(self, has_file: bool) -> Result<ProfileFields, AppError> {
        let mut errors = Vec::new();

        let identified = has_file
            || [&self.first_name, &self.last_name, &self.full_name, &self.email]
                .iter()
                .any(|v| !v.is_empty());
        if !identified {
            errors.push(FieldError::new(
                "file",
                "Provide a file, a name, or an email address",
            ));
        }

        if !self.email.is_empty() && !is_plausible_email(&self.email) {
            errors.push(FieldError::new(
                "email",
                "Email must contain exactly one '@' with text on both sides",
            ));
        }

        let total_experience = if self.total_experience.is_empty() {
            0
        } else {
            match self.total_experience.parse::<i32>() {
                Ok(years) if years >= 0 => years,
                _ => {
                    errors.push(FieldError::new(
                        "total_experience",
                        "Must be a non-negative whole number",
                    ));
                    0
                }
            }
        };

        for (field, value) in self.text_fields() {
            check_len(&mut errors, field, value, MAX_TEXT_LEN);
        }
        check_len(&mut errors, "summary", &self.summary, MAX_SUMMARY_LEN);

        if !errors.is_empty() {
            return Err(AppError::InvalidFields(errors));
        }

        let (first_name, last_name) =
            if self.first_name.is_empty() && self.last_name.is_empty() {
                split_full_name(&self.full_name)
            } else {
                (self.first_name, self.last_name)
            };

        Ok(ProfileFields {
            first_name,
            last_name,
            email: self.email,
            phone: self.phone,
            linkedin: self.linkedin,
            github: self.github,
            portfolio: self.portfolio,
            address: self.address,
            headline: self.headline,
            summary: self.summary,
            country: self.country,
            city: self.city,
            postal_code: self.postal_code,
            category: self.category,
            total_experience,
            status: STATUS_CREATED.to_string(),
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

fn split_full_name(full: &str) -> (String, String) {
    let mut parts = full.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    (first, parts.collect::<Vec<_>>().join(" "))
}

/// Metadata of the stored source document.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ResumeFileInfo {
    pub filename: String,
    pub content_type: Option<String>,
    pub size: i64,
    /// Hex SHA-256 of the stored bytes.
    pub content_hash: String,
}

impl From<resume_file::Model> for ResumeFileInfo {
    fn from(m: resume_file::Model) -> Self {
        Self {
            filename: m.filename,
            content_type: m.content_type,
            size: m.size,
            content_hash: m.content_hash,
        }
    }
}

/// A persisted resume in client shape.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ResumeResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub resume: ResumeView,
    pub file: Option<ResumeFileInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LoadedResume> for ResumeResponse {
    fn from(loaded: LoadedResume) -> Self {
        Self {
            id: loaded.row.id,
            resume: to_view(&loaded.parsed),
            file: loaded.file.map(ResumeFileInfo::from),
            created_at: loaded.row.created_at,
            updated_at: loaded.row.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateResumeResponse {
    pub id: Uuid,
    #[schema(example = "Resume uploaded successfully")]
    pub message: String,
    pub data: ResumeResponse,
}

#[derive(Debug, Serialize, Deserialize, FromQueryResult, utoipa::ToSchema)]
pub struct ResumeListItem {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub headline: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ResumeListResponse {
    pub data: Vec<ResumeListItem>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResumeListQuery {
    /// Page number, starting at 1.
    pub page: Option<u64>,
    /// Items per page (1-100, default 20).
    pub per_page: Option<u64>,
    /// Case-insensitive match on first name, last name or email.
    pub search: Option<String>,
}
