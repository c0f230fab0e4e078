//! Normalized resume records.
//!
//! Text fields use the empty string for "not provided"; numeric fields use 0.
//! Child lists are owned by the resume they were extracted from.

use serde::{Deserialize, Serialize};

use crate::proficiency::Proficiency;

/// Identity and summary fields of a resume profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    pub address: String,
    pub headline: String,
    pub summary: String,
    pub country: String,
    pub city: String,
    pub postal_code: String,
    pub category: String,
    pub total_experience: i32,
    pub status: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub proficiency: Proficiency,
    pub years_of_experience: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationRecord {
    pub degree: String,
    pub institution: String,
    pub field_of_study: String,
    pub start_year: i32,
    pub end_year: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    /// Comma-joined technology list.
    pub technologies: String,
    pub start_date: String,
    pub end_date: String,
    pub project_url: String,
}

/// End of a work experience entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "date", rename_all = "snake_case")]
pub enum EndDate {
    /// No end date was given.
    #[default]
    Unknown,
    /// The position is ongoing ("Present").
    OpenEnded,
    On(String),
}

impl EndDate {
    /// Literal used in source documents and client output for ongoing positions.
    pub const PRESENT: &'static str = "Present";

    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            Self::Unknown
        } else if raw.eq_ignore_ascii_case(Self::PRESENT) {
            Self::OpenEnded
        } else {
            Self::On(raw.to_string())
        }
    }

    /// Client rendering: `"Present"`, the date, or nothing.
    pub fn display(&self) -> Option<String> {
        match self {
            Self::Unknown => None,
            Self::OpenEnded => Some(Self::PRESENT.to_string()),
            Self::On(date) => Some(date.clone()),
        }
    }

    pub fn is_open_ended(&self) -> bool {
        matches!(self, Self::OpenEnded)
    }

    /// The concrete date, if one is known.
    pub fn date(&self) -> Option<&str> {
        match self {
            Self::On(date) => Some(date),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub role: String,
    pub company: String,
    pub start_date: String,
    pub end_date: EndDate,
    pub duration: String,
    pub responsibilities: String,
    /// Achievements joined with `", "`.
    pub achievements: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
}

/// A fully normalized resume: profile fields plus owned child records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub profile: ProfileFields,
    pub skills: Vec<Skill>,
    pub education: Vec<EducationRecord>,
    pub projects: Vec<Project>,
    pub experience: Vec<WorkExperience>,
    pub languages: Vec<Language>,
}

impl ParsedResume {
    /// True when no child records were extracted.
    pub fn has_no_children(&self) -> bool {
        self.skills.is_empty()
            && self.education.is_empty()
            && self.projects.is_empty()
            && self.experience.is_empty()
            && self.languages.is_empty()
    }

    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.has_no_children() && self.profile == ProfileFields::default()
    }
}
