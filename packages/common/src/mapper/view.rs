//! Client-facing rendering of a normalized resume.
//!
//! The view uses the flat snake_case shape, so feeding it back through
//! [`map_resume`](super::map_resume) reproduces the resume it was built from,
//! except where a joined achievement contains the list delimiter itself.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::json::split_list;
use crate::proficiency::Proficiency;
use crate::resume::{
    EducationRecord, Language, ParsedResume, Project, Skill, WorkExperience,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResumeView {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    pub address: String,
    pub category: String,
    pub total_experience: i32,
    pub headline: String,
    pub summary: String,
    pub country: String,
    pub city: String,
    pub postal_code: String,
    pub status: String,
    pub skills: Vec<SkillView>,
    pub education: Vec<EducationView>,
    pub projects: Vec<ProjectView>,
    pub work_experience: Vec<WorkExperienceView>,
    pub languages: Vec<LanguageView>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SkillView {
    pub name: String,
    pub proficiency: Proficiency,
    pub years_of_experience: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EducationView {
    pub degree: String,
    pub institution: String,
    pub field_of_study: String,
    pub start_year: i32,
    pub end_year: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProjectView {
    pub title: String,
    pub technologies: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub project_url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WorkExperienceView {
    pub title: String,
    pub company: String,
    pub start_date: String,
    /// `"Present"` for ongoing positions, `null` when unknown.
    pub end_date: Option<String>,
    pub duration: String,
    pub description: String,
    pub achievements: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LanguageView {
    pub name: String,
}

/// Render a normalized resume for clients.
pub fn to_view(resume: &ParsedResume) -> ResumeView {
    ResumeView::from(resume)
}

impl From<&ParsedResume> for ResumeView {
    fn from(resume: &ParsedResume) -> Self {
        let p = &resume.profile;
        Self {
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
            email: p.email.clone(),
            phone: p.phone.clone(),
            linkedin: p.linkedin.clone(),
            github: p.github.clone(),
            portfolio: p.portfolio.clone(),
            address: p.address.clone(),
            category: p.category.clone(),
            total_experience: p.total_experience,
            headline: p.headline.clone(),
            summary: p.summary.clone(),
            country: p.country.clone(),
            city: p.city.clone(),
            postal_code: p.postal_code.clone(),
            status: p.status.clone(),
            skills: resume.skills.iter().map(SkillView::from).collect(),
            education: resume.education.iter().map(EducationView::from).collect(),
            projects: resume.projects.iter().map(ProjectView::from).collect(),
            work_experience: resume.experience.iter().map(WorkExperienceView::from).collect(),
            languages: resume.languages.iter().map(LanguageView::from).collect(),
        }
    }
}

impl From<&Skill> for SkillView {
    fn from(s: &Skill) -> Self {
        Self {
            name: s.name.clone(),
            proficiency: s.proficiency,
            years_of_experience: s.years_of_experience,
        }
    }
}

impl From<&EducationRecord> for EducationView {
    fn from(e: &EducationRecord) -> Self {
        Self {
            degree: e.degree.clone(),
            institution: e.institution.clone(),
            field_of_study: e.field_of_study.clone(),
            start_year: e.start_year,
            end_year: e.end_year,
        }
    }
}

impl From<&Project> for ProjectView {
    fn from(p: &Project) -> Self {
        Self {
            title: p.title.clone(),
            technologies: p.technologies.clone(),
            description: p.description.clone(),
            start_date: p.start_date.clone(),
            end_date: p.end_date.clone(),
            project_url: p.project_url.clone(),
        }
    }
}

impl From<&WorkExperience> for WorkExperienceView {
    fn from(w: &WorkExperience) -> Self {
        Self {
            title: w.role.clone(),
            company: w.company.clone(),
            start_date: w.start_date.clone(),
            end_date: w.end_date.display(),
            duration: w.duration.clone(),
            description: w.responsibilities.clone(),
            achievements: split_list(&w.achievements),
        }
    }
}

impl From<&Language> for LanguageView {
    fn from(l: &Language) -> Self {
        Self {
            name: l.name.clone(),
        }
    }
}
