use serde_json::Value;

use super::schema::{self as keys, Keys, SchemaVersion};
use crate::json::Lookup;
use crate::proficiency::Proficiency;
use crate::resume::{
    EducationRecord, EndDate, Language, ParsedResume, ProfileFields, Project, Skill,
    WorkExperience,
};

/// Map arbitrary AI output into a normalized resume.
///
/// Never fails: absent or mistyped fields become empty strings or zero, and
/// malformed list elements become records with every field empty.
pub fn map_resume(source: &Value, version: SchemaVersion) -> ParsedResume {
    let root = Lookup::new(source);
    let m = Mapper { version };

    ParsedResume {
        profile: m.profile(root),
        skills: m.list(root, &keys::SKILLS).map(|e| m.skill(e)).collect(),
        education: m.list(root, &keys::EDUCATION).map(|e| m.education(e)).collect(),
        projects: m.list(root, &keys::PROJECTS).map(|e| m.project(e)).collect(),
        experience: m.list(root, &keys::EXPERIENCE).map(|e| m.experience(e)).collect(),
        languages: m.list(root, &keys::LANGUAGES).map(|e| m.language(e)).collect(),
    }
}

struct Mapper {
    version: SchemaVersion,
}

impl Mapper {
    fn field<'a>(&self, node: Lookup<'a>, keys: &Keys) -> Lookup<'a> {
        node.first_present(self.version.candidates(keys))
    }

    fn text(&self, node: Lookup<'_>, keys: &Keys) -> String {
        self.field(node, keys).text().trim().to_string()
    }

    fn count(&self, node: Lookup<'_>, keys: &Keys) -> i32 {
        self.field(node, keys).count()
    }

    fn list<'a>(&self, node: Lookup<'a>, keys: &Keys) -> impl Iterator<Item = Lookup<'a>> + use<'a> {
        self.field(node, keys).items()
    }

    fn profile(&self, root: Lookup<'_>) -> ProfileFields {
        let (first_name, last_name) = self.names(root);
        ProfileFields {
            first_name,
            last_name,
            email: self.text(root, &keys::EMAIL),
            phone: self.text(root, &keys::PHONE),
            linkedin: self.text(root, &keys::LINKEDIN),
            github: self.text(root, &keys::GITHUB),
            portfolio: self.text(root, &keys::PORTFOLIO),
            address: self.text(root, &keys::ADDRESS),
            headline: self.text(root, &keys::HEADLINE),
            summary: self.text(root, &keys::SUMMARY),
            country: self.text(root, &keys::COUNTRY),
            city: self.text(root, &keys::CITY),
            postal_code: self.text(root, &keys::POSTAL_CODE),
            category: self.text(root, &keys::CATEGORY),
            total_experience: self.count(root, &keys::TOTAL_EXPERIENCE),
            status: self.text(root, &keys::STATUS),
        }
    }

    /// First and last name, falling back to splitting a single full-name field.
    fn names(&self, root: Lookup<'_>) -> (String, String) {
        let first = self.text(root, &keys::FIRST_NAME);
        let last = self.text(root, &keys::LAST_NAME);
        if !first.is_empty() || !last.is_empty() {
            return (first, last);
        }

        split_full_name(&self.text(root, &keys::FULL_NAME))
    }

    fn skill(&self, e: Lookup<'_>) -> Skill {
        Skill {
            name: self.text(e, &keys::SKILL_NAME),
            proficiency: Proficiency::normalize(&self.text(e, &keys::SKILL_PROFICIENCY)),
            years_of_experience: self.count(e, &keys::SKILL_YEARS),
        }
    }

    fn education(&self, e: Lookup<'_>) -> EducationRecord {
        EducationRecord {
            degree: self.text(e, &keys::EDU_DEGREE),
            institution: self.text(e, &keys::EDU_INSTITUTION),
            field_of_study: self.text(e, &keys::EDU_FIELD),
            start_year: self.count(e, &keys::EDU_START_YEAR),
            end_year: self.count(e, &keys::EDU_END_YEAR),
        }
    }

    fn project(&self, e: Lookup<'_>) -> Project {
        Project {
            title: self.text(e, &keys::PROJECT_TITLE),
            description: self.text(e, &keys::PROJECT_DESCRIPTION),
            technologies: self.field(e, &keys::PROJECT_TECHNOLOGIES).joined(),
            start_date: self.text(e, &keys::START_DATE),
            end_date: self.text(e, &keys::END_DATE),
            project_url: self.text(e, &keys::PROJECT_URL),
        }
    }

    fn experience(&self, e: Lookup<'_>) -> WorkExperience {
        WorkExperience {
            role: self.text(e, &keys::EXP_ROLE),
            company: self.text(e, &keys::EXP_COMPANY),
            start_date: self.text(e, &keys::START_DATE),
            end_date: EndDate::parse(&self.text(e, &keys::END_DATE)),
            duration: self.text(e, &keys::EXP_DURATION),
            responsibilities: self.text(e, &keys::EXP_DESCRIPTION),
            achievements: self.field(e, &keys::EXP_ACHIEVEMENTS).joined(),
        }
    }

    /// Languages arrive either as bare strings or as `{name}` objects.
    fn language(&self, e: Lookup<'_>) -> Language {
        let name = if e.is_object() {
            self.text(e, &keys::LANGUAGE_NAME)
        } else {
            e.text().trim().to_string()
        };
        Language { name }
    }
}

fn split_full_name(full: &str) -> (String, String) {
    let mut parts = full.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.collect::<Vec<_>>().join(" ");
    (first, last)
}
