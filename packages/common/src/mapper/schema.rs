use serde::{Deserialize, Serialize};

type KeyPath = &'static [&'static str];

/// Which shape of AI output to accept.
///
/// `Nested` is the camelCase shape with a `contact` object (`firstName`,
/// `contact.email`, `workExperience`). `Flat` is the snake_case shape with
/// top-level contact fields (`full_name`, `email`); it is also the shape the
/// client view is rendered in. `Auto` consults nested keys first, then flat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    Nested,
    Flat,
    #[default]
    Auto,
}

impl SchemaVersion {
    pub(crate) fn candidates(self, keys: &Keys) -> impl Iterator<Item = KeyPath> {
        let (nested, flat): (&[KeyPath], &[KeyPath]) = match self {
            Self::Nested => (keys.nested, &[]),
            Self::Flat => (&[], keys.flat),
            Self::Auto => (keys.nested, keys.flat),
        };
        nested.iter().chain(flat).copied()
    }
}

/// Source key precedence for one output field.
pub(crate) struct Keys {
    pub nested: &'static [KeyPath],
    pub flat: &'static [KeyPath],
}

/// Same key in both shapes.
macro_rules! same {
    ($($key:literal),+) => {
        Keys {
            nested: &[&[$($key),+]],
            flat: &[&[$($key),+]],
        }
    };
}

// Profile.
pub(crate) const FIRST_NAME: Keys = Keys {
    nested: &[&["firstName"]],
    flat: &[&["first_name"]],
};
pub(crate) const LAST_NAME: Keys = Keys {
    nested: &[&["lastName"]],
    flat: &[&["last_name"]],
};
pub(crate) const FULL_NAME: Keys = Keys {
    nested: &[&["fullName"]],
    flat: &[&["full_name"], &["name"]],
};
pub(crate) const EMAIL: Keys = Keys {
    nested: &[&["contact", "email"], &["email"]],
    flat: &[&["email"]],
};
pub(crate) const PHONE: Keys = Keys {
    nested: &[&["contact", "phone"], &["phone"]],
    flat: &[&["phone"]],
};
pub(crate) const LINKEDIN: Keys = Keys {
    nested: &[&["contact", "linkedin"], &["linkedin"]],
    flat: &[&["linkedin"]],
};
pub(crate) const GITHUB: Keys = Keys {
    nested: &[&["contact", "github"], &["github"]],
    flat: &[&["github"]],
};
pub(crate) const PORTFOLIO: Keys = Keys {
    nested: &[&["contact", "portfolio"], &["portfolio"]],
    flat: &[&["portfolio"]],
};
pub(crate) const ADDRESS: Keys = Keys {
    nested: &[&["contact", "address"], &["address"]],
    flat: &[&["address"]],
};
pub(crate) const HEADLINE: Keys = same!("headline");
pub(crate) const SUMMARY: Keys = same!("summary");
pub(crate) const COUNTRY: Keys = same!("country");
pub(crate) const CITY: Keys = same!("city");
pub(crate) const CATEGORY: Keys = same!("category");
pub(crate) const STATUS: Keys = same!("status");
pub(crate) const POSTAL_CODE: Keys = Keys {
    nested: &[&["postalCode"]],
    flat: &[&["postal_code"]],
};
pub(crate) const TOTAL_EXPERIENCE: Keys = Keys {
    nested: &[&["totalExperience"]],
    flat: &[&["total_experience"]],
};

// Skills.
pub(crate) const SKILLS: Keys = same!("skills");
pub(crate) const SKILL_NAME: Keys = same!("name");
pub(crate) const SKILL_PROFICIENCY: Keys = same!("proficiency");
pub(crate) const SKILL_YEARS: Keys = Keys {
    nested: &[&["yearsOfExperience"]],
    flat: &[&["years_of_experience"]],
};

// Education.
pub(crate) const EDUCATION: Keys = Keys {
    nested: &[&["education"]],
    flat: &[&["education"], &["educations"]],
};
pub(crate) const EDU_DEGREE: Keys = same!("degree");
pub(crate) const EDU_INSTITUTION: Keys = Keys {
    nested: &[&["school"]],
    flat: &[&["institution"], &["university"]],
};
pub(crate) const EDU_FIELD: Keys = Keys {
    nested: &[&["fieldOfStudy"]],
    flat: &[&["field_of_study"]],
};
pub(crate) const EDU_START_YEAR: Keys = Keys {
    nested: &[&["startYear"]],
    flat: &[&["start_year"]],
};
pub(crate) const EDU_END_YEAR: Keys = Keys {
    nested: &[&["endYear"]],
    flat: &[&["end_year"]],
};

// Projects.
pub(crate) const PROJECTS: Keys = same!("projects");
pub(crate) const PROJECT_TITLE: Keys = Keys {
    nested: &[&["name"]],
    flat: &[&["title"]],
};
pub(crate) const PROJECT_DESCRIPTION: Keys = same!("description");
pub(crate) const PROJECT_TECHNOLOGIES: Keys = same!("technologies");
pub(crate) const PROJECT_URL: Keys = Keys {
    nested: &[&["projectUrl"]],
    flat: &[&["project_url"]],
};

// Dates shared by projects and work experience.
pub(crate) const START_DATE: Keys = Keys {
    nested: &[&["startDate"]],
    flat: &[&["start_date"]],
};
pub(crate) const END_DATE: Keys = Keys {
    nested: &[&["endDate"]],
    flat: &[&["end_date"]],
};

// Work experience.
pub(crate) const EXPERIENCE: Keys = Keys {
    nested: &[&["workExperience"]],
    flat: &[&["work_experience"], &["experience"]],
};
pub(crate) const EXP_ROLE: Keys = Keys {
    nested: &[&["role"]],
    flat: &[&["title"]],
};
pub(crate) const EXP_COMPANY: Keys = same!("company");
pub(crate) const EXP_DURATION: Keys = same!("duration");
pub(crate) const EXP_DESCRIPTION: Keys = Keys {
    nested: &[&["description"]],
    flat: &[&["description"], &["responsibilities"]],
};
pub(crate) const EXP_ACHIEVEMENTS: Keys = same!("achievements");

// Languages.
pub(crate) const LANGUAGES: Keys = same!("languages");
pub(crate) const LANGUAGE_NAME: Keys = Keys {
    nested: &[&["name"]],
    flat: &[&["name"], &["language"]],
};
