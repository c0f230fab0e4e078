pub mod ai;
pub mod config;
pub mod extract;
pub mod json;
pub mod mapper;
pub mod proficiency;
pub mod resume;
pub mod retry;
pub mod storage;

pub use mapper::{SchemaVersion, map_resume};
pub use proficiency::Proficiency;
pub use resume::{
    EducationRecord, EndDate, Language, ParsedResume, ProfileFields, Project, Skill,
    WorkExperience,
};
