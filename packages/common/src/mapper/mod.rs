//! Field mapping between AI output and normalized resumes.
//!
//! [`map_resume`] reads whichever shape the model produced; [`to_view`] renders
//! a resume back out in the flat client shape.

mod forward;
mod schema;
mod view;

pub use forward::map_resume;
pub use schema::SchemaVersion;
pub use view::{
    EducationView, LanguageView, ProjectView, ResumeView, SkillView, WorkExperienceView, to_view,
};
