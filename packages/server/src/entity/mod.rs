pub mod bill;
pub mod education;
pub mod language;
pub mod project;
pub mod resume;
pub mod resume_file;
pub mod skill;
pub mod work_experience;
