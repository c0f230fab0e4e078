pub mod pipeline;
pub mod resume_store;
