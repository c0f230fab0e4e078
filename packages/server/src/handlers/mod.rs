pub mod bill;
pub mod resume;
