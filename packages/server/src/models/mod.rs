pub mod bill;
pub mod resume;
pub mod shared;
