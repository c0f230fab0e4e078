mod ai;
mod bill;
mod common;
mod resume;
