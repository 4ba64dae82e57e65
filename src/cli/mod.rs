pub mod grocery;
pub mod import;
pub mod plan;
