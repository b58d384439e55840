pub mod annual;
pub mod schedule;
