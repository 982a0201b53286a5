pub mod config;
pub mod default;
pub mod inference;
pub mod log;
pub mod processed;
