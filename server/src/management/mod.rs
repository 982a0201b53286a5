pub mod annotator;
pub mod detector;
pub mod pipeline;
pub mod result_repository;
pub mod server;
pub mod utils;
