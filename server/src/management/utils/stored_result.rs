use serde::Serialize;
use std::path::PathBuf;

pub const RETRIEVAL_PREFIX: &str = "/processed/uploads";

#[derive(Serialize, Debug, Clone)]
pub struct StoredResult {
    pub directory: String,
    pub filename: String,
    pub filepath: PathBuf,
}

impl StoredResult {
    pub fn retrieval_path(&self) -> String {
        format!("{}/{}/{}", RETRIEVAL_PREFIX, self.directory, self.filename)
    }
}
