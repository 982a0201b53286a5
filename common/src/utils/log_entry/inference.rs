use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceEntry {
    #[error("Model file {0} not found")]
    ModelNotFound(String),
    #[error("Failed to load model: {0}")]
    LoadModelError(String),
    #[error("Failed to read label file {0}: {1}")]
    ReadLabelError(String, String),
    #[error("Label file {0} contains no labels")]
    EmptyLabelFile(String),
    #[error("Failed to read font file {0}: {1}")]
    ReadFontError(String, String),
    #[error("Unable to parse font data from {0}")]
    ParseFontError(String),
    #[error("Failed to build input tensor: {0}")]
    InputTensorError(String),
    #[error("Model inference failed: {0}")]
    RunError(String),
    #[error("Failed to extract output tensor: {0}")]
    OutputTensorError(String),
    #[error("Unexpected output shape {0:?}")]
    UnexpectedOutputShape(Vec<usize>),
    #[error("Model session is unavailable")]
    SessionPoisoned,
}

impl From<InferenceEntry> for String {
    #[inline(always)]
    fn from(value: InferenceEntry) -> Self {
        value.to_string()
    }
}
