use crate::utils::logging::InferenceEntry;
use crate::web::utils::response::ErrorResponse;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No image file found")]
    MissingFile,
    #[error("No selected file")]
    EmptyFilename,
    #[error("Empty image file")]
    EmptyFile,
    #[error("Image file too large")]
    FileTooLarge,
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
    #[error("Unable to decode image: {0}")]
    Decode(String),
    #[error("Detection failed: {0}")]
    Inference(InferenceEntry),
    #[error("Unable to encode annotated image: {0}")]
    Encode(String),
    #[error("Unable to store annotated image: {0}")]
    Persistence(String),
    #[error("Processed image {0} not found after write")]
    ProcessedImageNotFound(String),
    #[error("Processing task panicked: {0}")]
    TaskPanicked(String),
}

impl UploadError {
    pub fn is_validation(&self) -> bool {
        matches!(self, UploadError::MissingFile | UploadError::EmptyFilename | UploadError::EmptyFile
            | UploadError::FileTooLarge | UploadError::InvalidPayload(_))
    }

    pub fn public_message(&self) -> String {
        match self {
            UploadError::InvalidPayload(_) => "Invalid payload".to_string(),
            UploadError::ProcessedImageNotFound(_) => "Processed image not found".to_string(),
            err if err.is_validation() => err.to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl From<InferenceEntry> for UploadError {
    fn from(value: InferenceEntry) -> Self {
        UploadError::Inference(value)
    }
}

impl From<UploadError> for String {
    #[inline(always)]
    fn from(value: UploadError) -> Self {
        value.to_string()
    }
}

impl ResponseError for UploadError {
    fn status_code(&self) -> StatusCode {
        if self.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.public_message()))
    }
}
