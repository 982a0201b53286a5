use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new<T: Into<String>>(error: T) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UploadResponse {
    pub processed_image: String,
}

impl UploadResponse {
    pub fn new(processed_image: String) -> Self {
        Self {
            processed_image,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PredictResponse {
    pub image: String,
    pub message: String,
}

impl PredictResponse {
    pub fn new(image: String) -> Self {
        Self {
            image,
            message: "Success".to_string(),
        }
    }
}
