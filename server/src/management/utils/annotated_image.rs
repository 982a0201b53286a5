use crate::utils::config::OutputFormat;

#[derive(Debug, Clone)]
pub struct AnnotatedImage {
    pub data: Vec<u8>,
    pub format: OutputFormat,
    pub detections: usize,
}

impl AnnotatedImage {
    pub fn new(data: Vec<u8>, format: OutputFormat, detections: usize) -> Self {
        Self {
            data,
            format,
            detections,
        }
    }
}
