#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub data: Vec<u8>,
}

impl UploadedImage {
    pub fn new(filename: String, data: Vec<u8>) -> Self {
        Self {
            filename,
            data,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}
