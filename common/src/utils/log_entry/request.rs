use thiserror::Error;

#[derive(Error, Debug)]
pub enum RequestEntry {
    #[error("Received {0} ({1} bytes)")]
    Received(String, usize),
    #[error("Detected {1} object(s) in {0}")]
    Detected(String, usize),
    #[error("Stored annotated image at {0}")]
    Stored(String),
    #[error("Returned annotated image inline ({0} bytes)")]
    Inlined(usize),
    #[error("Rejected retrieval of {0}")]
    RetrievalRejected(String),
}

impl From<RequestEntry> for String {
    #[inline(always)]
    fn from(value: RequestEntry) -> Self {
        value.to_string()
    }
}
