use std::io::Error as IoError;
use thiserror::Error;
use toml::de::Error as TomlError;

#[derive(Error, Debug)]
pub enum SystemEntry {
    #[error("Online now")]
    Online,
    #[error("Initializing")]
    Initializing,
    #[error("Initialization completed")]
    InitializeComplete,
    #[error("Termination completed")]
    TerminateComplete,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Configuration not found: {0}")]
    ConfigNotFound(IoError),
    #[error("Unable to parse configuration: {0}")]
    ConfigParseError(TomlError),
    #[error("Detector ready: {0}")]
    DetectorReady(String),
    #[error("Annotator ready, label font: {0}")]
    AnnotatorReady(String),
    #[error("Web service ready on {0}")]
    WebReady(String),
    #[error("Web service panic: {0}")]
    WebPanic(IoError),
}

impl From<SystemEntry> for String {
    #[inline(always)]
    fn from(value: SystemEntry) -> Self {
        value.to_string()
    }
}
