use crate::utils::logging::*;
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH: &str = "./server.toml";

#[derive(Debug, Deserialize)]
struct ConfigTable {
    #[serde(rename = "Config")]
    config: Config,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub http_server_bind_address: String, //host
    pub http_server_bind_port: u16, //port
    pub debug: bool,
    pub bind_retry_duration: u64, //seconds
    pub upload_root: PathBuf, //path
    pub keep_original_upload: bool,
    pub max_upload_size: usize, //bytes
    pub output_format: OutputFormat,
    pub model_path: PathBuf, //path
    #[serde(default)]
    pub labels_path: Option<PathBuf>, //path, one label per line
    pub input_size: u32, //pixels
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub intra_threads: usize,
    #[serde(default)]
    pub font_path: Option<PathBuf>, //path
    pub font_size: f32, //pixels
    pub border_width: u32, //pixels
    pub border_color: [u8; 3], //RGB
    pub text_color: [u8; 3], //RGB
    pub log_capacity: usize, //entries
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_server_bind_address: "127.0.0.1".to_string(),
            http_server_bind_port: 5000,
            debug: false,
            bind_retry_duration: 10,
            upload_root: PathBuf::from("uploads"),
            keep_original_upload: true,
            max_upload_size: 16 * 1024 * 1024,
            output_format: OutputFormat::Jpeg,
            model_path: PathBuf::from("models/yolov5s.onnx"),
            labels_path: None,
            input_size: 640,
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
            intra_threads: 4,
            font_path: None,
            font_size: 16.0,
            border_width: 2,
            border_color: [255, 0, 0],
            text_color: [255, 255, 255],
            log_capacity: 10000,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SystemEntry> {
        let toml_string = fs::read_to_string(path)
            .map_err(SystemEntry::ConfigNotFound)?;
        Self::from_toml(&toml_string)
    }

    pub fn from_toml(toml_string: &str) -> Result<Self, SystemEntry> {
        let config_table = toml::from_str::<ConfigTable>(toml_string)
            .map_err(SystemEntry::ConfigParseError)?;
        let config = config_table.config;
        Self::validate(&config)?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_server_bind_address, self.http_server_bind_port)
    }

    pub fn validate(config: &Config) -> Result<(), SystemEntry> {
        if config.http_server_bind_address.is_empty() {
            return Err(SystemEntry::InvalidConfig("http_server_bind_address is empty".to_string()));
        }
        if !Config::validate_second(config.bind_retry_duration) {
            return Err(SystemEntry::InvalidConfig("bind_retry_duration must not exceed 3600 seconds".to_string()));
        }
        if config.upload_root.as_os_str().is_empty() {
            return Err(SystemEntry::InvalidConfig("upload_root is empty".to_string()));
        }
        if config.max_upload_size == 0 {
            return Err(SystemEntry::InvalidConfig("max_upload_size must be positive".to_string()));
        }
        if config.input_size == 0 || config.input_size % 32 != 0 {
            return Err(SystemEntry::InvalidConfig("input_size must be a positive multiple of 32".to_string()));
        }
        if !Config::validate_probability(config.confidence_threshold) {
            return Err(SystemEntry::InvalidConfig("confidence_threshold must be within [0, 1]".to_string()));
        }
        if !Config::validate_probability(config.iou_threshold) {
            return Err(SystemEntry::InvalidConfig("iou_threshold must be within [0, 1]".to_string()));
        }
        if config.intra_threads == 0 {
            return Err(SystemEntry::InvalidConfig("intra_threads must be positive".to_string()));
        }
        if !Config::validate_font_size(config.font_size) {
            return Err(SystemEntry::InvalidConfig("font_size must be positive".to_string()));
        }
        if !Config::validate_border_width(config.border_width) {
            return Err(SystemEntry::InvalidConfig("border_width must be positive".to_string()));
        }
        if config.log_capacity == 0 {
            return Err(SystemEntry::InvalidConfig("log_capacity must be positive".to_string()));
        }
        Ok(())
    }

    fn validate_second(second: u64) -> bool {
        second <= 3600
    }

    fn validate_probability(value: f32) -> bool {
        (0.0..=1.0).contains(&value)
    }

    fn validate_border_width(width: u32) -> bool {
        width > 0_u32
    }

    fn validate_font_size(size: f32) -> bool {
        size > 0_f32
    }
}
