use crate::management::detector::Detector;
use crate::management::detector::coco_labels::coco_labels;
use crate::management::detector::yolo_output::{self, DecodeParameters};
use crate::utils::config::Config;
use crate::utils::logging::InferenceEntry;
use common::detection::detection::Detection;
use image::RgbImage;
use image::imageops::{self, FilterType};
use ndarray::Array4;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct OnnxDetector {
    session: Mutex<Session>,
    model_path: PathBuf,
    input_name: String,
    input_size: u32,
    labels: Vec<String>,
    confidence_threshold: f32,
    iou_threshold: f32,
}

impl OnnxDetector {
    pub fn new(config: &Config) -> Result<Self, InferenceEntry> {
        let model_path = config.model_path.clone();
        if !model_path.is_file() {
            return Err(InferenceEntry::ModelNotFound(model_path.display().to_string()));
        }
        let labels = Self::load_labels(config.labels_path.as_deref())?;
        let session = Session::builder()
            .map_err(|err| InferenceEntry::LoadModelError(err.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|err| InferenceEntry::LoadModelError(err.to_string()))?
            .with_intra_threads(config.intra_threads)
            .map_err(|err| InferenceEntry::LoadModelError(err.to_string()))?
            .commit_from_file(&model_path)
            .map_err(|err| InferenceEntry::LoadModelError(format!("{}: {}", model_path.display(), err)))?;
        let input_name = session
            .inputs()
            .first()
            .map(|input| input.name().to_string())
            .unwrap_or_else(|| "images".to_string());
        Ok(Self {
            session: Mutex::new(session),
            model_path,
            input_name,
            input_size: config.input_size,
            labels,
            confidence_threshold: config.confidence_threshold,
            iou_threshold: config.iou_threshold,
        })
    }

    pub fn load_labels(labels_path: Option<&Path>) -> Result<Vec<String>, InferenceEntry> {
        let labels_path = match labels_path {
            Some(labels_path) => labels_path,
            None => return Ok(coco_labels()),
        };
        let content = fs::read_to_string(labels_path)
            .map_err(|err| InferenceEntry::ReadLabelError(labels_path.display().to_string(), err.to_string()))?;
        let labels: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if labels.is_empty() {
            return Err(InferenceEntry::EmptyLabelFile(labels_path.display().to_string()));
        }
        Ok(labels)
    }

    pub fn preprocess(image: &RgbImage, input_size: u32) -> Array4<f32> {
        let resized = imageops::resize(image, input_size, input_size, FilterType::Triangle);
        let size = input_size as usize;
        let mut tensor = Array4::<f32>::zeros((1, 3, size, size));
        for (x, y, pixel) in resized.enumerate_pixels() {
            for channel in 0..3 {
                tensor[[0, channel, y as usize, x as usize]] = pixel[channel] as f32 / 255.0;
            }
        }
        tensor
    }
}

impl Detector for OnnxDetector {
    fn name(&self) -> String {
        format!("{} ({} labels, input {}x{})", self.model_path.display(), self.labels.len(), self.input_size, self.input_size)
    }

    fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>, InferenceEntry> {
        let input = Self::preprocess(image, self.input_size);
        let input_value = Value::from_array(input)
            .map_err(|err| InferenceEntry::InputTensorError(err.to_string()))?;
        let parameters = DecodeParameters {
            confidence_threshold: self.confidence_threshold,
            iou_threshold: self.iou_threshold,
            input_size: self.input_size,
            image_width: image.width(),
            image_height: image.height(),
        };

        let mut session = self.session.lock()
            .map_err(|_| InferenceEntry::SessionPoisoned)?;
        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .map_err(|err| InferenceEntry::RunError(err.to_string()))?;
        let output = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|err| InferenceEntry::OutputTensorError(err.to_string()))?;
        yolo_output::decode(output.view(), &self.labels, &parameters)
    }
}
