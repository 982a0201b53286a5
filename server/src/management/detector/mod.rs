pub mod coco_labels;
pub mod onnx_detector;
pub mod yolo_output;

use crate::utils::logging::InferenceEntry;
use common::detection::detection::Detection;
use image::RgbImage;

pub trait Detector: Send + Sync {
    fn name(&self) -> String;

    fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>, InferenceEntry>;
}
