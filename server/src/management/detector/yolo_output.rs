use crate::utils::logging::InferenceEntry;
use common::detection::bounding_box::BoundingBox;
use common::detection::detection::Detection;
use ndarray::ArrayViewD;
use std::cmp::Ordering;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputLayout {
    // [1, N, 5 + C], objectness followed by class scores
    YoloV5,
    // [1, 4 + C, N], class scores without objectness
    YoloV8,
}

#[derive(Debug, Copy, Clone)]
pub struct DecodeParameters {
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub input_size: u32,
    pub image_width: u32,
    pub image_height: u32,
}

impl DecodeParameters {
    fn scale(&self) -> (f32, f32) {
        let input_size = self.input_size as f32;
        (self.image_width as f32 / input_size, self.image_height as f32 / input_size)
    }
}

pub fn detect_layout(shape: &[usize], class_count: usize) -> Result<OutputLayout, InferenceEntry> {
    if shape.len() != 3 || shape[0] != 1 {
        return Err(InferenceEntry::UnexpectedOutputShape(shape.to_vec()));
    }
    if shape[2] == class_count + 5 {
        Ok(OutputLayout::YoloV5)
    } else if shape[1] == class_count + 4 {
        Ok(OutputLayout::YoloV8)
    } else {
        Err(InferenceEntry::UnexpectedOutputShape(shape.to_vec()))
    }
}

pub fn decode(output: ArrayViewD<f32>, labels: &[String], parameters: &DecodeParameters) -> Result<Vec<Detection>, InferenceEntry> {
    let shape = output.shape().to_vec();
    let layout = detect_layout(&shape, labels.len())?;
    let (candidates, class_offset) = match layout {
        OutputLayout::YoloV5 => (shape[1], 5_usize),
        OutputLayout::YoloV8 => (shape[2], 4_usize),
    };
    let value = |candidate: usize, attribute: usize| -> f32 {
        match layout {
            OutputLayout::YoloV5 => output[[0, candidate, attribute]],
            OutputLayout::YoloV8 => output[[0, attribute, candidate]],
        }
    };
    let (scale_x, scale_y) = parameters.scale();
    let (image_width, image_height) = (parameters.image_width as f32, parameters.image_height as f32);

    let mut detections = Vec::new();
    for candidate in 0..candidates {
        let objectness = match layout {
            OutputLayout::YoloV5 => value(candidate, 4),
            OutputLayout::YoloV8 => 1.0,
        };
        let best_class = (0..labels.len())
            .map(|class| (class, value(candidate, class_offset + class)))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        let (class, class_score) = match best_class {
            Some(best_class) => best_class,
            None => continue,
        };
        let confidence = objectness * class_score;
        if !(confidence >= parameters.confidence_threshold) {
            continue;
        }
        let bounding_box = BoundingBox::from_center(value(candidate, 0), value(candidate, 1), value(candidate, 2), value(candidate, 3))
            .scale(scale_x, scale_y)
            .clamp(image_width, image_height);
        if bounding_box.area() <= 0.0 {
            continue;
        }
        detections.push(Detection::new(bounding_box, labels[class].as_str(), confidence));
    }
    Ok(non_maximum_suppression(detections, parameters.iou_threshold))
}

pub fn non_maximum_suppression(mut detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    detections.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap_or(Ordering::Equal));
    let mut kept: Vec<Detection> = Vec::new();
    for detection in detections {
        let suppressed = kept.iter().any(|best| {
            best.label == detection.label
                && best.bounding_box.intersection_over_union(&detection.bounding_box) > iou_threshold
        });
        if !suppressed {
            kept.push(detection);
        }
    }
    kept
}
