use crate::detection::bounding_box::BoundingBox;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Detection {
    pub bounding_box: BoundingBox,
    pub label: String,
    pub confidence: f32,
}

impl Detection {
    pub fn new<T: Into<String>>(bounding_box: BoundingBox, label: T, confidence: f32) -> Self {
        Self {
            bounding_box,
            label: label.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn label_text(&self) -> String {
        format!("{} {:.2}", self.label, self.confidence)
    }
}
