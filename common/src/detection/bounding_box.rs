use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    pub xmin: f32,
    pub ymin: f32,
    pub xmax: f32,
    pub ymax: f32,
}

impl BoundingBox {
    pub fn new(xmin: f32, ymin: f32, xmax: f32, ymax: f32) -> Self {
        Self {
            xmin: xmin.min(xmax),
            ymin: ymin.min(ymax),
            xmax: xmin.max(xmax),
            ymax: ymin.max(ymax),
        }
    }

    pub fn from_center(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        Self::new(center_x - width / 2.0, center_y - height / 2.0, center_x + width / 2.0, center_y + height / 2.0)
    }

    pub fn width(&self) -> f32 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f32 {
        self.ymax - self.ymin
    }

    pub fn area(&self) -> f32 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    pub fn scale(&self, scale_x: f32, scale_y: f32) -> Self {
        Self::new(self.xmin * scale_x, self.ymin * scale_y, self.xmax * scale_x, self.ymax * scale_y)
    }

    pub fn clamp(&self, width: f32, height: f32) -> Self {
        Self::new(self.xmin.clamp(0.0, width), self.ymin.clamp(0.0, height),
                  self.xmax.clamp(0.0, width), self.ymax.clamp(0.0, height))
    }

    pub fn intersection_over_union(&self, other: &BoundingBox) -> f32 {
        let xmin = self.xmin.max(other.xmin);
        let ymin = self.ymin.max(other.ymin);
        let xmax = self.xmax.min(other.xmax);
        let ymax = self.ymax.min(other.ymax);
        let intersection = (xmax - xmin).max(0.0) * (ymax - ymin).max(0.0);
        let union = self.area() + other.area() - intersection;
        if union > 0.0 { intersection / union } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_orders_corners() {
        let bounding_box = BoundingBox::new(50.0, 40.0, 10.0, 20.0);
        assert_eq!(bounding_box, BoundingBox { xmin: 10.0, ymin: 20.0, xmax: 50.0, ymax: 40.0 });
    }

    #[test]
    fn from_center_spans_half_extent_each_side() {
        let bounding_box = BoundingBox::from_center(100.0, 50.0, 40.0, 20.0);
        assert_eq!(bounding_box, BoundingBox::new(80.0, 40.0, 120.0, 60.0));
        assert_eq!(bounding_box.area(), 800.0);
    }

    #[test]
    fn clamp_keeps_box_inside_image() {
        let bounding_box = BoundingBox::new(-5.0, -5.0, 700.0, 300.0).clamp(640.0, 480.0);
        assert_eq!(bounding_box, BoundingBox::new(0.0, 0.0, 640.0, 300.0));
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let bounding_box = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!((bounding_box.intersection_over_union(&bounding_box) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(20.0, 20.0, 30.0, 30.0);
        assert_eq!(a.intersection_over_union(&b), 0.0);
    }

    #[test]
    fn iou_of_half_overlap() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 0.0, 15.0, 10.0);
        assert!((a.intersection_over_union(&b) - 50.0 / 150.0).abs() < 1e-6);
    }
}
