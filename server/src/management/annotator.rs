use crate::utils::config::Config;
use crate::utils::logging::InferenceEntry;
use ab_glyph::{FontVec, PxScale};
use common::detection::detection::Detection;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use tokio::fs;

const LABEL_PADDING: u32 = 2;
const DEFAULT_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");
const DEFAULT_FONT_NAME: &str = "embedded DejaVuSans";

pub struct Annotator {
    font: FontVec,
    font_name: String,
    font_size: f32,
    border_width: u32,
    border_color: Rgb<u8>,
    text_color: Rgb<u8>,
}

impl Annotator {
    pub async fn new(config: &Config) -> Result<Self, InferenceEntry> {
        let (font, font_name) = match &config.font_path {
            Some(font_path) => {
                let font_data = fs::read(font_path).await
                    .map_err(|err| InferenceEntry::ReadFontError(font_path.display().to_string(), err.to_string()))?;
                let font = FontVec::try_from_vec(font_data)
                    .map_err(|_| InferenceEntry::ParseFontError(font_path.display().to_string()))?;
                (font, font_path.display().to_string())
            },
            None => {
                let font = FontVec::try_from_vec(DEFAULT_FONT.to_vec())
                    .map_err(|_| InferenceEntry::ParseFontError(DEFAULT_FONT_NAME.to_string()))?;
                (font, DEFAULT_FONT_NAME.to_string())
            },
        };
        Ok(Self {
            font,
            font_name,
            font_size: config.font_size,
            border_width: config.border_width,
            border_color: Rgb(config.border_color),
            text_color: Rgb(config.text_color),
        })
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    pub fn annotate(&self, image: &mut RgbImage, detections: &[Detection]) {
        for detection in detections {
            self.draw_detection(image, detection);
        }
    }

    fn draw_detection(&self, image: &mut RgbImage, detection: &Detection) {
        let (width, height) = (image.width() as f32, image.height() as f32);
        let bounding_box = detection.bounding_box.clamp(width, height);
        let x_min = bounding_box.xmin.floor() as i32;
        let y_min = bounding_box.ymin.floor() as i32;
        let x_max = bounding_box.xmax.ceil() as i32;
        let y_max = bounding_box.ymax.ceil() as i32;
        if x_max <= x_min || y_max <= y_min {
            return;
        }
        let (box_width, box_height) = ((x_max - x_min) as u32, (y_max - y_min) as u32);

        // Borders grow inward so boxes touching the image edge stay visible.
        for i in 0..self.border_width {
            if box_width <= 2 * i || box_height <= 2 * i {
                break;
            }
            let rectangle = Rect::at(x_min + i as i32, y_min + i as i32).of_size(box_width - 2 * i, box_height - 2 * i);
            draw_hollow_rect_mut(image, rectangle, self.border_color);
        }

        self.draw_label(image, &detection.label_text(), x_min, y_min);
    }

    fn draw_label(&self, image: &mut RgbImage, text: &str, x_min: i32, y_min: i32) {
        let scale = PxScale::from(self.font_size);
        let (text_width, text_height) = text_size(scale, &self.font, text);
        let label_width = (text_width + 2 * LABEL_PADDING).min(image.width().saturating_sub(x_min as u32));
        let label_height = (text_height + 2 * LABEL_PADDING).min(image.height());
        if label_width == 0 || label_height == 0 {
            return;
        }
        // Above the box when there is room, otherwise just inside its top edge.
        let label_y = if y_min >= label_height as i32 { y_min - label_height as i32 } else { y_min };
        let label_y = label_y.min((image.height() - label_height) as i32);
        draw_filled_rect_mut(image, Rect::at(x_min, label_y).of_size(label_width, label_height), self.border_color);
        draw_text_mut(image, self.text_color, x_min + LABEL_PADDING as i32, label_y + LABEL_PADDING as i32, scale, &self.font, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::CONFIG_PATH;
    use common::detection::bounding_box::BoundingBox;
    use std::io::Write;
    use std::path::PathBuf;

    const BACKGROUND: Rgb<u8> = Rgb([10, 20, 30]);

    fn config() -> Config {
        Config { border_width: 2, border_color: [255, 0, 0], text_color: [255, 255, 255], font_path: None, ..Config::default() }
    }

    fn dog(xmin: f32, ymin: f32, xmax: f32, ymax: f32) -> Detection {
        Detection::new(BoundingBox::new(xmin, ymin, xmax, ymax), "dog", 0.876)
    }

    // Pixels in the band above `y_max` that are label background or text.
    fn label_pixels(image: &RgbImage, y_max: u32) -> (usize, usize) {
        let mut background = 0;
        let mut text = 0;
        for y in 0..y_max {
            for x in 0..image.width() {
                let pixel = image.get_pixel(x, y);
                if *pixel == Rgb([255, 0, 0]) {
                    background += 1;
                } else if pixel[0] == 255 && pixel[1] > 0 && pixel[1] == pixel[2] {
                    text += 1;
                }
            }
        }
        (background, text)
    }

    #[tokio::test]
    async fn border_is_drawn_on_box_edges() {
        let annotator = Annotator::new(&config()).await.unwrap();
        let mut image = RgbImage::from_pixel(64, 64, BACKGROUND);
        annotator.annotate(&mut image, &[dog(10.0, 30.0, 50.0, 60.0)]);

        let red = Rgb([255, 0, 0]);
        for y in 30..60 {
            assert_eq!(*image.get_pixel(10, y), red);
            assert_eq!(*image.get_pixel(11, y), red);
            assert_eq!(*image.get_pixel(48, y), red);
            assert_eq!(*image.get_pixel(49, y), red);
        }
        for x in 10..50 {
            assert_eq!(*image.get_pixel(x, 30), red);
            assert_eq!(*image.get_pixel(x, 59), red);
        }
        assert_eq!(*image.get_pixel(30, 45), BACKGROUND);
        assert_eq!(*image.get_pixel(9, 45), BACKGROUND);
        assert_eq!(*image.get_pixel(50, 45), BACKGROUND);
        assert_eq!(*image.get_pixel(30, 60), BACKGROUND);
    }

    #[tokio::test]
    async fn boxes_are_clamped_and_degenerate_boxes_skipped() {
        let annotator = Annotator::new(&config()).await.unwrap();
        let mut image = RgbImage::from_pixel(32, 32, BACKGROUND);
        annotator.annotate(&mut image, &[dog(-10.0, -10.0, 100.0, 100.0), dog(40.0, 40.0, 60.0, 60.0)]);
        assert_eq!(*image.get_pixel(0, 0), Rgb([255, 0, 0]));
        assert_eq!(*image.get_pixel(31, 31), Rgb([255, 0, 0]));
        assert_eq!(*image.get_pixel(16, 28), BACKGROUND);
    }

    #[tokio::test]
    async fn label_is_drawn_above_box_with_embedded_font() {
        let annotator = Annotator::new(&config()).await.unwrap();
        assert_eq!(annotator.font_name(), DEFAULT_FONT_NAME);
        let mut image = RgbImage::from_pixel(200, 120, BACKGROUND);
        annotator.annotate(&mut image, &[dog(20.0, 60.0, 120.0, 110.0)]);

        assert_eq!(*image.get_pixel(20, 59), Rgb([255, 0, 0]));
        assert_eq!(*image.get_pixel(20, 5), BACKGROUND);
        let (background, text) = label_pixels(&image, 60);
        assert!(background > 0, "no label background above the box");
        assert!(text > 0, "no label text inside the background");
    }

    #[tokio::test]
    async fn label_falls_inside_box_at_top_edge() {
        let annotator = Annotator::new(&config()).await.unwrap();
        let mut image = RgbImage::from_pixel(200, 120, BACKGROUND);
        annotator.annotate(&mut image, &[dog(20.0, 0.0, 120.0, 110.0)]);
        let (_, text) = label_pixels(&image, 40);
        assert!(text > 0);
    }

    #[tokio::test]
    async fn shipped_config_draws_labels() {
        let config = Config::from_file(CONFIG_PATH).unwrap();
        let annotator = Annotator::new(&config).await.unwrap();
        let mut image = RgbImage::from_pixel(200, 120, BACKGROUND);
        annotator.annotate(&mut image, &[dog(20.0, 60.0, 120.0, 110.0)]);
        let changed = (0..60)
            .flat_map(|y| (0..200).map(move |x| (x, y)))
            .filter(|&(x, y)| *image.get_pixel(x, y) != BACKGROUND)
            .count();
        assert!(changed > 0, "no label drawn for {}", dog(0.0, 0.0, 1.0, 1.0).label_text());
    }

    #[tokio::test]
    async fn configured_font_overrides_embedded_one() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DEFAULT_FONT).unwrap();
        let config = Config { font_path: Some(file.path().to_path_buf()), ..config() };
        let annotator = Annotator::new(&config).await.unwrap();
        assert_eq!(annotator.font_name(), file.path().display().to_string());
    }

    #[tokio::test]
    async fn unreadable_font_is_reported() {
        let config = Config { font_path: Some(PathBuf::from("./no-such-font.ttf")), ..config() };
        assert!(matches!(Annotator::new(&config).await, Err(InferenceEntry::ReadFontError(_, _))));
    }

    #[tokio::test]
    async fn invalid_font_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not a font").unwrap();
        let config = Config { font_path: Some(file.path().to_path_buf()), ..config() };
        assert!(matches!(Annotator::new(&config).await, Err(InferenceEntry::ParseFontError(_))));
    }
}
