use crate::management::annotator::Annotator;
use crate::management::detector::Detector;
use crate::management::utils::annotated_image::AnnotatedImage;
use crate::management::utils::upload_error::UploadError;
use crate::utils::config::OutputFormat;
use image::{DynamicImage, RgbImage};
use std::io::Cursor;
use std::sync::Arc;

pub struct Pipeline {
    detector: Arc<dyn Detector>,
    annotator: Annotator,
    output_format: OutputFormat,
}

impl Pipeline {
    pub fn new(detector: Arc<dyn Detector>, annotator: Annotator, output_format: OutputFormat) -> Self {
        Self {
            detector,
            annotator,
            output_format,
        }
    }

    pub fn process(&self, data: &[u8]) -> Result<AnnotatedImage, UploadError> {
        let mut image = Self::decode(data)?;
        let detections = self.detector.detect(&image)?;
        self.annotator.annotate(&mut image, &detections);
        let encoded = Self::encode(image, self.output_format)?;
        Ok(AnnotatedImage::new(encoded, self.output_format, detections.len()))
    }

    pub fn decode(data: &[u8]) -> Result<RgbImage, UploadError> {
        let image = image::load_from_memory(data)
            .map_err(|err| UploadError::Decode(err.to_string()))?;
        Ok(image.to_rgb8())
    }

    pub fn encode(image: RgbImage, output_format: OutputFormat) -> Result<Vec<u8>, UploadError> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(image)
            .write_to(&mut buffer, output_format.image_format())
            .map_err(|err| UploadError::Encode(err.to_string()))?;
        Ok(buffer.into_inner())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::utils::config::Config;
    use crate::utils::logging::InferenceEntry;
    use common::detection::bounding_box::BoundingBox;
    use common::detection::detection::Detection;
    use image::Rgb;

    pub struct FixedDetector(pub Vec<Detection>);

    impl Detector for FixedDetector {
        fn name(&self) -> String {
            "fixed".to_string()
        }

        fn detect(&self, _image: &RgbImage) -> Result<Vec<Detection>, InferenceEntry> {
            Ok(self.0.clone())
        }
    }

    pub struct FailingDetector;

    impl Detector for FailingDetector {
        fn name(&self) -> String {
            "failing".to_string()
        }

        fn detect(&self, _image: &RgbImage) -> Result<Vec<Detection>, InferenceEntry> {
            Err(InferenceEntry::RunError("stub failure".to_string()))
        }
    }

    pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
        Pipeline::encode(RgbImage::from_pixel(width, height, Rgb([10, 20, 30])), OutputFormat::Png).unwrap()
    }

    pub async fn pipeline_with(detector: Arc<dyn Detector>, output_format: OutputFormat) -> Pipeline {
        let config = Config { font_path: None, border_color: [255, 0, 0], border_width: 2, ..Config::default() };
        let annotator = Annotator::new(&config).await.unwrap();
        Pipeline::new(detector, annotator, output_format)
    }

    #[tokio::test]
    async fn burns_stub_detection_into_output() {
        let detection = Detection::new(BoundingBox::new(10.0, 30.0, 50.0, 60.0), "dog", 0.876);
        let pipeline = pipeline_with(Arc::new(FixedDetector(vec![detection])), OutputFormat::Png).await;
        let annotated = pipeline.process(&sample_png(64, 64)).unwrap();
        assert_eq!(annotated.detections, 1);
        assert_eq!(annotated.format, OutputFormat::Png);

        let output = Pipeline::decode(&annotated.data).unwrap();
        assert_eq!(output.dimensions(), (64, 64));
        assert_eq!(*output.get_pixel(10, 45), Rgb([255, 0, 0]));
        assert_eq!(*output.get_pixel(49, 45), Rgb([255, 0, 0]));
        assert_eq!(*output.get_pixel(30, 45), Rgb([10, 20, 30]));
        assert_eq!(*output.get_pixel(10, 29), Rgb([255, 0, 0]));
    }

    #[tokio::test]
    async fn jpeg_output_is_decodable() {
        let pipeline = pipeline_with(Arc::new(FixedDetector(Vec::new())), OutputFormat::Jpeg).await;
        let annotated = pipeline.process(&sample_png(32, 16)).unwrap();
        assert_eq!(annotated.detections, 0);
        assert_eq!(&annotated.data[..2], &[0xFF, 0xD8]);
        assert_eq!(Pipeline::decode(&annotated.data).unwrap().dimensions(), (32, 16));
    }

    #[tokio::test]
    async fn corrupt_bytes_are_a_decode_error() {
        let pipeline = pipeline_with(Arc::new(FixedDetector(Vec::new())), OutputFormat::Png).await;
        assert!(matches!(pipeline.process(b"definitely not an image"), Err(UploadError::Decode(_))));
    }

    #[tokio::test]
    async fn detector_failure_is_an_inference_error() {
        let pipeline = pipeline_with(Arc::new(FailingDetector), OutputFormat::Png).await;
        assert!(matches!(pipeline.process(&sample_png(8, 8)), Err(UploadError::Inference(_))));
    }
}
