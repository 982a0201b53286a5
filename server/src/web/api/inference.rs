use crate::management::result_repository::ResultRepository;
use crate::management::utils::annotated_image::AnnotatedImage;
use crate::management::utils::app_state::AppState;
use crate::management::utils::upload_error::UploadError;
use crate::management::utils::uploaded_image::UploadedImage;
use crate::utils::logging::*;
use crate::web::utils::response::{PredictResponse, UploadResponse};
use actix_multipart::{Field, Multipart};
use actix_web::http::header::ContentDisposition;
use actix_web::{post, web, HttpResponse, ResponseError};
use futures::{StreamExt, TryStreamExt};
use sanitize_filename::sanitize;

const IMAGE_FIELD: &str = "image";

pub fn initialize(service_config: &mut web::ServiceConfig) {
    service_config
        .service(upload)
        .service(predict);
}

#[post("/upload")]
async fn upload(app_state: web::Data<AppState>, payload: Multipart) -> HttpResponse {
    match store_upload(&app_state, payload).await {
        Ok(processed_image) => HttpResponse::Ok().json(UploadResponse::new(processed_image)),
        Err(err) => reject(err).await,
    }
}

#[post("/predict")]
async fn predict(app_state: web::Data<AppState>, payload: Multipart) -> HttpResponse {
    match inline_upload(&app_state, payload).await {
        Ok(image) => HttpResponse::Ok().json(PredictResponse::new(image)),
        Err(err) => reject(err).await,
    }
}

async fn store_upload(app_state: &AppState, payload: Multipart) -> Result<String, UploadError> {
    let uploaded_image = read_image(payload, app_state.config.max_upload_size).await?;
    let (uploaded_image, annotated_image) = annotate(app_state, uploaded_image).await?;
    let stored_result = app_state.repository
        .persist(&uploaded_image, &annotated_image, app_state.config.keep_original_upload).await?;
    let processed_image = stored_result.retrieval_path();
    logging_information!(RequestEntry::Stored(processed_image.clone()));
    Ok(processed_image)
}

async fn inline_upload(app_state: &AppState, payload: Multipart) -> Result<String, UploadError> {
    let uploaded_image = read_image(payload, app_state.config.max_upload_size).await?;
    let (_, annotated_image) = annotate(app_state, uploaded_image).await?;
    let image = ResultRepository::inline(&annotated_image);
    logging_debug!(RequestEntry::Inlined(image.len()));
    Ok(image)
}

async fn annotate(app_state: &AppState, uploaded_image: UploadedImage) -> Result<(UploadedImage, AnnotatedImage), UploadError> {
    logging_information!(RequestEntry::Received(uploaded_image.filename.clone(), uploaded_image.size()));
    let pipeline = app_state.pipeline.clone();
    let (uploaded_image, result) = tokio::task::spawn_blocking(move || {
        let result = pipeline.process(&uploaded_image.data);
        (uploaded_image, result)
    })
        .await
        .map_err(|err| UploadError::TaskPanicked(err.to_string()))?;
    let annotated_image = result?;
    logging_information!(RequestEntry::Detected(uploaded_image.filename.clone(), annotated_image.detections));
    Ok((uploaded_image, annotated_image))
}

async fn reject(err: UploadError) -> HttpResponse {
    if err.is_validation() {
        logging_warning!(err.to_string());
    } else {
        logging_error!(err.to_string());
    }
    err.error_response()
}

async fn read_image(mut payload: Multipart, max_size: usize) -> Result<UploadedImage, UploadError> {
    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(UploadError::MissingFile),
            Err(err) => return Err(UploadError::InvalidPayload(err.to_string())),
        };
        let (field_name, file_name) = match field.content_disposition() {
            Some(content_disposition) => (get_field_name(content_disposition), get_file_name(content_disposition)),
            None => (None, None),
        };
        if field_name.as_deref() != Some(IMAGE_FIELD) {
            continue;
        }
        let file_name = sanitize(file_name.unwrap_or_default());
        if file_name.is_empty() {
            return Err(UploadError::EmptyFilename);
        }
        let data = read_field(&mut field, max_size).await?;
        if data.is_empty() {
            return Err(UploadError::EmptyFile);
        }
        return Ok(UploadedImage::new(file_name, data));
    }
}

fn get_field_name(content_disposition: &ContentDisposition) -> Option<String> {
    content_disposition.get_name().map(|field_name| field_name.to_string())
}

fn get_file_name(content_disposition: &ContentDisposition) -> Option<String> {
    content_disposition.get_filename().map(|file_name| file_name.to_string())
}

async fn read_field(field: &mut Field, max_size: usize) -> Result<Vec<u8>, UploadError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|err| UploadError::InvalidPayload(err.to_string()))?;
        if data.len() + chunk.len() > max_size {
            return Err(UploadError::FileTooLarge);
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}
