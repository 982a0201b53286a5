pub mod annotated_image;
pub mod app_state;
pub mod stored_result;
pub mod upload_error;
pub mod uploaded_image;
