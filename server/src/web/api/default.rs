use crate::web::utils::response::ErrorResponse;
use actix_web::{HttpResponse, Responder};

pub async fn default_route() -> impl Responder {
    HttpResponse::NotFound().json(ErrorResponse::new("Not found"))
}
