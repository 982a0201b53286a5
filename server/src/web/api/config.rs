use crate::management::utils::app_state::AppState;
use actix_web::{get, web, Responder, Scope};

pub fn initialize() -> Scope {
    web::scope("/config")
        .service(get_config)
}

#[get("/get")]
async fn get_config(app_state: web::Data<AppState>) -> impl Responder {
    web::Json(app_state.config.clone())
}
