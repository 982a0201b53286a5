use crate::utils::logging::Logger;
use crate::web::utils::response::ErrorResponse;
use actix_web::{get, web, HttpResponse, Responder, Scope};
use chrono::{DateTime, Local};

pub fn initialize() -> Scope {
    web::scope("/log")
        .service(system_log)
        .service(system_log_since)
}

#[get("/system_log")]
async fn system_log() -> impl Responder {
    let system_log = Logger::get_system_logs().await
        .into_iter().map(|log| log.to_plain_string()).collect::<Vec<String>>();
    HttpResponse::Ok().json(system_log)
}

#[get("/system_log/since/{since}")]
async fn system_log_since(since: web::Path<String>) -> impl Responder {
    match parse_datetime(&since.into_inner()) {
        Ok(since_time) => {
            let logs = Logger::get_system_logs_since(since_time).await
                .into_iter().map(|log| log.to_plain_string()).collect::<Vec<String>>();
            HttpResponse::Ok().json(logs)
        }
        Err(err) => HttpResponse::BadRequest().json(ErrorResponse::new(err)),
    }
}

fn parse_datetime(datetime_str: &str) -> Result<DateTime<Local>, String> {
    DateTime::parse_from_rfc3339(datetime_str)
        .map_err(|_| "Invalid datetime format".to_string())
        .map(|dt| dt.with_timezone(&Local))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::logging::logging_warning;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn lists_recent_entries() {
        logging_warning!("log-api-marker");
        let app = test::init_service(App::new().service(initialize())).await;
        let request = test::TestRequest::get().uri("/log/system_log").to_request();
        let logs: Vec<String> = test::call_and_read_body_json(&app, request).await;
        assert!(logs.iter().any(|line| line.contains("log-api-marker")));
    }

    #[actix_web::test]
    async fn future_timestamp_returns_nothing_new() {
        let app = test::init_service(App::new().service(initialize())).await;
        let request = test::TestRequest::get().uri("/log/system_log/since/2999-01-01T00:00:00Z").to_request();
        let logs: Vec<String> = test::call_and_read_body_json(&app, request).await;
        assert!(logs.is_empty());
    }

    #[actix_web::test]
    async fn rejects_unparsable_timestamp() {
        let app = test::init_service(App::new().service(initialize())).await;
        let request = test::TestRequest::get().uri("/log/system_log/since/yesterday").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }
}
