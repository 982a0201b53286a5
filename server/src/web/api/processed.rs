use crate::management::utils::app_state::AppState;
use crate::utils::logging::*;
use crate::web::utils::response::ErrorResponse;
use actix_files::NamedFile;
use actix_web::{get, web, HttpRequest, HttpResponse, Scope};

pub fn initialize() -> Scope {
    web::scope("/processed")
        .service(processed_file)
}

#[get("/uploads/{filename:.*}")]
async fn processed_file(req: HttpRequest, app_state: web::Data<AppState>, filename: web::Path<String>) -> HttpResponse {
    let filename = filename.into_inner();
    match app_state.repository.resolve(&filename).await {
        Some(file_path) => match NamedFile::open_async(&file_path).await {
            Ok(named_file) => named_file
                .set_content_type(mime_guess::from_path(&file_path).first_or_octet_stream())
                .into_response(&req),
            Err(_) => not_found(),
        },
        None => {
            logging_notice!(RequestEntry::RetrievalRejected(filename));
            not_found()
        }
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("Not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::api::inference::tests::app_state;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn traversal_attempts_are_not_found() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("uploads");
        std::fs::write(outer.path().join("secret.txt"), b"secret").unwrap();
        let app_state = app_state(&root, 1 << 20).await;
        std::fs::create_dir_all(root.join("upload_a")).unwrap();
        std::fs::write(root.join("upload_a").join("processed_a.png"), b"png").unwrap();
        let app = test::init_service(App::new().app_data(app_state.clone()).service(initialize())).await;

        let request = test::TestRequest::get().uri("/processed/uploads/upload_a/processed_a.png").to_request();
        assert_eq!(test::call_service(&app, request).await.status(), StatusCode::OK);

        for uri in [
            "/processed/uploads/../secret.txt",
            "/processed/uploads/upload_a/../../secret.txt",
            "/processed/uploads/%2E%2E/secret.txt",
            "/processed/uploads/..%2Fsecret.txt",
            "/processed/uploads/upload_a",
            "/processed/uploads/upload_a/missing.png",
        ] {
            let request = test::TestRequest::get().uri(uri).to_request();
            let response = test::call_service(&app, request).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        }
    }
}
