use crate::management::annotator::Annotator;
use crate::management::detector::Detector;
use crate::management::detector::onnx_detector::OnnxDetector;
use crate::management::pipeline::Pipeline;
use crate::management::result_repository::ResultRepository;
use crate::management::utils::app_state::AppState;
use crate::utils::config::{Config, CONFIG_PATH};
use crate::utils::logging::*;
use crate::web::api::{config, default, inference, log, processed};
use actix_web::web::{route, Data, ServiceConfig};
use actix_web::{App, HttpServer};
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

pub struct Server;

impl Server {
    pub async fn run() {
        logging_information!(SystemEntry::Initializing);
        let config = match Config::from_file(CONFIG_PATH) {
            Ok(config) => config,
            Err(entry) => {
                logging_emergency!(entry);
                process::exit(1);
            }
        };
        Logger::configure(config.debug, config.log_capacity).await;
        let app_state = match Self::initialize(config.clone()).await {
            Ok(app_state) => Data::new(app_state),
            Err(message) => {
                logging_emergency!(message);
                process::exit(1);
            }
        };
        let debug = config.debug;
        let http_server = loop {
            let app_state = app_state.clone();
            let http_server = HttpServer::new(move || {
                let cors = actix_cors::Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600);
                App::new()
                    .wrap(cors)
                    .app_data(app_state.clone())
                    .configure(|service_config| Self::configure_services(service_config, debug))
                    .default_service(route().to(default::default_route))
            })
            .bind(config.bind_address());
            match http_server {
                Ok(http_server) => break http_server,
                Err(err) => {
                    logging_critical!(NetworkEntry::BindPortError(config.bind_address(), err));
                    sleep(Duration::from_secs(config.bind_retry_duration)).await;
                    continue;
                }
            }
        };
        logging_information!(SystemEntry::WebReady(config.bind_address()));
        logging_information!(SystemEntry::InitializeComplete);
        logging_information!(SystemEntry::Online);
        match http_server.run().await {
            Ok(()) => logging_information!(SystemEntry::TerminateComplete),
            Err(err) => logging_emergency!(SystemEntry::WebPanic(err)),
        }
    }

    // Log and config views expose internal detail, so they exist only in debug mode.
    pub fn configure_services(service_config: &mut ServiceConfig, debug: bool) {
        service_config
            .configure(inference::initialize)
            .service(processed::initialize());
        if debug {
            service_config
                .service(config::initialize())
                .service(log::initialize());
        }
    }

    async fn initialize(config: Config) -> Result<AppState, String> {
        let repository = ResultRepository::new(config.upload_root.clone());
        repository.initialize().await?;
        let detector = OnnxDetector::new(&config)?;
        logging_information!(SystemEntry::DetectorReady(detector.name()));
        let annotator = Annotator::new(&config).await?;
        logging_information!(SystemEntry::AnnotatorReady(annotator.font_name().to_string()));
        let detector: Arc<dyn Detector> = Arc::new(detector);
        let pipeline = Pipeline::new(detector, annotator, config.output_format);
        Ok(AppState::new(pipeline, repository, config))
    }
}
