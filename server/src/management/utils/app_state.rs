use crate::management::pipeline::Pipeline;
use crate::management::result_repository::ResultRepository;
use crate::utils::config::Config;
use std::sync::Arc;

pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub repository: ResultRepository,
    pub config: Config,
}

impl AppState {
    pub fn new(pipeline: Pipeline, repository: ResultRepository, config: Config) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            repository,
            config,
        }
    }
}
