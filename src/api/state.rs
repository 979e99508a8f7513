use std::sync::Arc;

use crate::config::Config;
use crate::observability::Metrics;
use crate::pipeline::GetObjectHandler;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub handler: Arc<GetObjectHandler>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: Config, handler: GetObjectHandler) -> Self {
        Self {
            config: Arc::new(config),
            handler: Arc::new(handler),
            metrics: Arc::new(Metrics::new()),
        }
    }
}
