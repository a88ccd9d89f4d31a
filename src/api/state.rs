use std::sync::Arc;

use crate::application::Assistant;
use crate::infrastructure::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(assistant: Arc<Assistant>, config: AppConfig) -> Self {
        Self {
            assistant,
            config: Arc::new(config),
        }
    }
}
