pub mod api;
pub mod config;
pub mod error;
pub mod keypoints;
pub mod llm;
pub mod scraper;

use std::sync::Arc;
use config::Config;
use llm::SummaryClient;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub summarizer: SummaryClient,
}

impl AppState {
    pub fn new(config: Config) -> error::Result<Self> {
        let summarizer = SummaryClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            summarizer,
        })
    }
}
