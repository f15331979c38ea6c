use std::sync::Arc;

use crate::config::Config;
use crate::generation::job_extractor::JobCrawler;
use crate::llm_client::LanguageModel;
use crate::store::InterviewStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InterviewStore>,
    pub llm: Arc<dyn LanguageModel>,
    /// Hosted crawl/extraction service used for job links.
    pub crawler: Arc<dyn JobCrawler>,
    pub config: Config,
}
