pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod figures;
pub mod hot_take;
pub mod http;
pub mod i18n;
pub mod llm;
pub mod logging;
pub mod news;
pub mod prompt;
pub mod session;

use std::sync::Arc;
use config::Config;
use llm::{GeminiModel, LanguageModel};
use news::{HeadlineSource, NewsApiClient};

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub model: Arc<dyn LanguageModel>,
    pub headlines: Arc<dyn HeadlineSource>,
}

impl AppState {
    /// Wires the Gemini and NewsAPI clients described by `config`.
    pub fn from_config(config: Config) -> Self {
        let model = GeminiModel::new(config.gemini_base_url.clone(), config.gemini_model.clone());
        let headlines = NewsApiClient::new(config.news_api_base_url.clone());
        Self {
            config: Arc::new(config),
            model: Arc::new(model),
            headlines: Arc::new(headlines),
        }
    }
}
