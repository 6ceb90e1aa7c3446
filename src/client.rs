use async_trait::async_trait;
use rand::seq::IndexedRandom;
use reqwest::Response;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::api::models::{GenerateBestRequest, GenerateRequest, GenerateResponse, NewsResponse};
use crate::error::{AppError, ErrorResponse, Result};
use crate::figures::{CandidateFigure, Persona};
use crate::hot_take::{BestPick, InventedTake};
use crate::http::CLIENT;
use crate::i18n::Language;
use crate::news::Article;

/// The calls a front end makes against the gazette service.
#[async_trait]
pub trait GazetteApi: Send + Sync {
    async fn fetch_news(&self, category: &str) -> Result<Vec<Article>>;

    async fn generate_hot_take(&self, persona: &Persona, headline: &str, language: Language) -> Result<String>;

    async fn generate_best(
        &self,
        headline: &str,
        candidates: &[CandidateFigure],
        language: Language,
    ) -> Result<BestPick>;

    async fn generate_open(&self, headline: &str, language: Language) -> Result<InventedTake>;
}

/// Fetches the general headlines and picks one at random.
///
/// A failed fetch counts as an empty list.
pub async fn fetch_random_article<A: GazetteApi + ?Sized>(api: &A) -> Option<Article> {
    let articles = match api.fetch_news("general").await {
        Ok(articles) => articles,
        Err(err) => {
            warn!("Failed to fetch news: {}", err);
            Vec::new()
        }
    };
    debug!(count = articles.len(), "articles received");
    articles.choose(&mut rand::rng()).cloned()
}

#[derive(Debug, Clone)]
pub struct HttpGazetteClient {
    base_url: String,
}

impl HttpGazetteClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Response> {
        let res = CLIENT
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        ensure_success(path, res).await
    }
}

async fn ensure_success(path: &str, res: Response) -> Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let text = res.text().await.unwrap_or_default();
    error!(path, %status, body = %text, "error response");
    let detail = serde_json::from_str::<ErrorResponse>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(AppError::NetworkError(format!("{} returned {}: {}", path, status, detail)))
}

#[async_trait]
impl GazetteApi for HttpGazetteClient {
    async fn fetch_news(&self, category: &str) -> Result<Vec<Article>> {
        let res = CLIENT
            .get(format!("{}/api/news", self.base_url))
            .query(&[("category", category)])
            .send()
            .await?;
        let body: NewsResponse = ensure_success("/api/news", res).await?.json().await?;
        Ok(body.articles)
    }

    async fn generate_hot_take(&self, persona: &Persona, headline: &str, language: Language) -> Result<String> {
        let request = GenerateRequest {
            figure: Some(persona.clone()),
            headline: Some(headline.to_string()),
            language,
        };
        let body: GenerateResponse = self.post("/api/generate", &request).await?.json().await?;
        Ok(body.hot_take)
    }

    async fn generate_best(
        &self,
        headline: &str,
        candidates: &[CandidateFigure],
        language: Language,
    ) -> Result<BestPick> {
        let request = GenerateBestRequest {
            headline: Some(headline.to_string()),
            figures: Some(candidates.to_vec()),
            language,
        };
        Ok(self.post("/api/generate-best", &request).await?.json().await?)
    }

    async fn generate_open(&self, headline: &str, language: Language) -> Result<InventedTake> {
        let request = GenerateBestRequest {
            headline: Some(headline.to_string()),
            figures: None,
            language,
        };
        Ok(self.post("/api/generate-best", &request).await?.json().await?)
    }
}
