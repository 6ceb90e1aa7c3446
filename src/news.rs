use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{AppError, Result};
use crate::http::CLIENT;

/// Title the headlines provider uses for withdrawn articles.
pub const REMOVED_SENTINEL: &str = "[Removed]";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    pub name: String,
}

/// The minimal article shape handed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub source: ArticleSource,
    pub url: String,
    pub published_at: String,
}

impl Article {
    pub fn published_date(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.published_at).ok()
    }
}

#[derive(Debug, Clone)]
pub struct HeadlineQuery {
    pub category: String,
    pub country: String,
    pub page_size: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamResponse {
    pub status: String,
    pub code: Option<String>,
    pub message: Option<String>,
    pub total_results: Option<u32>,
    #[serde(default)]
    pub articles: Vec<UpstreamArticle>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamArticle {
    pub source: Option<UpstreamSource>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Source of top headlines.
#[async_trait]
pub trait HeadlineSource: Send + Sync {
    async fn top_headlines(&self, api_key: &str, query: &HeadlineQuery) -> Result<Vec<Article>>;
}

/// Drops withdrawn or untitled entries and projects the rest to [`Article`].
pub fn filter_articles(raw: Vec<UpstreamArticle>) -> Vec<Article> {
    raw.into_iter()
        .filter_map(|article| {
            let title = article.title.filter(|t| !t.is_empty() && t != REMOVED_SENTINEL)?;
            Some(Article {
                title,
                source: ArticleSource {
                    name: article
                        .source
                        .and_then(|s| s.name)
                        .unwrap_or_else(|| "Unknown".to_string()),
                },
                url: article.url.unwrap_or_default(),
                published_at: article.published_at.unwrap_or_default(),
            })
        })
        .collect()
}

/// Turns an upstream payload into articles, surfacing provider errors verbatim.
pub fn into_articles(response: UpstreamResponse) -> Result<Vec<Article>> {
    if response.status != "ok" {
        return Err(AppError::UpstreamError {
            code: response.code,
            message: response.message,
        });
    }

    debug!(total_results = ?response.total_results, "NewsAPI payload received");
    Ok(filter_articles(response.articles))
}

/// NewsAPI `top-headlines` client.
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    base_url: String,
}

impl NewsApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl HeadlineSource for NewsApiClient {
    async fn top_headlines(&self, api_key: &str, query: &HeadlineQuery) -> Result<Vec<Article>> {
        let url = format!("{}/top-headlines", self.base_url);
        let page_size = query.page_size.to_string();

        let res = CLIENT
            .get(&url)
            .header("X-Api-Key", api_key)
            .query(&[
                ("country", query.country.as_str()),
                ("category", query.category.as_str()),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::FetchError(e.to_string()))?;

        debug!(status = %res.status(), "NewsAPI responded");

        // NewsAPI reports failures in the body, so decode regardless of status.
        let payload: UpstreamResponse = res.json().await.map_err(|e| {
            error!("NewsAPI payload could not be decoded: {}", e);
            AppError::FetchError(e.to_string())
        })?;

        into_articles(payload)
    }
}
