use std::future::Future;
use std::time::Instant;

use axum::{
    routing::{get, post},
    Router,
    extract::{rejection::JsonRejection, Json, Query, State},
    response::IntoResponse,
};
use chrono::Utc;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::error::{AppError, Result};
use crate::api::models::{
    GenerateBestRequest, GenerateBestResponse, GenerateRequest, GenerateResponse, NewsQuery, NewsResponse,
};
use crate::api::response::{self, method_not_allowed, present, HealthResponse};
use crate::hot_take::HotTakeGenerator;
use crate::news::HeadlineQuery;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/news", get(news_handler).head(method_not_allowed).fallback(method_not_allowed))
        .route("/api/news-proxy", get(news_handler).head(method_not_allowed).fallback(method_not_allowed))
        .route("/api/generate", post(generate_handler).fallback(method_not_allowed))
        .route("/api/generate-best", post(generate_best_handler).fallback(method_not_allowed))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn health_handler() -> impl IntoResponse {
    response::success(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Runs a request under the configured deadline and logs its outcome.
async fn within_deadline<T, F>(state: &AppState, route: &'static str, work: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let start_time = Instant::now();
    let result = tokio::time::timeout(state.config.request_timeout, work).await;
    let elapsed = start_time.elapsed();
    info!(route, ?elapsed, "request processed");

    match result {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            error!(route, error = %err, "request failed");
            Err(err)
        }
        Err(_) => {
            warn!(route, ?elapsed, "request timed out");
            Err(AppError::Timeout)
        }
    }
}

async fn news_handler(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> Result<impl IntoResponse> {
    let articles = within_deadline(&state, "api/news", process_news_request(&state, &query)).await?;
    Ok(response::success(NewsResponse { articles }))
}

async fn process_news_request(state: &AppState, query: &NewsQuery) -> Result<Vec<crate::news::Article>> {
    let api_key = state.config.news_api_key()?;

    let headline_query = HeadlineQuery {
        category: present(query.category.as_deref()).unwrap_or("general").to_string(),
        country: present(query.country.as_deref())
            .unwrap_or(state.config.default_country.as_str())
            .to_string(),
        page_size: state.config.news_page_size,
    };
    info!(category = %headline_query.category, country = %headline_query.country, "fetching headlines");

    let articles = state.headlines.top_headlines(api_key, &headline_query).await?;
    info!(count = articles.len(), "filtered articles");
    Ok(articles)
}

async fn generate_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let hot_take = within_deadline(&state, "api/generate", async {
        let Json(req) = payload.map_err(|e| {
            warn!("Rejected generate body: {}", e);
            AppError::ValidationError("Missing figure or headline".to_string())
        })?;
        process_generate_request(&state, req).await
    })
    .await?;

    Ok(response::success(GenerateResponse { hot_take }))
}

async fn process_generate_request(state: &AppState, req: GenerateRequest) -> Result<String> {
    let (figure, headline) = match (req.figure, present(req.headline.as_deref())) {
        (Some(figure), Some(headline)) => (figure, headline.to_string()),
        _ => return Err(AppError::ValidationError("Missing figure or headline".to_string())),
    };
    info!(figure = %figure.name, headline = %preview(&headline), language = %req.language, "generate request");

    let api_key = state.config.google_api_key()?;
    HotTakeGenerator::new(state.model.as_ref(), api_key, state.config.temperature)
        .in_character(&figure, &headline, req.language)
        .await
}

async fn generate_best_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateBestRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let result = within_deadline(&state, "api/generate-best", async {
        let Json(req) = payload.map_err(|e| {
            warn!("Rejected generate-best body: {}", e);
            AppError::ValidationError("Missing headline or figures".to_string())
        })?;
        process_generate_best_request(&state, req).await
    })
    .await?;

    Ok(response::success(result))
}

async fn process_generate_best_request(state: &AppState, req: GenerateBestRequest) -> Result<GenerateBestResponse> {
    let headline = present(req.headline.as_deref())
        .ok_or_else(|| AppError::ValidationError("Missing headline or figures".to_string()))?
        .to_string();

    if matches!(&req.figures, Some(figures) if figures.is_empty()) {
        return Err(AppError::ValidationError("Missing headline or figures".to_string()));
    }
    info!(
        headline = %preview(&headline),
        language = %req.language,
        figures = ?req.figures.as_ref().map(Vec::len),
        "generate-best request"
    );

    let api_key = state.config.google_api_key()?;
    let generator = HotTakeGenerator::new(state.model.as_ref(), api_key, state.config.temperature);

    match req.figures {
        Some(figures) => generator
            .best_from_catalog(&headline, &figures, req.language)
            .await
            .map(GenerateBestResponse::Catalog),
        None => generator
            .invent(&headline, req.language)
            .await
            .map(GenerateBestResponse::Open),
    }
}

/// First 50 characters of a headline, for log lines.
fn preview(headline: &str) -> String {
    headline.chars().take(50).collect()
}
