use serde::{Deserialize, Serialize};

use crate::figures::{CandidateFigure, Persona};
use crate::hot_take::{BestPick, InventedTake};
use crate::i18n::Language;
use crate::news::Article;

#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    pub category: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewsResponse {
    pub articles: Vec<Article>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub figure: Option<Persona>,
    pub headline: Option<String>,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub hot_take: String,
}

/// `figures` present selects the catalog variant; absent selects the open one.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateBestRequest {
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub figures: Option<Vec<CandidateFigure>>,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GenerateBestResponse {
    Catalog(BestPick),
    Open(InventedTake),
}
