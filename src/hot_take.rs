use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{AppError, Result};
use crate::extract::find_json_object;
use crate::figures::{CandidateFigure, GeneratedFigure, Persona, DEFAULT_AVATAR};
use crate::i18n::Language;
use crate::llm::{Completion, LanguageModel, ResponseFormat};
use crate::prompt;

/// Catalog-variant result: the chosen candidate id and its reaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestPick {
    pub figure_id: String,
    pub hot_take: String,
}

/// Open-catalog result: a figure invented by the model and its reaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventedTake {
    pub figure: GeneratedFigure,
    pub hot_take: String,
}

#[derive(Deserialize)]
struct CatalogReply {
    figure_id: Option<serde_json::Value>,
    hot_take: Option<String>,
}

#[derive(Deserialize)]
struct OpenReply {
    name: Option<String>,
    title: Option<String>,
    era: Option<String>,
    avatar: Option<String>,
    hot_take: Option<String>,
}

/// Drives one generation call against a [`LanguageModel`].
pub struct HotTakeGenerator<'a> {
    model: &'a dyn LanguageModel,
    api_key: &'a str,
    temperature: f32,
}

impl<'a> HotTakeGenerator<'a> {
    pub fn new(model: &'a dyn LanguageModel, api_key: &'a str, temperature: f32) -> Self {
        Self { model, api_key, temperature }
    }

    async fn invoke(&self, prompt: String, format: ResponseFormat) -> Result<String> {
        let completion = Completion {
            prompt,
            temperature: self.temperature,
            format,
        };
        debug!(model = self.model.name(), ?format, "invoking model");
        self.model.complete(self.api_key, &completion).await
    }

    /// A single figure reacting in character.
    pub async fn in_character(&self, persona: &Persona, headline: &str, language: Language) -> Result<String> {
        let reply = self
            .invoke(prompt::in_character(persona, headline, language), ResponseFormat::Text)
            .await?;

        let hot_take = reply.trim();
        if hot_take.is_empty() {
            return Err(AppError::GenerationError("model returned an empty reply".to_string()));
        }

        info!(figure = %persona.name, chars = hot_take.len(), "generated hot take");
        Ok(hot_take.to_string())
    }

    /// Lets the model choose among `candidates`. Unknown ids fall back to the first candidate.
    pub async fn best_from_catalog(
        &self,
        headline: &str,
        candidates: &[CandidateFigure],
        language: Language,
    ) -> Result<BestPick> {
        let first = candidates
            .first()
            .ok_or_else(|| AppError::ValidationError("Missing headline or figures".to_string()))?;

        let reply = self
            .invoke(prompt::best_of_catalog(headline, candidates, language), ResponseFormat::Json)
            .await?;
        info!(raw = %reply, "model reply");

        let parsed: CatalogReply = parse_reply(&reply)?;
        let hot_take = require_hot_take(parsed.hot_take)?;

        let figure_id = match parsed.figure_id {
            Some(serde_json::Value::String(id)) if candidates.iter().any(|c| c.id == id) => id,
            other => {
                warn!(returned = ?other, fallback = %first.id, "model picked an unknown figure id");
                first.id.clone()
            }
        };

        info!(figure_id = %figure_id, "selected figure");
        Ok(BestPick { figure_id, hot_take })
    }

    /// Lets the model invent the figure.
    pub async fn invent(&self, headline: &str, language: Language) -> Result<InventedTake> {
        let reply = self
            .invoke(prompt::open_catalog(headline, language), ResponseFormat::Json)
            .await?;
        info!(raw = %reply, "model reply");

        let parsed: OpenReply = parse_reply(&reply)?;
        let hot_take = require_hot_take(parsed.hot_take)?;
        let name = parsed
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| AppError::GenerationError("model reply has no figure name".to_string()))?;

        let figure = GeneratedFigure {
            name,
            title: parsed.title.unwrap_or_default(),
            era: parsed.era.unwrap_or_default(),
            avatar: parsed
                .avatar
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
        };

        info!(figure = %figure.name, "generated figure");
        Ok(InventedTake { figure, hot_take })
    }
}

fn parse_reply<T: serde::de::DeserializeOwned>(reply: &str) -> Result<T> {
    let span = find_json_object(reply).ok_or_else(|| {
        error!("Failed to parse JSON from response");
        AppError::InvalidResponseFormat
    })?;

    serde_json::from_str(span).map_err(|e| AppError::GenerationError(e.to_string()))
}

fn require_hot_take(hot_take: Option<String>) -> Result<String> {
    hot_take
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::GenerationError("model reply has no hot_take".to_string()))
}
