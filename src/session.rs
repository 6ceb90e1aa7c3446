//! Client-side orchestration of one reading session.
//!
//! A session moves `Idle -> Loading -> Displaying | Failed` and re-enters
//! `Loading` on every user action. Each action is issued a [`Ticket`]; a
//! completion is applied only when its ticket is still the latest one, so a
//! slow response can never overwrite the result of a newer action.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::client::{fetch_random_article, GazetteApi};
use crate::error::Result;
use crate::figures::{self, Figure};
use crate::i18n::Language;
use crate::news::Article;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Displaying,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    LoadFailed,
    GenerationFailed,
}

#[derive(Debug, Clone)]
pub struct Session {
    language: Language,
    phase: Phase,
    article: Option<Article>,
    figure: Option<Figure>,
    hot_take: Option<String>,
    error: Option<&'static str>,
    displayed_at: Option<DateTime<Utc>>,
    issued: u64,
    initial_load_claimed: bool,
}

impl Session {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            phase: Phase::Idle,
            article: None,
            figure: None,
            hot_take: None,
            error: None,
            displayed_at: None,
            issued: 0,
            initial_load_claimed: false,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn article(&self) -> Option<&Article> {
        self.article.as_ref()
    }

    pub fn figure(&self) -> Option<&Figure> {
        self.figure.as_ref()
    }

    pub fn hot_take(&self) -> Option<&str> {
        self.hot_take.as_deref()
    }

    /// Localized message for the last failure, if the session is failed.
    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn displayed_at(&self) -> Option<DateTime<Utc>> {
        self.displayed_at
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Returns true exactly once, for the first caller.
    pub fn claim_initial_load(&mut self) -> bool {
        !std::mem::replace(&mut self.initial_load_claimed, true)
    }

    fn issue(&mut self) -> Ticket {
        self.issued += 1;
        self.phase = Phase::Loading;
        self.error = None;
        Ticket(self.issued)
    }

    /// Starts a load that replaces article, figure and take.
    pub fn begin_fresh(&mut self) -> Ticket {
        self.article = None;
        self.figure = None;
        self.hot_take = None;
        self.issue()
    }

    /// Starts a load that keeps the article but swaps the figure.
    pub fn begin_switch(&mut self, figure: Figure) -> Ticket {
        self.figure = Some(figure);
        self.hot_take = None;
        self.issue()
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    pub fn article_fetched(&mut self, ticket: Ticket, article: Article) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.article = Some(article);
        true
    }

    pub fn complete(&mut self, ticket: Ticket, figure: Figure, hot_take: String) -> bool {
        if !self.is_current(ticket) {
            debug!(?ticket, latest = self.issued, "discarding stale result");
            return false;
        }
        self.figure = Some(figure);
        self.hot_take = Some(hot_take);
        self.phase = Phase::Displaying;
        self.displayed_at = Some(Utc::now());
        true
    }

    pub fn fail(&mut self, ticket: Ticket, failure: Failure) -> bool {
        if !self.is_current(ticket) {
            debug!(?ticket, latest = self.issued, "discarding stale failure");
            return false;
        }
        let t = self.language.translations();
        self.error = Some(match failure {
            Failure::LoadFailed => t.error_load,
            Failure::GenerationFailed => t.error_generate,
        });
        self.phase = Phase::Failed;
        true
    }
}

/// Which generator endpoint a fresh load uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// The model picks from the fixed catalog.
    #[default]
    Catalog,
    /// The model invents a figure.
    Open,
}

/// Runs session actions against a [`GazetteApi`].
///
/// The session lock is never held across a network call, so actions may
/// overlap; tickets decide which result lands.
pub struct Orchestrator<A> {
    api: A,
    variant: Variant,
    session: Mutex<Session>,
}

impl<A: GazetteApi> Orchestrator<A> {
    pub fn new(api: A, language: Language) -> Self {
        Self::with_variant(api, language, Variant::Catalog)
    }

    pub fn with_variant(api: A, language: Language, variant: Variant) -> Self {
        Self {
            api,
            variant,
            session: Mutex::new(Session::new(language)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    /// First load after start-up. Later calls are ignored.
    pub async fn initial_load(&self) -> bool {
        if !self.lock().claim_initial_load() {
            debug!("initial load already started");
            return false;
        }
        self.load_fresh().await;
        true
    }

    pub async fn new_story(&self) {
        self.load_fresh().await;
    }

    pub async fn change_language(&self, language: Language) {
        self.lock().set_language(language);
        self.load_fresh().await;
    }

    /// Regenerates the take for the current article in another catalog figure's voice.
    ///
    /// Returns false without any network call in the open variant, when there
    /// is no article, the id is unknown, or the figure is already the current one.
    pub async fn switch_figure(&self, figure_id: &str) -> bool {
        if self.variant == Variant::Open {
            return false;
        }
        let (ticket, persona, headline, language) = {
            let mut session = self.lock();
            let Some(target) = figures::find(figure_id) else {
                warn!(figure_id, "unknown figure");
                return false;
            };
            let Some(headline) = session.article().map(|a| a.title.clone()) else {
                return false;
            };
            if session.figure().and_then(Figure::catalog_id) == Some(figure_id) {
                return false;
            }
            let ticket = session.begin_switch(Figure::Catalog(target.clone()));
            (ticket, target.as_persona(), headline, session.language())
        };

        match self.api.generate_hot_take(&persona, &headline, language).await {
            Ok(hot_take) => {
                let figure = Figure::Catalog(figures::find_or_first(figure_id).clone());
                self.lock().complete(ticket, figure, hot_take);
            }
            Err(err) => {
                warn!("Failed to generate hot take: {}", err);
                self.lock().fail(ticket, Failure::GenerationFailed);
            }
        }
        true
    }

    async fn load_fresh(&self) {
        let (ticket, language) = {
            let mut session = self.lock();
            (session.begin_fresh(), session.language())
        };

        let Some(article) = fetch_random_article(&self.api).await else {
            self.lock().fail(ticket, Failure::LoadFailed);
            return;
        };
        let headline = article.title.clone();
        if !self.lock().article_fetched(ticket, article) {
            return;
        }

        match self.generate(&headline, language).await {
            Ok((figure, hot_take)) => {
                info!(figure = %figure.name(), "figure selected");
                self.lock().complete(ticket, figure, hot_take);
            }
            Err(err) => {
                warn!("Failed to generate hot take: {}", err);
                self.lock().fail(ticket, Failure::GenerationFailed);
            }
        }
    }

    async fn generate(&self, headline: &str, language: Language) -> Result<(Figure, String)> {
        match self.variant {
            Variant::Catalog => {
                let candidates = figures::catalog_candidates();
                let pick = self.api.generate_best(headline, &candidates, language).await?;
                let figure = figures::find_or_first(&pick.figure_id).clone();
                Ok((Figure::Catalog(figure), pick.hot_take))
            }
            Variant::Open => {
                let take = self.api.generate_open(headline, language).await?;
                Ok((Figure::Generated(take.figure), take.hot_take))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use async_trait::async_trait;

    use crate::error::AppError;
    use crate::figures::{CandidateFigure, GeneratedFigure, Persona};
    use crate::hot_take::{BestPick, InventedTake};
    use crate::news::ArticleSource;

    /// Scripted backend. `best_delays[n]` delays the n-th best-figure call.
    #[derive(Default)]
    struct Scripted {
        articles: Vec<Article>,
        best_figure: String,
        best_delays: Vec<u64>,
        fail_generation: bool,
        news_calls: AtomicUsize,
        best_calls: AtomicUsize,
        take_calls: AtomicUsize,
    }

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            source: ArticleSource { name: "Gazette".into() },
            url: "https://example.test".into(),
            published_at: "2024-01-01T00:00:00Z".into(),
        }
    }

    #[async_trait]
    impl GazetteApi for Scripted {
        async fn fetch_news(&self, _category: &str) -> Result<Vec<Article>> {
            self.news_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.articles.clone())
        }

        async fn generate_hot_take(&self, persona: &Persona, headline: &str, _: Language) -> Result<String> {
            self.take_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_generation {
                return Err(AppError::NetworkError("boom".into()));
            }
            Ok(format!("{} on {}", persona.name, headline))
        }

        async fn generate_best(&self, headline: &str, _: &[CandidateFigure], _: Language) -> Result<BestPick> {
            let call = self.best_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(ms) = self.best_delays.get(call) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            if self.fail_generation {
                return Err(AppError::NetworkError("boom".into()));
            }
            Ok(BestPick {
                figure_id: self.best_figure.clone(),
                hot_take: format!("take #{} on {}", call, headline),
            })
        }

        async fn generate_open(&self, headline: &str, _: Language) -> Result<InventedTake> {
            Ok(InventedTake {
                figure: GeneratedFigure {
                    name: "Ada Lovelace".into(),
                    title: "Countess of Lovelace".into(),
                    era: "1815-1852".into(),
                    avatar: "🧮".into(),
                },
                hot_take: format!("My engine predicted {}", headline),
            })
        }
    }

    fn scripted(figure: &str) -> Scripted {
        Scripted {
            articles: vec![article("Moon for sale")],
            best_figure: figure.to_string(),
            ..Scripted::default()
        }
    }

    #[tokio::test]
    async fn test_initial_load_displays_selected_figure() {
        let orchestrator = Orchestrator::new(scripted("napoleon"), Language::En);
        assert_eq!(orchestrator.snapshot().phase(), Phase::Idle);

        assert!(orchestrator.initial_load().await);
        let session = orchestrator.snapshot();
        assert_eq!(session.phase(), Phase::Displaying);
        assert_eq!(session.figure().and_then(Figure::catalog_id), Some("napoleon"));
        assert_eq!(session.hot_take(), Some("take #0 on Moon for sale"));
        assert_eq!(session.article().map(|a| a.title.as_str()), Some("Moon for sale"));
        assert!(session.error().is_none());
        assert!(session.displayed_at().is_some());
    }

    #[tokio::test]
    async fn test_initial_load_runs_once() {
        let orchestrator = Orchestrator::new(scripted("napoleon"), Language::En);
        assert!(orchestrator.initial_load().await);
        assert!(!orchestrator.initial_load().await);
        assert_eq!(orchestrator.api.news_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_figure_id_joins_to_first_catalog_entry() {
        let orchestrator = Orchestrator::new(scripted("unknown-id"), Language::En);
        orchestrator.new_story().await;
        let session = orchestrator.snapshot();
        assert_eq!(session.figure().and_then(Figure::catalog_id), Some("shakespeare"));
    }

    #[tokio::test]
    async fn test_empty_news_fails_without_generating() {
        let api = Scripted { articles: vec![], ..scripted("napoleon") };
        let orchestrator = Orchestrator::new(api, Language::Fr);
        orchestrator.new_story().await;

        let session = orchestrator.snapshot();
        assert_eq!(session.phase(), Phase::Failed);
        assert_eq!(session.error(), Some(Language::Fr.translations().error_load));
        assert_eq!(orchestrator.api.best_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generation_error_is_localized() {
        let api = Scripted { fail_generation: true, ..scripted("napoleon") };
        let orchestrator = Orchestrator::new(api, Language::En);
        orchestrator.new_story().await;

        let session = orchestrator.snapshot();
        assert_eq!(session.phase(), Phase::Failed);
        assert_eq!(session.error(), Some(Language::En.translations().error_generate));
        assert!(session.article().is_some());
        assert!(session.hot_take().is_none());
    }

    #[tokio::test]
    async fn test_switch_to_current_figure_is_a_noop() {
        let orchestrator = Orchestrator::new(scripted("napoleon"), Language::En);
        orchestrator.new_story().await;

        assert!(!orchestrator.switch_figure("napoleon").await);
        assert!(!orchestrator.switch_figure("nobody").await);
        assert_eq!(orchestrator.api.take_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_switch_without_article_is_a_noop() {
        let orchestrator = Orchestrator::new(scripted("napoleon"), Language::En);
        assert!(!orchestrator.switch_figure("caesar").await);
        assert_eq!(orchestrator.api.take_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_switch_keeps_article_and_replaces_take() {
        let orchestrator = Orchestrator::new(scripted("napoleon"), Language::En);
        orchestrator.new_story().await;

        assert!(orchestrator.switch_figure("caesar").await);
        let session = orchestrator.snapshot();
        assert_eq!(session.phase(), Phase::Displaying);
        assert_eq!(session.figure().and_then(Figure::catalog_id), Some("caesar"));
        assert_eq!(session.hot_take(), Some("Julius Caesar on Moon for sale"));
        assert_eq!(orchestrator.api.news_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_language_change_reloads() {
        let orchestrator = Orchestrator::new(scripted("napoleon"), Language::Fr);
        orchestrator.new_story().await;
        orchestrator.change_language(Language::En).await;

        let session = orchestrator.snapshot();
        assert_eq!(session.language(), Language::En);
        assert_eq!(session.phase(), Phase::Displaying);
        assert_eq!(orchestrator.api.news_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded() {
        let api = Scripted { best_delays: vec![200, 0], ..scripted("napoleon") };
        let orchestrator = Orchestrator::new(api, Language::En);

        tokio::join!(orchestrator.new_story(), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            orchestrator.new_story().await;
        });

        let session = orchestrator.snapshot();
        assert_eq!(session.phase(), Phase::Displaying);
        assert_eq!(session.hot_take(), Some("take #1 on Moon for sale"));
    }

    #[tokio::test]
    async fn test_open_variant_displays_generated_figure() {
        let orchestrator = Orchestrator::with_variant(scripted("napoleon"), Language::En, Variant::Open);
        orchestrator.new_story().await;

        let session = orchestrator.snapshot();
        assert!(matches!(session.figure(), Some(Figure::Generated(f)) if f.name == "Ada Lovelace"));
        assert_eq!(session.hot_take(), Some("My engine predicted Moon for sale"));
        assert!(!orchestrator.switch_figure("caesar").await);
        assert_eq!(orchestrator.api.best_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_tickets_supersede_each_other() {
        let mut session = Session::new(Language::En);
        let first = session.begin_fresh();
        let second = session.begin_fresh();
        assert!(!session.is_current(first));
        assert!(!session.fail(first, Failure::LoadFailed));
        assert_eq!(session.phase(), Phase::Loading);
        assert!(session.fail(second, Failure::LoadFailed));
        assert_eq!(session.phase(), Phase::Failed);

        // Entering loading again clears the error
        session.begin_fresh();
        assert!(session.error().is_none());
    }
}
