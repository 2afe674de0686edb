use tracing::{info, instrument};

use crate::config::{QuizConfig, DEFAULT_USER_AGENT};
use crate::error::{QuizError, Result};
use crate::extract::extract_career;
use crate::model::*;
use crate::obscure::{obscure, ObscureOptions};
use crate::wiki;

/// The main entry point for building quiz rounds from Wikipedia.
///
/// `WikiClient` wraps a [`reqwest::Client`] and exposes the three steps of a
/// round: resolving a name to a page, extracting the career, and masking it.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> footy_quiz::Result<()> {
/// use footy_quiz::{PlayerQuery, WikiClient};
///
/// let client = WikiClient::new()?;
/// let quiz = client.get_player(&PlayerQuery::new("Lionel Messi")).await?;
/// println!("{} clubs to guess from", quiz.career.record().clubs.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WikiClient {
    http: reqwest::Client,
    api_url: String,
    ambiguity_margin: u32,
    obscure_options: ObscureOptions,
}

impl WikiClient {
    /// Create a client for English Wikipedia with default settings.
    pub fn new() -> Result<Self> {
        Self::from_config(&QuizConfig::default())
    }

    /// Create a client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure proxies, headers, etc. The caller
    /// is responsible for setting a descriptive User-Agent.
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let defaults = QuizConfig::default();
        Self {
            http: client,
            api_url: api_url.into(),
            ambiguity_margin: defaults.ambiguity_margin,
            obscure_options: defaults.obscure_options(),
        }
    }

    pub fn from_config(config: &QuizConfig) -> Result<Self> {
        let user_agent = if config.user_agent.is_empty() {
            DEFAULT_USER_AGENT
        } else {
            config.user_agent.as_str()
        };
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(config.upstream_timeout())
            .build()
            .map_err(QuizError::ClientBuild)?;

        Ok(Self::with_client(http, config.api_url.clone())
            .ambiguity_margin(config.ambiguity_margin)
            .obscure_options(config.obscure_options()))
    }

    /// Relevance lead a search hit needs over the runner-up to be chosen.
    pub fn ambiguity_margin(mut self, margin: u32) -> Self {
        self.ambiguity_margin = margin;
        self
    }

    pub fn obscure_options(mut self, options: ObscureOptions) -> Self {
        self.obscure_options = options;
        self
    }

    /// Resolve a player name to exactly one page and fetch its HTML.
    #[instrument(skip(self))]
    pub async fn resolve(&self, query: &PlayerQuery) -> Result<ResolvedPage> {
        wiki::lookup::resolve(&self.http, &self.api_url, query, self.ambiguity_margin).await
    }

    /// Autocomplete player names. Prefixes shorter than three characters yield nothing.
    #[instrument(skip(self))]
    pub async fn suggest(&self, partial: &str, limit: usize) -> Result<Vec<Suggestion>> {
        wiki::suggest::suggest_players(&self.http, &self.api_url, partial, limit).await
    }

    /// Build a full quiz round: resolve, extract, then mask the name.
    #[instrument(skip(self))]
    pub async fn get_player(&self, query: &PlayerQuery) -> Result<PlayerQuiz> {
        let page = self.resolve(query).await?;
        let record = extract_career(&page.markup, &page.title)?;
        let career = obscure(record, &page.title, self.obscure_options);

        info!(title = %page.title, clubs = career.record().clubs.len(), "built quiz round");
        Ok(PlayerQuiz {
            wikipedia_title: page.title,
            search_query: query.normalized(),
            career,
        })
    }
}
