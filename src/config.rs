use std::str::FromStr;
use std::time::Duration;

use crate::obscure::ObscureOptions;
use crate::wiki::DEFAULT_API_URL;

pub const DEFAULT_USER_AGENT: &str =
    "FootballCareerQuiz/1.0 (https://github.com/footy-quiz/footy-quiz; footy-quiz@example.org)";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Service configuration loaded from environment variables.
///
/// Every field has a default suitable for local development.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// MediaWiki action API endpoint.
    pub api_url: String,
    /// User-Agent sent with every upstream call, as Wikimedia asks clients to identify themselves.
    pub user_agent: String,
    /// Per-call timeout for upstream requests, in seconds (default: `10`).
    pub upstream_timeout_secs: u64,
    /// Whole-request timeout, in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Relevance lead a search hit needs over the runner-up (default: `20`).
    pub ambiguity_margin: u32,
    /// Maximum autocomplete suggestions (default: `5`).
    pub suggestion_limit: usize,
    /// Also redact name variants inside honours (default: `false`).
    pub redact_honours: bool,
    /// Include error details in API error bodies (default: `false`).
    pub debug: bool,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            upstream_timeout_secs: 10,
            request_timeout_secs: 30,
            ambiguity_margin: 20,
            suggestion_limit: 5,
            redact_honours: false,
            debug: false,
        }
    }
}

impl QuizConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                              |
    /// |-------------------------|--------------------------------------|
    /// | `HOST`                  | `0.0.0.0`                            |
    /// | `PORT`                  | `8000`                               |
    /// | `WIKI_API_URL`          | `https://en.wikipedia.org/w/api.php` |
    /// | `WIKI_USER_AGENT`       | [`DEFAULT_USER_AGENT`]               |
    /// | `UPSTREAM_TIMEOUT_SECS` | `10`                                 |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                                 |
    /// | `AMBIGUITY_MARGIN`      | `20`                                 |
    /// | `SUGGESTION_LIMIT`      | `5`                                  |
    /// | `QUIZ_REDACT_HONOURS`   | `false`                              |
    /// | `QUIZ_DEBUG`            | `false`                              |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`QuizConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let string = |key: &str, default: String| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(default)
        };

        Ok(Self {
            host: string("HOST", defaults.host),
            port: parse(&lookup, "PORT", defaults.port)?,
            api_url: string("WIKI_API_URL", defaults.api_url),
            user_agent: string("WIKI_USER_AGENT", defaults.user_agent),
            upstream_timeout_secs: parse(
                &lookup,
                "UPSTREAM_TIMEOUT_SECS",
                defaults.upstream_timeout_secs,
            )?,
            request_timeout_secs: parse(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
            ambiguity_margin: parse(&lookup, "AMBIGUITY_MARGIN", defaults.ambiguity_margin)?,
            suggestion_limit: parse(&lookup, "SUGGESTION_LIMIT", defaults.suggestion_limit)?,
            redact_honours: flag(&lookup, "QUIZ_REDACT_HONOURS", defaults.redact_honours)?,
            debug: flag(&lookup, "QUIZ_DEBUG", defaults.debug)?,
        })
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn obscure_options(&self) -> ObscureOptions {
        ObscureOptions {
            redact_honours: self.redact_honours,
        }
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn flag(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value }),
        },
    }
}
