use scraper::error::SelectorErrorKind;

/// All errors that can occur while resolving, extracting or obscuring a player.
#[derive(thiserror::Error, Debug)]
pub enum QuizError {
    /// The player query was empty or otherwise unusable.
    #[error("invalid query: {0}")]
    InvalidInput(String),

    /// No Wikipedia page matched the query.
    #[error("no page found for {query:?}")]
    NotFound { query: String },

    /// Several pages matched and none was clearly the best.
    #[error("{query:?} is ambiguous between {}", .candidates.join(", "))]
    Ambiguous {
        query: String,
        candidates: Vec<String>,
    },

    /// The resolved page does not look like a football biography.
    #[error("{title:?} does not look like a footballer's page")]
    NotAFootballer { title: String },

    /// The page has career markers but their content could not be read.
    #[error("malformed career data: {context}")]
    MalformedData { context: String },

    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Wikipedia returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// The response body was not the JSON shape the API documents.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    /// The API answered with an error object we do not handle specifically.
    #[error("wikipedia api error {code}: {info}")]
    Api { code: String, info: String },

    /// The configured API endpoint is not a valid URL.
    #[error("invalid api url {url}: {source}")]
    InvalidApiUrl {
        url: String,
        source: url::ParseError,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The whole request outlived the server's request timeout.
    #[error("request did not complete within {after_secs}s")]
    RequestTimeout { after_secs: u64 },

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),
}

impl<'a> From<SelectorErrorKind<'a>> for QuizError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        QuizError::Selector(err.to_string())
    }
}

/// Stable, machine-readable failure category reported to API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    InvalidInput,
    NotFound,
    Ambiguous,
    UpstreamUnavailable,
    NotAFootballer,
    MalformedData,
    Timeout,
}

impl QuizError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            QuizError::InvalidInput(_) => ErrorCategory::InvalidInput,
            QuizError::NotFound { .. } => ErrorCategory::NotFound,
            QuizError::Ambiguous { .. } => ErrorCategory::Ambiguous,
            QuizError::NotAFootballer { .. } => ErrorCategory::NotAFootballer,
            QuizError::MalformedData { .. } | QuizError::Selector(_) => {
                ErrorCategory::MalformedData
            }
            QuizError::RequestTimeout { .. } => ErrorCategory::Timeout,
            QuizError::Http { source, .. } | QuizError::ResponseBody { source, .. }
                if source.is_timeout() =>
            {
                ErrorCategory::Timeout
            }
            QuizError::Http { .. }
            | QuizError::UnexpectedStatus { .. }
            | QuizError::ResponseBody { .. }
            | QuizError::Decode { .. }
            | QuizError::Api { .. }
            | QuizError::InvalidApiUrl { .. }
            | QuizError::ClientBuild(_) => ErrorCategory::UpstreamUnavailable,
        }
    }

    pub(crate) fn malformed(context: impl Into<String>) -> Self {
        QuizError::MalformedData {
            context: context.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QuizError>;
