pub(crate) mod lookup;
pub(crate) mod page;
pub(crate) mod suggest;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::{QuizError, Result};

pub const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";

const BASE_URL: &str = "https://en.wikipedia.org";

/// Error object the action API embeds in an otherwise successful response.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: String,
    #[serde(default)]
    pub info: String,
}

impl From<ApiErrorBody> for QuizError {
    fn from(err: ApiErrorBody) -> Self {
        QuizError::Api {
            code: err.code,
            info: err.info,
        }
    }
}

/// Call the MediaWiki action API and decode the JSON body.
///
/// `format=json&formatversion=2` is always appended.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    api_url: &str,
    params: &[(&str, &str)],
) -> Result<T> {
    let url = url::Url::parse_with_params(
        api_url,
        params
            .iter()
            .copied()
            .chain([("format", "json"), ("formatversion", "2")]),
    )
    .map_err(|source| QuizError::InvalidApiUrl {
        url: api_url.to_owned(),
        source,
    })?;
    let url_text = url.to_string();
    debug!(url = %url_text, "querying wikipedia");

    let response = client.get(url).send().await.map_err(|e| QuizError::Http {
        url: url_text.clone(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(QuizError::UnexpectedStatus {
            url: url_text,
            status,
        });
    }

    let body = response.text().await.map_err(|e| QuizError::ResponseBody {
        url: url_text.clone(),
        source: e,
    })?;

    serde_json::from_str(&body).map_err(|source| QuizError::Decode {
        url: url_text,
        source,
    })
}

/// Normalize a potentially relative image URL to an absolute Wikipedia URL.
pub(crate) fn normalize_img_url(src: &str) -> String {
    if src.starts_with("//") {
        format!("https:{src}")
    } else if src.starts_with('/') {
        format!("{BASE_URL}{src}")
    } else {
        src.to_string()
    }
}

/// Strip a trailing parenthesised disambiguator: `"John Doe (footballer)"` -> `"John Doe"`.
pub(crate) fn strip_disambiguator(title: &str) -> &str {
    let trimmed = title.trim();
    match trimmed.rfind(" (") {
        Some(idx) if trimmed.ends_with(')') => trimmed[..idx].trim_end(),
        _ => trimmed,
    }
}
