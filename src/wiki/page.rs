use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{QuizError, Result};
use crate::model::ResolvedPage;
use crate::wiki::{self, ApiErrorBody};

#[derive(Debug, Deserialize)]
struct ParseResponse {
    parse: Option<ParseBody>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ParseBody {
    title: String,
    text: String,
}

/// Fetch the rendered HTML of a page through `action=parse`.
#[instrument(skip(client))]
pub(crate) async fn fetch_page(
    client: &reqwest::Client,
    api_url: &str,
    title: &str,
) -> Result<ResolvedPage> {
    let response: ParseResponse = wiki::get_json(
        client,
        api_url,
        &[
            ("action", "parse"),
            ("page", title),
            ("prop", "text"),
            ("redirects", "1"),
        ],
    )
    .await?;

    match (response.parse, response.error) {
        (_, Some(err)) if err.code == "missingtitle" || err.code == "invalidtitle" => {
            Err(QuizError::NotFound {
                query: title.to_string(),
            })
        }
        (_, Some(err)) => Err(err.into()),
        (Some(parse), None) => {
            debug!(title = %parse.title, bytes = parse.text.len(), "fetched page");
            Ok(ResolvedPage {
                title: parse.title,
                markup: parse.text,
            })
        }
        (None, None) => Err(QuizError::Api {
            code: "noparse".to_string(),
            info: format!("parse response for {title:?} carried no page"),
        }),
    }
}
