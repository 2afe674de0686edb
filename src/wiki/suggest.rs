use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::model::Suggestion;
use crate::wiki;

/// Shorter prefixes are too vague to be worth an upstream call.
pub const MIN_SUGGEST_CHARS: usize = 3;

/// Autocomplete player names through `action=opensearch`.
///
/// Twice `limit` results are requested so that the footballer-biased search
/// still fills the list after truncation.
#[instrument(skip(client))]
pub(crate) async fn suggest_players(
    client: &reqwest::Client,
    api_url: &str,
    partial: &str,
    limit: usize,
) -> Result<Vec<Suggestion>> {
    let partial = partial.trim();
    if partial.chars().count() < MIN_SUGGEST_CHARS || limit == 0 {
        return Ok(Vec::new());
    }

    let search = format!("{partial} footballer");
    let fetch_limit = limit.saturating_mul(2).to_string();
    let response: Value = wiki::get_json(
        client,
        api_url,
        &[
            ("action", "opensearch"),
            ("search", &search),
            ("limit", &fetch_limit),
            ("namespace", "0"),
        ],
    )
    .await?;

    let suggestions = parse_opensearch(&response, limit);
    debug!(count = suggestions.len(), partial, "parsed suggestions");
    Ok(suggestions)
}

/// OpenSearch answers `[query, [names], [descriptions], [urls]]`.
fn parse_opensearch(response: &Value, limit: usize) -> Vec<Suggestion> {
    let names = response.get(1).and_then(Value::as_array);
    let urls = response.get(3).and_then(Value::as_array);

    names
        .into_iter()
        .flatten()
        .enumerate()
        .filter_map(|(idx, name)| {
            let name = name.as_str()?.to_string();
            let page_title = urls
                .and_then(|urls| urls.get(idx))
                .and_then(Value::as_str)
                .and_then(title_from_url)
                .unwrap_or_else(|| name.clone());
            Some(Suggestion { name, page_title })
        })
        .take(limit)
        .collect()
}

/// `https://en.wikipedia.org/wiki/Kylian_Mbapp%C3%A9` -> `Kylian Mbappé`
fn title_from_url(url: &str) -> Option<String> {
    let (_, encoded) = url.split_once("/wiki/")?;
    let encoded = encoded.replace('+', "%2B");
    // form_urlencoded decodes percent escapes; the `+` guard keeps literal plus signs.
    let (decoded, _) = url::form_urlencoded::parse(encoded.as_bytes()).next()?;
    Some(decoded.replace('_', " "))
}
