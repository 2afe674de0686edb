use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use scraper::Html;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{QuizError, Result};
use crate::model::{PlayerQuery, ResolvedPage, SearchCandidate};
use crate::wiki::{self, page, ApiErrorBody};

const MAX_QUERY_CHARS: usize = 200;
const TITLE_SUFFIXES: &[&str] = &[" (footballer)", " (soccer)", " (soccer player)"];
const SEARCH_LIMIT: &str = "10";
const MAX_REPORTED_CANDIDATES: usize = 5;

const FOOTBALL_KEYWORDS: &[&str] = &[
    "footballer",
    "soccer player",
    "football player",
    "midfielder",
    "forward",
    "defender",
    "goalkeeper",
    "striker",
    "winger",
    "centre-back",
    "full-back",
    "football career",
    "football club",
    "national team",
];

const FOOTBALL_COMPETITIONS: &[&str] = &[
    "premier league",
    "la liga",
    "bundesliga",
    "serie a",
    "ligue 1",
    "champions league",
    "world cup",
    "uefa",
    "fifa",
    "copa america",
    "copa américa",
    "conmebol",
    "concacaf",
];

static DISAMBIGUATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((?:[\w\s-]+ )?(?:football(?:er)?|soccer(?: player)?)\)").expect("valid regex")
});
static STATS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"caps|goals|appearances|matches|scored").expect("valid regex"));
static CAREER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"career|season|signed|transfer|club|team").expect("valid regex"));

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: QueryBody,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
struct QueryBody {
    #[serde(default)]
    normalized: Vec<TitleMapping>,
    #[serde(default)]
    redirects: Vec<TitleMapping>,
    #[serde(default)]
    pages: Vec<PageInfo>,
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct TitleMapping {
    from: String,
    to: String,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    pageprops: Option<PageProps>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    disambiguation: Option<String>,
}

impl PageInfo {
    fn is_article(&self) -> bool {
        let disambiguation = self
            .pageprops
            .as_ref()
            .is_some_and(|props| props.disambiguation.is_some());
        !self.missing && !self.invalid && !disambiguation
    }
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
    #[serde(default)]
    snippet: String,
}

/// Resolve a free-text player name to exactly one Wikipedia page.
///
/// An exact (or footballer-suffixed) title wins outright; otherwise the
/// full-text search must produce a candidate that leads the runner-up by at
/// least `ambiguity_margin` relevance points.
#[instrument(skip(client))]
pub(crate) async fn resolve(
    client: &reqwest::Client,
    api_url: &str,
    query: &PlayerQuery,
    ambiguity_margin: u32,
) -> Result<ResolvedPage> {
    let name = validate_query(query)?;

    let title = match find_exact_title(client, api_url, &name).await? {
        Some(title) => {
            debug!(query = %name, title, "exact title match");
            title
        }
        None => {
            let candidates = search_candidates(client, api_url, &name).await?;
            debug!(query = %name, count = candidates.len(), "ranked search candidates");
            pick_candidate(&name, candidates, ambiguity_margin)?.title
        }
    };

    page::fetch_page(client, api_url, &title).await
}

pub(crate) fn validate_query(query: &PlayerQuery) -> Result<String> {
    let name = query.normalized();
    if name.is_empty() {
        return Err(QuizError::InvalidInput(
            "Player name is required".to_string(),
        ));
    }
    if name.chars().count() > MAX_QUERY_CHARS {
        return Err(QuizError::InvalidInput(format!(
            "Player name must be at most {MAX_QUERY_CHARS} characters"
        )));
    }
    // `|` separates titles in the action API and never appears in a page title.
    if name.contains('|') {
        return Err(QuizError::InvalidInput(
            "Player name must not contain '|'".to_string(),
        ));
    }
    Ok(name)
}

/// Look up the query itself and its footballer-suffixed forms in a single call.
#[instrument(skip(client))]
async fn find_exact_title(
    client: &reqwest::Client,
    api_url: &str,
    name: &str,
) -> Result<Option<String>> {
    let candidates = title_candidates(name);
    let titles = candidates.join("|");
    let response: QueryResponse = wiki::get_json(
        client,
        api_url,
        &[
            ("action", "query"),
            ("prop", "pageprops"),
            ("redirects", "1"),
            ("titles", &titles),
        ],
    )
    .await?;

    if let Some(err) = response.error {
        return Err(err.into());
    }
    Ok(pick_exact_title(&candidates, &response.query))
}

fn title_candidates(name: &str) -> Vec<String> {
    let mut titles = vec![name.to_string()];
    if !name.ends_with(')') {
        titles.extend(TITLE_SUFFIXES.iter().map(|suffix| format!("{name}{suffix}")));
    }
    titles
}

/// The first candidate, in priority order, that lands on a real article once
/// title normalization and redirects are followed.
fn pick_exact_title(candidates: &[String], body: &QueryBody) -> Option<String> {
    candidates.iter().find_map(|candidate| {
        let mut title = candidate.as_str();
        if let Some(mapping) = body.normalized.iter().find(|m| m.from == title) {
            title = mapping.to.as_str();
        }
        if let Some(mapping) = body.redirects.iter().find(|m| m.from == title) {
            title = mapping.to.as_str();
        }
        body.pages
            .iter()
            .find(|page| page.title == title && page.is_article())
            .map(|page| page.title.clone())
    })
}

#[instrument(skip(client))]
async fn search_candidates(
    client: &reqwest::Client,
    api_url: &str,
    name: &str,
) -> Result<Vec<SearchCandidate>> {
    let search = format!("{name} footballer");
    let response: QueryResponse = wiki::get_json(
        client,
        api_url,
        &[
            ("action", "query"),
            ("list", "search"),
            ("srsearch", &search),
            ("srlimit", SEARCH_LIMIT),
            ("srprop", "snippet"),
            ("srnamespace", "0"),
        ],
    )
    .await?;

    if let Some(err) = response.error {
        return Err(err.into());
    }
    Ok(rank_hits(response.query.search))
}

/// Score hits for football relevance, drop irrelevant ones and sort best first.
/// Equal scores keep the upstream search order.
fn rank_hits(hits: Vec<SearchHit>) -> Vec<SearchCandidate> {
    hits.into_iter()
        .filter(|hit| !hit.title.contains("(disambiguation)"))
        .map(|hit| {
            let snippet = snippet_text(&hit.snippet);
            SearchCandidate {
                score: football_relevance(&hit.title, &snippet),
                title: hit.title,
            }
        })
        .filter(|candidate| candidate.score > 0)
        .sorted_by(|a, b| b.score.cmp(&a.score))
        .collect()
}

/// Search snippets carry `<span class="searchmatch">` highlighting.
fn snippet_text(snippet: &str) -> String {
    Html::parse_fragment(snippet)
        .root_element()
        .text()
        .collect::<String>()
}

pub(crate) fn football_relevance(title: &str, snippet: &str) -> u32 {
    let title = title.to_lowercase();
    let snippet = snippet.to_lowercase();
    let combined = format!("{title} {snippet}");
    let mut score = 0;

    if DISAMBIGUATOR_RE.is_match(&title) {
        score += 50;
    }
    if FOOTBALL_KEYWORDS.iter().any(|keyword| title.contains(keyword)) {
        score += 30;
    }
    score += 10 * FOOTBALL_KEYWORDS
        .iter()
        .filter(|keyword| snippet.contains(*keyword))
        .count() as u32;
    score += 5 * FOOTBALL_COMPETITIONS
        .iter()
        .filter(|league| combined.contains(*league))
        .count() as u32;
    if STATS_RE.is_match(&snippet) {
        score += 15;
    }
    if CAREER_RE.is_match(&snippet) {
        score += 10;
    }
    score
}

/// Choose the winning search candidate, or explain why none can be chosen.
///
/// `candidates` must already be sorted best first.
pub(crate) fn pick_candidate(
    query: &str,
    candidates: Vec<SearchCandidate>,
    ambiguity_margin: u32,
) -> Result<SearchCandidate> {
    let mut ranked = candidates.into_iter();
    let Some(top) = ranked.next() else {
        return Err(QuizError::NotFound {
            query: query.to_string(),
        });
    };

    let rest = ranked.collect_vec();
    match rest.first() {
        Some(second) if top.score < second.score.saturating_add(ambiguity_margin) => {
            let floor = top.score.saturating_sub(ambiguity_margin);
            let candidates = std::iter::once(&top)
                .chain(rest.iter())
                .filter(|candidate| candidate.score > floor)
                .take(MAX_REPORTED_CANDIDATES)
                .map(|candidate| candidate.title.clone())
                .collect();
            Err(QuizError::Ambiguous {
                query: query.to_string(),
                candidates,
            })
        }
        _ => Ok(top),
    }
}
