use serde::Serialize;

use super::ObscuredCareerRecord;

/// A player search as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerQuery {
    pub raw: String,
}

impl PlayerQuery {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The query with surrounding whitespace removed and inner runs collapsed.
    pub fn normalized(&self) -> String {
        self.raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Exactly one Wikipedia page chosen for a query, with its rendered HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPage {
    pub title: String,
    pub markup: String,
}

/// A search hit together with its football relevance score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidate {
    pub title: String,
    pub score: u32,
}

/// An autocomplete entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub name: String,
    pub page_title: String,
}

/// Everything the quiz page needs for one player: the masked résumé and the answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerQuiz {
    pub wikipedia_title: String,
    pub search_query: String,
    pub career: ObscuredCareerRecord,
}
