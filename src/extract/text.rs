use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

static CITATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(?:\d+|[a-z]{1,2}|[A-Z]|note \d+|nb \d+|citation needed|edit)\]")
        .expect("valid regex")
});

/// Visible text of `element`, cleaned of citation markers and extra whitespace.
pub(crate) fn element_text(element: &ElementRef) -> String {
    let mut raw = String::new();
    push_visible_text(element, &mut raw, false);
    clean_text(&raw)
}

/// Like [`element_text`] but leaves out nested lists, so a list item does not
/// repeat the text of its sub-items.
pub(crate) fn own_text(element: &ElementRef) -> String {
    let mut raw = String::new();
    push_visible_text(element, &mut raw, true);
    clean_text(&raw)
}

fn push_visible_text(element: &ElementRef, out: &mut String, skip_lists: bool) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            let name = child.value().name();
            if is_hidden(&child) || (skip_lists && matches!(name, "ul" | "ol" | "dl")) {
                continue;
            }
            if matches!(name, "br" | "li" | "dd" | "dt" | "p" | "div") {
                out.push(' ');
            }
            push_visible_text(&child, out, skip_lists);
            if matches!(name, "li" | "dd" | "dt" | "p" | "div") {
                out.push(' ');
            }
        }
    }
}

fn is_hidden(element: &ElementRef) -> bool {
    let value = element.value();
    if matches!(value.name(), "style" | "script") {
        return true;
    }
    if value
        .classes()
        .any(|c| matches!(c, "reference" | "noprint" | "sortkey" | "mw-editsection"))
    {
        return true;
    }
    value.attr("style").is_some_and(|style| {
        style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .contains("display:none")
    })
}

/// Remove citation markers like `[12]` or `[a]` and collapse whitespace.
pub(crate) fn clean_text(text: &str) -> String {
    CITATION_RE
        .replace_all(text, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse an appearances/goals cell. `"(474)"`, `"520†"` and `"1,012"` all
/// read as numbers; blanks, dashes and anything else are unknown.
pub(crate) fn parse_count(text: &str) -> Option<u32> {
    text.trim_matches(|c: char| !c.is_alphanumeric())
        .replace(',', "")
        .parse()
        .ok()
}

pub(crate) fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
