use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{QuizError, Result};
use crate::extract::infobox::{is_total_row, row_cells};
use crate::extract::text::{element_text, non_empty, own_text, parse_count};
use crate::model::CareerSpell;

const HONOURS_SECTIONS: &[&str] = &["Honours", "Honors", "Achievements", "Awards"];
const CLUB_SECTIONS: &[&str] = &["Career statistics", "Club career", "Senior career"];
const NATIONAL_SECTIONS: &[&str] = &["International career", "National team", "International"];

/// Header keywords locating each column of a career wikitable.
struct TableColumns {
    name: &'static [&'static str],
    years: &'static [&'static str],
    apps: &'static [&'static str],
    goals: &'static [&'static str],
}

const CLUB_COLUMNS: TableColumns = TableColumns {
    name: &["club", "team"],
    years: &["years", "season"],
    apps: &["app", "games", "match"],
    goals: &["goal", "score"],
};

const NATIONAL_COLUMNS: TableColumns = TableColumns {
    name: &["team", "country"],
    years: &["years", "year", "period"],
    apps: &["app", "caps", "games"],
    goals: &["goal", "score"],
};

fn heading_level(element: &ElementRef) -> Option<u8> {
    match element.value().name() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Level of a section boundary: a bare heading, or the `div.mw-heading`
/// wrapper current parser output puts around it.
fn boundary_level(element: &ElementRef) -> Option<u8> {
    heading_level(element).or_else(|| {
        element
            .value()
            .classes()
            .any(|c| c == "mw-heading")
            .then(|| {
                element
                    .children()
                    .filter_map(ElementRef::wrap)
                    .find_map(|child| heading_level(&child))
            })
            .flatten()
    })
}

/// Sibling elements following the first heading that mentions one of
/// `titles`, up to the next heading of the same or a higher level.
///
/// Titles are tried in order, so earlier titles take priority.
pub(crate) fn find_section<'a>(
    document: &'a Html,
    titles: &[&str],
) -> Result<Option<Vec<ElementRef<'a>>>> {
    let heading_selector = Selector::parse("h2, h3, h4")?;
    let headings: Vec<(ElementRef, String)> = document
        .select(&heading_selector)
        .map(|heading| (heading, element_text(&heading).to_lowercase()))
        .collect();

    for title in titles {
        let title = title.to_lowercase();
        let Some((heading, _)) = headings.iter().find(|(_, text)| text.contains(&title)) else {
            continue;
        };
        let Some(level) = heading_level(heading) else {
            continue;
        };

        let anchor = heading
            .parent()
            .and_then(ElementRef::wrap)
            .filter(|parent| parent.value().classes().any(|c| c == "mw-heading"))
            .unwrap_or(*heading);

        let content = anchor
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .take_while(|element| boundary_level(element).map_or(true, |l| l > level))
            .collect();
        return Ok(Some(content));
    }
    Ok(None)
}

/// Every list item under the honours heading, in page order.
pub(crate) fn parse_honours(document: &Html) -> Result<Vec<String>> {
    let Some(section) = find_section(document, HONOURS_SECTIONS)? else {
        return Ok(Vec::new());
    };

    let item_selector = Selector::parse("li, dd")?;
    let honours: Vec<String> = section
        .iter()
        .flat_map(|element| element.select(&item_selector))
        .map(|item| own_text(&item))
        .filter(|text| !text.is_empty())
        .collect();

    debug!(count = honours.len(), "parsed honours");
    Ok(honours)
}

/// Club spells from wikitables in the career sections, for pages whose
/// infobox has no career rows. `None` when no career table exists at all.
pub(crate) fn parse_club_tables(document: &Html) -> Result<Option<Vec<CareerSpell>>> {
    let Some(section) = find_section(document, CLUB_SECTIONS)? else {
        return Ok(None);
    };
    parse_tables(&section, &CLUB_COLUMNS, |headers| {
        !headers.iter().any(|h| h.contains("national team"))
    })
}

pub(crate) fn parse_national_tables(document: &Html) -> Result<Option<Vec<CareerSpell>>> {
    if let Some(section) = find_section(document, NATIONAL_SECTIONS)? {
        if let Some(spells) = parse_tables(&section, &NATIONAL_COLUMNS, |_| true)? {
            return Ok(Some(spells));
        }
    }
    // Career statistics sections often hold the national team table as well.
    let Some(section) = find_section(document, CLUB_SECTIONS)? else {
        return Ok(None);
    };
    parse_tables(&section, &NATIONAL_COLUMNS, |headers| {
        headers.iter().any(|h| h.contains("national team"))
    })
}

fn parse_tables(
    section: &[ElementRef],
    columns: &TableColumns,
    accept: impl Fn(&[String]) -> bool,
) -> Result<Option<Vec<CareerSpell>>> {
    let table_selector = Selector::parse("table.wikitable")?;
    let tables = section.iter().flat_map(|element| {
        let own = element
            .value()
            .classes()
            .any(|c| c == "wikitable")
            .then_some(*element);
        own.into_iter().chain(element.select(&table_selector))
    });

    let mut found = None;
    for table in tables {
        if let Some(spells) = parse_table(&table, columns, &accept)? {
            found.get_or_insert_with(Vec::new).extend(spells);
        }
    }
    Ok(found)
}

fn parse_table(
    table: &ElementRef,
    columns: &TableColumns,
    accept: &impl Fn(&[String]) -> bool,
) -> Result<Option<Vec<CareerSpell>>> {
    let row_selector = Selector::parse("tr")?;
    let rows: Vec<ElementRef> = table.select(&row_selector).collect();

    let Some(header_idx) = rows.iter().position(|row| {
        let cells = row_cells(row);
        !cells.is_empty() && cells.iter().all(|cell| cell.value().name() == "th")
    }) else {
        return Ok(None);
    };

    let headers: Vec<String> = expand_row(&row_cells(&rows[header_idx]), &mut Vec::new())
        .into_iter()
        .map(|header| header.to_lowercase())
        .collect();
    if !accept(headers.as_slice()) {
        return Ok(None);
    }

    let find = |keys: &[&str]| {
        headers
            .iter()
            .position(|header| keys.iter().any(|key| header.contains(key)))
    };
    let name_idx = find(columns.name);
    let years_idx = find(columns.years);
    let apps_idx = find(columns.apps);
    let goals_idx = find(columns.goals);

    if apps_idx.is_none() && goals_idx.is_none() {
        return Ok(None);
    }
    let Some(name_idx) = name_idx else {
        return Err(QuizError::malformed(
            "career table has stats columns but no club or team column",
        ));
    };

    let mut spells = Vec::new();
    let mut carried = Vec::new();
    for row in &rows[header_idx + 1..] {
        let cells = row_cells(row);
        // Expanded before any skip so spans stay aligned with later rows.
        let texts = expand_row(&cells, &mut carried);
        let section_header = cells.first().is_some_and(|cell| {
            cell.value().name() == "th" && cell.value().attr("colspan").is_some()
        });
        let sub_header = cells.iter().all(|cell| cell.value().name() == "th");
        if texts.len() <= 1 || section_header || sub_header {
            continue;
        }

        if is_total_row(&texts) {
            continue;
        }
        let Some(name) = texts.get(name_idx).cloned().and_then(non_empty) else {
            continue;
        };
        let cell = |idx: Option<usize>| idx.and_then(|i| texts.get(i));

        spells.push(CareerSpell {
            name,
            years: cell(years_idx).cloned().and_then(non_empty),
            apps: cell(apps_idx).and_then(|t| parse_count(t)),
            goals: cell(goals_idx).and_then(|t| parse_count(t)),
        });
    }

    debug!(rows = spells.len(), "parsed career table");
    Ok(Some(spells))
}

/// Browsers ignore larger spans; so do we.
const MAX_SPAN: usize = 1000;

/// A cell whose `rowspan` still covers rows below the current one.
struct SpannedCell {
    text: String,
    rows_left: usize,
}

fn span(cell: &ElementRef, attr: &str) -> usize {
    cell.value()
        .attr(attr)
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .map_or(1, |n| n.min(MAX_SPAN))
}

/// Lay a row out by column index.
///
/// Slots still covered by a `rowspan` cell from an earlier row repeat that
/// cell's text, and a `colspan` cell fills its first slot and leaves the
/// rest empty. `carried` tracks open row spans between calls.
fn expand_row(cells: &[ElementRef], carried: &mut Vec<Option<SpannedCell>>) -> Vec<String> {
    let mut texts = Vec::new();
    let mut cells = cells.iter();

    loop {
        let col = texts.len();
        if let Some(mut spanned) = carried.get_mut(col).and_then(Option::take) {
            texts.push(spanned.text.clone());
            spanned.rows_left -= 1;
            if spanned.rows_left > 0 {
                carried[col] = Some(spanned);
            }
            continue;
        }

        let Some(cell) = cells.next() else {
            if carried.iter().skip(col).all(Option::is_none) {
                break;
            }
            texts.push(String::new());
            continue;
        };

        let text = element_text(cell);
        let rowspan = span(cell, "rowspan");
        for offset in 0..span(cell, "colspan") {
            let slot = if offset == 0 { text.clone() } else { String::new() };
            if rowspan > 1 {
                if carried.len() <= col + offset {
                    carried.resize_with(col + offset + 1, || None);
                }
                carried[col + offset] = Some(SpannedCell {
                    text: slot.clone(),
                    rows_left: rowspan - 1,
                });
            }
            texts.push(slot);
        }
    }

    texts
}
