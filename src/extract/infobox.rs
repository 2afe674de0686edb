use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{QuizError, Result};
use crate::extract::text::{element_text, non_empty, parse_count};
use crate::model::{CareerSpell, ClubSpell, NationalTeamSpell, YouthSpell};
use crate::wiki::normalize_img_url;

static DAY_MONTH_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2} [A-Z][a-z]+ \d{4}").expect("valid regex"));
static MONTH_DAY_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z][a-z]+ \d{1,2}, \d{4}").expect("valid regex"));

/// Scalar facts from the infobox's label/data rows.
#[derive(Debug, Default)]
pub(crate) struct Biography {
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub height: Option<String>,
    pub image_url: Option<String>,
}

/// Career tables embedded in the infobox.
#[derive(Debug, Default)]
pub(crate) struct InfoboxCareer {
    /// Whether any youth, senior or international header was present at all.
    pub has_career: bool,
    pub youth: Vec<YouthSpell>,
    pub clubs: Vec<ClubSpell>,
    pub national_team: Vec<NationalTeamSpell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
enum CareerSection {
    #[strum(serialize = "youth career")]
    Youth,
    #[strum(serialize = "senior career")]
    Senior,
    #[strum(serialize = "international career")]
    International,
    #[strum(serialize = "managerial career")]
    Managerial,
}

impl CareerSection {
    fn from_header(text: &str) -> Option<Self> {
        let text = text.to_lowercase();
        if text.contains("youth career") {
            Some(CareerSection::Youth)
        } else if text.contains("senior career") {
            Some(CareerSection::Senior)
        } else if text.contains("international career") {
            Some(CareerSection::International)
        } else if text.contains("teams managed") || text.contains("managerial career") {
            Some(CareerSection::Managerial)
        } else {
            None
        }
    }
}

pub(crate) fn find_infobox(document: &Html) -> Result<Option<ElementRef<'_>>> {
    let selector = Selector::parse("table.infobox")?;
    Ok(document.select(&selector).next())
}

/// Direct `th`/`td` children of a table row.
pub(crate) fn row_cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "th" | "td"))
        .collect()
}

/// The data cell of the first label row whose lowercased label satisfies `matches`.
fn field<'a>(
    infobox: &ElementRef<'a>,
    matches: impl Fn(&str) -> bool,
) -> Result<Option<ElementRef<'a>>> {
    let row_selector = Selector::parse("tr")?;
    Ok(infobox.select(&row_selector).find_map(|row| {
        let cells = row_cells(&row);
        match cells.as_slice() {
            [label, data] if label.value().name() == "th" => {
                let label = element_text(label).to_lowercase();
                matches(&label).then_some(*data)
            }
            _ => None,
        }
    }))
}

pub(crate) fn parse_biography(infobox: &ElementRef) -> Result<Biography> {
    let full_name = match field(infobox, |label| label == "full name")? {
        Some(cell) => non_empty(element_text(&cell)),
        None => {
            let caption_selector = Selector::parse("caption, .infobox-above")?;
            infobox
                .select(&caption_selector)
                .next()
                .and_then(|caption| non_empty(element_text(&caption)))
        }
    };

    let position = field(infobox, |label| label.starts_with("position"))?
        .and_then(|cell| non_empty(element_text(&cell)));

    let birth_date = match field(infobox, |label| label == "date of birth" || label == "born")? {
        Some(cell) => parse_birth_date(&cell)?,
        None => None,
    };

    let height = field(infobox, |label| label.starts_with("height"))?
        .and_then(|cell| non_empty(element_text(&cell)));

    let image_selector = Selector::parse(".infobox-image img, img")?;
    let image_url = infobox
        .select(&image_selector)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(normalize_img_url);

    Ok(Biography {
        full_name,
        position,
        birth_date,
        height,
        image_url,
    })
}

/// Prefer the machine-readable `span.bday`; fall back to the visible date text.
fn parse_birth_date(cell: &ElementRef) -> Result<Option<NaiveDate>> {
    let bday_selector = Selector::parse("span.bday")?;
    let bday = cell
        .select(&bday_selector)
        .next()
        .map(|span| span.text().collect::<String>())
        .and_then(|text| NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok());
    if bday.is_some() {
        return Ok(bday);
    }
    Ok(parse_display_date(&element_text(cell)))
}

/// `"24 June 1987 (age 38)"` or `"June 24, 1987"`.
pub(crate) fn parse_display_date(text: &str) -> Option<NaiveDate> {
    if let Some(found) = DAY_MONTH_YEAR_RE.find(text) {
        if let Ok(date) = NaiveDate::parse_from_str(found.as_str(), "%d %B %Y") {
            return Some(date);
        }
    }
    MONTH_DAY_YEAR_RE
        .find(text)
        .and_then(|found| NaiveDate::parse_from_str(found.as_str(), "%B %d, %Y").ok())
}

/// Walk the infobox rows, switching section at every single-cell header row.
///
/// Rows inside a section are `years | team | apps | (goals)`; the column
/// heading row and any `Total` row are not data rows.
pub(crate) fn parse_career(infobox: &ElementRef) -> Result<InfoboxCareer> {
    let row_selector = Selector::parse("tr")?;
    let mut career = InfoboxCareer::default();
    let mut section = None;

    for row in infobox.select(&row_selector) {
        let cells = row_cells(&row);
        match cells.as_slice() {
            [] => {}
            [single] => {
                section = CareerSection::from_header(&element_text(single));
                if section.is_some_and(|s| s != CareerSection::Managerial) {
                    career.has_career = true;
                }
            }
            cells => {
                let Some(current) = section else {
                    continue;
                };
                let texts: Vec<String> = cells.iter().map(|cell| element_text(cell)).collect();
                if is_column_heading(&texts) || is_total_row(&texts) {
                    continue;
                }
                push_row(&mut career, current, texts)?;
            }
        }
    }

    debug!(
        youth = career.youth.len(),
        clubs = career.clubs.len(),
        national_team = career.national_team.len(),
        "parsed infobox career"
    );
    Ok(career)
}

fn is_column_heading(texts: &[String]) -> bool {
    texts.first().is_some_and(|t| t.eq_ignore_ascii_case("years"))
        || texts.get(1).is_some_and(|t| t.eq_ignore_ascii_case("team"))
}

pub(crate) fn is_total_row(texts: &[String]) -> bool {
    texts.iter().take(2).any(|t| {
        let t = t.to_lowercase();
        t == "total" || t == "career total"
    })
}

fn push_row(career: &mut InfoboxCareer, section: CareerSection, texts: Vec<String>) -> Result<()> {
    if section == CareerSection::Managerial {
        return Ok(());
    }

    let mut texts = texts.into_iter();
    let years = texts.next().and_then(non_empty);
    let name = texts.next().and_then(non_empty).ok_or_else(|| {
        QuizError::malformed(format!(
            "{section} row {} has no team",
            years.as_deref().unwrap_or("without years")
        ))
    })?;
    let apps = texts.next().and_then(|t| parse_count(&t));
    let goals = texts.next().and_then(|t| parse_count(&t));

    match section {
        CareerSection::Youth => career.youth.push(YouthSpell { name, years }),
        CareerSection::Senior => career.clubs.push(CareerSpell {
            name,
            years,
            apps,
            goals,
        }),
        CareerSection::International => career.national_team.push(CareerSpell {
            name,
            years,
            apps,
            goals,
        }),
        CareerSection::Managerial => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infobox_html(rows: &str) -> Html {
        Html::parse_document(&format!(
            r#"<div class="mw-parser-output"><table class="infobox vcard"><tbody>{rows}</tbody></table></div>"#
        ))
    }

    #[test]
    fn test_parse_display_date() {
        assert_eq!(
            parse_display_date("24 June 1987 (age 38) Rosario, Argentina"),
            NaiveDate::from_ymd_opt(1987, 6, 24)
        );
        assert_eq!(
            parse_display_date("June 24, 1987"),
            NaiveDate::from_ymd_opt(1987, 6, 24)
        );
        assert_eq!(parse_display_date("c. 1890"), None);
    }

    #[test]
    fn test_missing_apps_cell_is_unknown_and_row_kept() {
        let document = infobox_html(
            r#"<tr><th colspan="4" class="infobox-header">Senior career*</th></tr>
               <tr><th class="infobox-label">Years</th><td class="infobox-data"><b>Team</b></td><td><b>Apps</b></td><td><b>(Gls)</b></td></tr>
               <tr><th class="infobox-label">2001–2003</th><td class="infobox-data"><a href="/wiki/A">Alpha FC</a></td></tr>
               <tr><th class="infobox-label">2003–2005</th><td class="infobox-data">Beta United</td><td>n/a</td><td>(7)</td></tr>"#,
        );
        let infobox = find_infobox(&document).unwrap().unwrap();
        let career = parse_career(&infobox).unwrap();

        assert!(career.has_career);
        assert_eq!(
            career.clubs,
            vec![
                CareerSpell {
                    name: "Alpha FC".to_string(),
                    years: Some("2001–2003".to_string()),
                    apps: None,
                    goals: None,
                },
                CareerSpell {
                    name: "Beta United".to_string(),
                    years: Some("2003–2005".to_string()),
                    apps: None,
                    goals: Some(7),
                },
            ]
        );
    }

    #[test]
    fn test_row_without_team_is_malformed() {
        let document = infobox_html(
            r#"<tr><th colspan="4" class="infobox-header">International career</th></tr>
               <tr><th class="infobox-label">2005–</th><td class="infobox-data"></td><td>180</td><td>(106)</td></tr>"#,
        );
        let infobox = find_infobox(&document).unwrap().unwrap();
        let err = parse_career(&infobox).unwrap_err();

        assert!(matches!(err, QuizError::MalformedData { context } if context.contains("international career")));
    }

    #[test]
    fn test_managerial_rows_are_ignored() {
        let document = infobox_html(
            r#"<tr><th colspan="4" class="infobox-header">Teams managed</th></tr>
               <tr><th class="infobox-label">2015–2019</th><td class="infobox-data"></td></tr>"#,
        );
        let infobox = find_infobox(&document).unwrap().unwrap();
        let career = parse_career(&infobox).unwrap();

        assert!(!career.has_career);
        assert!(career.clubs.is_empty());
    }

    #[test]
    fn test_biography_falls_back_to_caption_and_display_date() {
        let document = infobox_html(
            r#"<tr><th colspan="2" class="infobox-above">Jane Roe</th></tr>
               <tr><th class="infobox-label">Born</th><td class="infobox-data">March 3, 1990<br>Leeds, England</td></tr>
               <tr><th class="infobox-label">Position(s)</th><td class="infobox-data">Goalkeeper</td></tr>"#,
        );
        let infobox = find_infobox(&document).unwrap().unwrap();
        let biography = parse_biography(&infobox).unwrap();

        assert_eq!(biography.full_name.as_deref(), Some("Jane Roe"));
        assert_eq!(biography.birth_date, NaiveDate::from_ymd_opt(1990, 3, 3));
        assert_eq!(biography.position.as_deref(), Some("Goalkeeper"));
        assert_eq!(biography.height, None);
        assert_eq!(biography.image_url, None);
    }
}
