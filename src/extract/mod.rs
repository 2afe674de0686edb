pub(crate) mod infobox;
pub(crate) mod sections;
pub(crate) mod text;

use scraper::{Html, Selector};
use tracing::{debug, instrument};

use crate::error::{QuizError, Result};
use crate::model::CareerRecord;
use crate::wiki::strip_disambiguator;
use infobox::{Biography, InfoboxCareer};
use text::{element_text, non_empty};

/// Build a [`CareerRecord`] from the rendered HTML of a player's page.
///
/// The infobox is the primary source for both the biography and the career
/// history. Pages whose infobox carries no career rows fall back to the
/// wikitables under the career sections; a page with neither is not a
/// football biography.
#[instrument(skip(markup), fields(bytes = markup.len()))]
pub fn extract_career(markup: &str, title: &str) -> Result<CareerRecord> {
    let document = Html::parse_document(markup);
    let not_a_footballer = || QuizError::NotAFootballer {
        title: title.to_string(),
    };

    if is_disambiguation(&document)? {
        debug!("page is a disambiguation page");
        return Err(not_a_footballer());
    }

    let (biography, career) = match infobox::find_infobox(&document)? {
        Some(summary) => (
            infobox::parse_biography(&summary)?,
            infobox::parse_career(&summary)?,
        ),
        None => (Biography::default(), InfoboxCareer::default()),
    };

    let (youth_clubs, clubs, national_team) = if career.has_career {
        (career.youth, career.clubs, career.national_team)
    } else {
        let clubs = sections::parse_club_tables(&document)?;
        let national_team = sections::parse_national_tables(&document)?;
        if clubs.is_none() && national_team.is_none() {
            debug!("no career rows in infobox or tables");
            return Err(not_a_footballer());
        }
        (
            Vec::new(),
            clubs.unwrap_or_default(),
            national_team.unwrap_or_default(),
        )
    };

    let full_name = match biography.full_name {
        Some(name) => name,
        None => page_heading(&document)?
            .unwrap_or_else(|| strip_disambiguator(title).to_string()),
    };

    let record = CareerRecord {
        full_name,
        position: biography.position,
        birth_date: biography.birth_date,
        height: biography.height,
        image_url: biography.image_url,
        youth_clubs,
        clubs,
        national_team,
        honors: sections::parse_honours(&document)?,
    };

    debug!(
        clubs = record.clubs.len(),
        national_team = record.national_team.len(),
        honors = record.honors.len(),
        "extracted career"
    );
    Ok(record)
}

fn is_disambiguation(document: &Html) -> Result<bool> {
    let selector = Selector::parse("#disambigbox, #disambig, .dmbox-disambig")?;
    Ok(document.select(&selector).next().is_some())
}

/// `h1#firstHeading`, only present when the page was saved from the site itself.
fn page_heading(document: &Html) -> Result<Option<String>> {
    let selector = Selector::parse("h1#firstHeading")?;
    Ok(document
        .select(&selector)
        .next()
        .and_then(|heading| non_empty(element_text(&heading)))
        .map(|heading| strip_disambiguator(&heading).to_string()))
}
