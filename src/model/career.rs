use chrono::NaiveDate;
use serde::Serialize;

/// Structured career data extracted from a footballer's Wikipedia page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerRecord {
    pub full_name: String,
    pub position: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub height: Option<String>,
    pub image_url: Option<String>,
    pub youth_clubs: Vec<YouthSpell>,
    pub clubs: Vec<ClubSpell>,
    pub national_team: Vec<NationalTeamSpell>,
    pub honors: Vec<String>,
}

/// A contiguous period at one club or national team, as listed in a career table.
///
/// Counts that are blank or unreadable in the source are `None` rather than zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CareerSpell {
    pub name: String,
    pub years: Option<String>,
    pub apps: Option<u32>,
    pub goals: Option<u32>,
}

pub type ClubSpell = CareerSpell;
pub type NationalTeamSpell = CareerSpell;

/// A youth-career entry. Youth tables list only years and team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YouthSpell {
    pub name: String,
    pub years: Option<String>,
}

/// A [`CareerRecord`] whose full name has been replaced with a fixed placeholder.
///
/// The real name travels alongside it but is never serialized as part of the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObscuredCareerRecord {
    #[serde(flatten)]
    pub(crate) record: CareerRecord,
    #[serde(skip)]
    pub(crate) revealed_name: String,
}

impl ObscuredCareerRecord {
    /// The masked record, as shown before the reveal.
    pub fn record(&self) -> &CareerRecord {
        &self.record
    }

    /// The real name hidden behind the placeholder.
    pub fn revealed_name(&self) -> &str {
        &self.revealed_name
    }
}
