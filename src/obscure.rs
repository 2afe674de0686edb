use itertools::Itertools;
use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use crate::model::{CareerRecord, ObscuredCareerRecord};
use crate::wiki::strip_disambiguator;

/// Shown in place of the player's name. Its width never depends on the name.
pub const NAME_PLACEHOLDER: &str = "██████████";

/// Lowercase particles that are part of a surname but never a name on their own.
const NAME_PARTICLES: &[&str] = &[
    "da", "das", "de", "del", "der", "di", "do", "dos", "du", "la", "le", "van", "von",
];

const DIMINUTIVES: &[(&str, &[&str])] = &[
    ("alexander", &["Alex", "Sasha"]),
    ("andrew", &["Andy", "Drew"]),
    ("anthony", &["Tony"]),
    ("christopher", &["Chris"]),
    ("daniel", &["Dan", "Danny"]),
    ("edward", &["Ed", "Eddie", "Ted"]),
    ("frederick", &["Fred", "Freddie"]),
    ("gabriel", &["Gabi"]),
    ("james", &["Jim", "Jimmy", "Jamie"]),
    ("joseph", &["Joe", "Joey"]),
    ("lionel", &["Leo"]),
    ("matthew", &["Matt"]),
    ("michael", &["Mike", "Mick", "Micky"]),
    ("nicholas", &["Nick", "Nicky"]),
    ("peter", &["Pete"]),
    ("richard", &["Rick", "Ricky", "Dick"]),
    ("robert", &["Bob", "Bobby", "Rob", "Robbie"]),
    ("samuel", &["Sam", "Sammy"]),
    ("stephen", &["Steve", "Stevie"]),
    ("steven", &["Steve", "Stevie"]),
    ("thomas", &["Tom", "Tommy"]),
    ("william", &["Will", "Bill", "Billy", "Liam"]),
    ("zinedine", &["Zizou"]),
];

/// How far obscuring reaches beyond the name field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObscureOptions {
    /// Also replace name variants found inside honour strings.
    pub redact_honours: bool,
}

/// Every spelling of a player's name worth hiding, longest first.
#[derive(Debug, Clone)]
pub struct NameVariants {
    variants: Vec<String>,
    pattern: Option<Regex>,
}

impl NameVariants {
    /// Collect variants from each of `names`, typically the page title and the
    /// extracted full name.
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut variants = Vec::new();
        for name in names {
            push_variants(strip_disambiguator(name), &mut variants);
        }
        let variants: Vec<String> = variants
            .into_iter()
            .unique_by(|variant| variant.to_lowercase())
            .sorted_by(|a, b| b.chars().count().cmp(&a.chars().count()))
            .collect();

        let pattern = if variants.is_empty() {
            None
        } else {
            let alternation = variants.iter().map(|v| regex::escape(v)).join("|");
            RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
                .case_insensitive(true)
                .build()
                .inspect_err(|err| warn!(error = %err, "could not build name pattern"))
                .ok()
        };

        Self { variants, pattern }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.variants
    }

    /// Replace every whole-word, case-insensitive occurrence of a variant.
    pub fn redact(&self, text: &str) -> String {
        match &self.pattern {
            Some(pattern) => pattern.replace_all(text, NAME_PLACEHOLDER).into_owned(),
            None => text.to_string(),
        }
    }
}

fn push_variants(name: &str, variants: &mut Vec<String>) {
    let parts: Vec<&str> = name.split_whitespace().collect();
    let (Some(first), Some(last)) = (parts.first(), parts.last()) else {
        return;
    };

    variants.push(parts.join(" "));
    variants.extend(
        parts
            .iter()
            .filter(|part| part.chars().count() > 1)
            .filter(|part| !NAME_PARTICLES.contains(&part.to_lowercase().as_str()))
            .map(|part| part.to_string()),
    );

    if parts.len() >= 2 {
        variants.push(format!("{first} {last}"));
        if let Some(initial) = first.chars().next() {
            variants.push(format!("{initial}. {last}"));
        }
    }

    let first = first.to_lowercase();
    if let Some((_, short)) = DIMINUTIVES.iter().find(|(full, _)| *full == first) {
        variants.extend(short.iter().map(|s| s.to_string()));
    }
}

/// Mask the player's name in `record`.
///
/// The full name always becomes [`NAME_PLACEHOLDER`]; honours are rewritten
/// only when `options.redact_honours` is set. Every other field is returned as
/// extracted. The page title, minus any disambiguator, is kept as the answer.
pub fn obscure(
    mut record: CareerRecord,
    title: &str,
    options: ObscureOptions,
) -> ObscuredCareerRecord {
    let revealed_name = strip_disambiguator(title).to_string();

    if options.redact_honours {
        let variants = NameVariants::new([title, record.full_name.as_str()]);
        debug!(variants = variants.as_slice().len(), "redacting honours");
        record.honors = record
            .honors
            .iter()
            .map(|honour| variants.redact(honour))
            .collect();
    }
    record.full_name = NAME_PLACEHOLDER.to_string();

    ObscuredCareerRecord {
        record,
        revealed_name,
    }
}
