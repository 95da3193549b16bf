//! Recency-biased relevance keys for free-text searches.
//!
//! There is no text index behind a search, so relevance is expressed as a
//! timestamp that sorts descending:
//!
//! ```text
//! Exact     → now
//! Contains  → now - 1s
//! Baseline  → the record's own last-changed date (THE_PAST when null),
//!             never later than now - 2s
//! ```
//!
//! Matches therefore outrank every non-matching record regardless of how
//! recently that record changed, and non-matching records keep recency order.
//!
//! | type    | Exact                                   | Contains                          |
//! |---------|-----------------------------------------|-----------------------------------|
//! | ANIMAL  | name, shelter code or short code equal  | term inside any of those three    |
//! | PERSON  | every term word inside OWNERNAME        | term inside OWNERSURNAME/OWNERNAME |
//! | LICENCE | LICENCENUMBER equal                     | -                                 |
//! | other   | -                                       | -                                 |

use chrono::{Duration, NaiveDateTime};

use crate::types::{the_past, Record, ResultType};

const ANIMAL_KEY_FIELDS: [&str; 3] = ["ANIMALNAME", "SHELTERCODE", "SHORTCODE"];
const PERSON_SUBSTRING_FIELDS: [&str; 2] = ["OWNERSURNAME", "OWNERNAME"];

/// How strongly a record matches the search term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RelevanceTier {
    Baseline,
    Contains,
    Exact,
}

/// Classify `record` against an already lower-cased `term`.
///
/// An empty term (special searches) never matches.
pub fn relevance_tier(term: &str, record: &Record, result_type: ResultType) -> RelevanceTier {
    if term.is_empty() {
        return RelevanceTier::Baseline;
    }
    match result_type {
        ResultType::Animal => animal_tier(term, record),
        ResultType::Person => person_tier(term, record),
        ResultType::Licence => licence_tier(term, record),
        ResultType::AnimalControl
        | ResultType::LostAnimal
        | ResultType::FoundAnimal
        | ResultType::WaitingList => RelevanceTier::Baseline,
    }
}

/// The date a record falls back to when it does not match.
pub fn baseline_date(record: &Record, result_type: ResultType) -> NaiveDateTime {
    let field = match result_type {
        ResultType::Licence => "ISSUEDATE",
        _ => "LASTCHANGEDDATE",
    };
    record.date(field).unwrap_or_else(the_past)
}

/// The `SORTON` timestamp for a record under relevance sorting.
pub fn relevance_key(
    term: &str,
    record: &Record,
    result_type: ResultType,
    now: NaiveDateTime,
) -> NaiveDateTime {
    match relevance_tier(term, record, result_type) {
        RelevanceTier::Exact => now,
        RelevanceTier::Contains => now - Duration::seconds(1),
        RelevanceTier::Baseline => baseline_date(record, result_type).min(now - Duration::seconds(2)),
    }
}

fn lowered(record: &Record, field: &str) -> Option<String> {
    record.text(field).map(|value| value.to_lowercase())
}

fn animal_tier(term: &str, record: &Record) -> RelevanceTier {
    let keys: Vec<String> = ANIMAL_KEY_FIELDS
        .iter()
        .filter_map(|field| lowered(record, field))
        .collect();
    if keys.iter().any(|key| key == term) {
        RelevanceTier::Exact
    } else if keys.iter().any(|key| key.contains(term)) {
        RelevanceTier::Contains
    } else {
        RelevanceTier::Baseline
    }
}

// A field that is absent never matches, including in the substring test.
fn person_tier(term: &str, record: &Record) -> RelevanceTier {
    if let Some(name) = lowered(record, "OWNERNAME") {
        if term.split_whitespace().all(|word| name.contains(word)) {
            return RelevanceTier::Exact;
        }
    }
    let contains = PERSON_SUBSTRING_FIELDS
        .iter()
        .filter_map(|field| lowered(record, field))
        .any(|value| value.contains(term));
    if contains {
        RelevanceTier::Contains
    } else {
        RelevanceTier::Baseline
    }
}

fn licence_tier(term: &str, record: &Record) -> RelevanceTier {
    match lowered(record, "LICENCENUMBER") {
        Some(number) if number == term => RelevanceTier::Exact,
        _ => RelevanceTier::Baseline,
    }
}
