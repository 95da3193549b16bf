//! A record source backed by a JSON file of canned records.
//!
//! The file maps result-type tags to record arrays:
//!
//! ```json
//! {
//!   "ANIMAL": [{ "ID": 1, "ANIMALNAME": "Fluffy", "FLAGS": "quarantine hold" }],
//!   "PERSON": [{ "ID": 7, "OWNERNAME": "Jo Smith", "PERSONCLASSES": "vet" }]
//! }
//! ```
//!
//! Free-text finds match the term case-insensitively against every field.
//! Canned animal and person lookups select records whose `FLAGS` field lists
//! the lookup's flag. Person class filters read `PERSONCLASSES`, and the
//! staff and volunteer exclusions read `ISSTAFF` and `ISVOLUNTEER`.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use shelter_search::{
    FieldValue, FindRequest, PersonClass, Record, RecordSource, ResultType, ScopeFilters,
    SearchError, SourceQuery,
};

use crate::error::{HostError, Result};

/// In-memory record store loaded from JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonRecordSource {
    records: HashMap<ResultType, Vec<Record>>,
}

impl JsonRecordSource {
    /// Parse a fixture document.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Fixture`] if the document is not a map of
    /// result-type tags to record arrays.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: HashMap<ResultType, Vec<Record>> =
            serde_json::from_str(json).map_err(|e| HostError::Fixture(e.to_string()))?;
        let total: usize = records.values().map(Vec::len).sum();
        tracing::debug!(types = records.len(), total, "loaded record fixtures");
        Ok(Self { records })
    }

    /// Load a fixture document from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Records stored for one result type.
    pub fn records(&self, result_type: ResultType) -> &[Record] {
        self.records
            .get(&result_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecordSource for JsonRecordSource {
    async fn find(&self, request: &FindRequest) -> std::result::Result<Vec<Record>, SearchError> {
        let result_type = request.query.result_type();
        let term = request.term.to_lowercase();
        let flag = lookup_flag(request.query);
        let found: Vec<Record> = self
            .records(result_type)
            .iter()
            .filter(|record| match flag {
                Some(flag) => has_token(record, "FLAGS", flag),
                None => term.is_empty() || mentions(record, &term),
            })
            .filter(|record| in_scope(record, result_type, &request.filters))
            .take(request.limit)
            .cloned()
            .collect();
        tracing::debug!(query = ?request.query, count = found.len(), "fixture lookup");
        Ok(found)
    }
}

/// The `FLAGS` token a canned lookup selects on; `None` for free-text finds.
fn lookup_flag(query: SourceQuery) -> Option<&'static str> {
    match query {
        SourceQuery::AnimalsNotForAdoption => Some("notforadoption"),
        SourceQuery::AnimalsLongTerm => Some("longterm"),
        SourceQuery::AnimalsNotMicrochipped => Some("notmicrochipped"),
        SourceQuery::AnimalsOnHold => Some("hold"),
        SourceQuery::AnimalsHoldEndsToday => Some("holdtoday"),
        SourceQuery::AnimalsInQuarantine => Some("quarantine"),
        SourceQuery::AnimalsRecentlyDeceased => Some("deceased"),
        SourceQuery::AnimalsForPublishing => Some("forpublish"),
        SourceQuery::PersonsReservedWithoutHomecheck => Some("reservenohomecheck"),
        SourceQuery::PersonsWithOverdueDonations => Some("overduedonations"),
        SourceQuery::AnimalFind
        | SourceQuery::PersonFind
        | SourceQuery::IncidentFind
        | SourceQuery::WaitingListFind
        | SourceQuery::LostAnimalFind
        | SourceQuery::FoundAnimalFind
        | SourceQuery::LicenceFind => None,
    }
}

fn mentions(record: &Record, term: &str) -> bool {
    record
        .iter()
        .filter_map(|(_, value)| value.as_text())
        .any(|text| text.to_lowercase().contains(term))
}

fn has_token(record: &Record, field: &str, token: &str) -> bool {
    record.text(field).is_some_and(|text| {
        text.split(|c: char| c == ',' || c.is_whitespace())
            .any(|t| t.eq_ignore_ascii_case(token))
    })
}

fn flag_set(record: &Record, field: &str) -> bool {
    match record.get(field) {
        Some(FieldValue::Bool(b)) => *b,
        Some(FieldValue::Integer(i)) => *i != 0,
        Some(FieldValue::Text(s)) => matches!(s.as_str(), "1" | "true" | "yes"),
        _ => false,
    }
}

fn integer(record: &Record, field: &str) -> Option<i64> {
    match record.get(field)? {
        FieldValue::Integer(i) => Some(*i),
        FieldValue::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn in_scope(record: &Record, result_type: ResultType, filters: &ScopeFilters) -> bool {
    if let (Some(site), Some(record_site)) = (filters.site_id, integer(record, "SITEID")) {
        if site != record_site {
            return false;
        }
    }
    match result_type {
        ResultType::Animal => animal_in_scope(record, filters),
        ResultType::Person => person_in_scope(record, filters),
        _ => true,
    }
}

fn animal_in_scope(record: &Record, filters: &ScopeFilters) -> bool {
    if let Some(visible) = &filters.visible_animal_ids {
        if !integer(record, "ID").is_some_and(|id| visible.contains(&id)) {
            return false;
        }
    }
    if let Some(locations) = &filters.location_filter {
        let allowed: Vec<i64> = locations
            .split(',')
            .filter_map(|l| l.trim().parse().ok())
            .collect();
        if !integer(record, "SHELTERLOCATION").is_some_and(|l| allowed.contains(&l)) {
            return false;
        }
    }
    true
}

fn person_in_scope(record: &Record, filters: &ScopeFilters) -> bool {
    if !filters.include_staff && flag_set(record, "ISSTAFF") {
        return false;
    }
    if !filters.include_volunteers && flag_set(record, "ISVOLUNTEER") {
        return false;
    }
    match filters.class_filter {
        None | Some(PersonClass::All) => true,
        Some(class) => has_token(record, "PERSONCLASSES", class.as_str()),
    }
}
