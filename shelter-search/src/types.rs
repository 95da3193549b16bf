//! Core types: flat records, result types, sort keys and search outcomes.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The fixed "long ago" date substituted for null dates.
///
/// Null-dated records therefore sort first ascending and last descending.
pub fn the_past() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1900, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

/// A single field value as returned by a record source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// SQL-style null.
    Null,
    /// A yes/no flag column.
    Bool(bool),
    /// An identifier or other integer column.
    Integer(i64),
    /// A fractional column such as a weight or fee.
    Float(f64),
    /// A date or timestamp column.
    Date(NaiveDateTime),
    /// Any textual column.
    Text(String),
}

impl FieldValue {
    /// Textual rendering of the value, `None` for null.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Null => None,
            Self::Text(s) => Some(Cow::Borrowed(s)),
            Self::Bool(b) => Some(Cow::Borrowed(if *b { "1" } else { "0" })),
            Self::Integer(i) => Some(Cow::Owned(i.to_string())),
            Self::Float(f) => Some(Cow::Owned(f.to_string())),
            Self::Date(d) => Some(Cow::Owned(d.format("%Y-%m-%d %H:%M:%S").to_string())),
        }
    }

    /// Date interpretation of the value.
    ///
    /// Text is accepted in ISO-8601 (`T` or space separated) or bare
    /// `YYYY-MM-DD` form; anything else is `None`.
    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Date(d) => Some(*d),
            Self::Text(s) => parse_date_text(s),
            Self::Null | Self::Bool(_) | Self::Integer(_) | Self::Float(_) => None,
        }
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(d: NaiveDateTime) -> Self {
        Self::Date(d)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A flat field-name → value map produced by a record source.
///
/// Field names follow the shelter database's upper-case column names
/// (`ANIMALNAME`, `LASTCHANGEDDATE`, ...). A missing field reads the same
/// as a null one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, FieldValue>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion.
    #[must_use]
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.0.insert(field.to_string(), value.into());
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.0.remove(field)
    }

    /// Non-null value of `field`.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field).filter(|v| !matches!(v, FieldValue::Null))
    }

    /// Non-null textual value of `field`.
    pub fn text(&self, field: &str) -> Option<Cow<'_, str>> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// Non-null date value of `field`.
    pub fn date(&self, field: &str) -> Option<NaiveDateTime> {
        self.get(field).and_then(FieldValue::as_date)
    }

    /// Iterate fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields, nulls included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Which record store a search result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResultType {
    /// Shelter animal.
    Animal,
    /// Person / owner.
    Person,
    /// Animal-control incident.
    #[serde(rename = "ANIMALCONTROL")]
    AnimalControl,
    /// Lost-animal report.
    #[serde(rename = "LOSTANIMAL")]
    LostAnimal,
    /// Found-animal report.
    #[serde(rename = "FOUNDANIMAL")]
    FoundAnimal,
    /// Animal licence.
    Licence,
    /// Waiting-list entry.
    #[serde(rename = "WAITINGLIST")]
    WaitingList,
}

impl ResultType {
    /// The `RESULTTYPE` tag attached to results of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Animal => "ANIMAL",
            Self::Person => "PERSON",
            Self::AnimalControl => "ANIMALCONTROL",
            Self::LostAnimal => "LOSTANIMAL",
            Self::FoundAnimal => "FOUNDANIMAL",
            Self::Licence => "LICENCE",
            Self::WaitingList => "WAITINGLIST",
        }
    }

    /// All result types, in the order an unscoped search visits them.
    pub fn all() -> &'static [ResultType] {
        &[
            Self::Animal,
            Self::AnimalControl,
            Self::Person,
            Self::WaitingList,
            Self::LostAnimal,
            Self::FoundAnimal,
            Self::Licence,
        ]
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `SORTON` key of a result.
///
/// Within a single search every key has the same variant: date-named sort
/// fields and relevance produce timestamps, everything else produces text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SortKey {
    /// A date or synthesized relevance timestamp.
    Timestamp(NaiveDateTime),
    /// A textual sort column.
    Text(String),
}

/// A record tagged with its result type and sort key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result type tag.
    #[serde(rename = "RESULTTYPE")]
    pub result_type: ResultType,
    /// Global sort key.
    #[serde(rename = "SORTON")]
    pub sort_on: SortKey,
    /// The source record, unmodified.
    #[serde(flatten)]
    pub record: Record,
}

/// Everything a search call returns.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Globally ordered results.
    pub results: Vec<SearchResult>,
    /// Wall time spent inside the search call.
    pub elapsed: Duration,
    /// Localized description of what was searched for.
    pub explain: String,
    /// Localized name of the sort that was applied.
    pub sort_label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid date")
    }

    #[test]
    fn the_past_is_1900() {
        assert_eq!(the_past(), dt(1900, 1, 1));
    }

    #[test]
    fn null_and_missing_fields_read_the_same() {
        let record = Record::new().with("ANIMALNAME", FieldValue::Null);
        assert!(record.get("ANIMALNAME").is_none());
        assert!(record.get("SHELTERCODE").is_none());
        assert!(record.text("ANIMALNAME").is_none());
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn text_renders_non_text_values() {
        let record = Record::new()
            .with("ID", 42_i64)
            .with("LASTCHANGEDDATE", dt(2024, 3, 9));
        assert_eq!(record.text("ID").as_deref(), Some("42"));
        assert_eq!(
            record.text("LASTCHANGEDDATE").as_deref(),
            Some("2024-03-09 00:00:00")
        );
    }

    #[test]
    fn date_parses_iso_text() {
        let record = Record::new()
            .with("A", "2024-03-09T10:11:12")
            .with("B", "2024-03-09")
            .with("C", "not a date");
        assert_eq!(
            record.date("A"),
            NaiveDate::from_ymd_opt(2024, 3, 9).and_then(|d| d.and_hms_opt(10, 11, 12))
        );
        assert_eq!(record.date("B"), Some(dt(2024, 3, 9)));
        assert_eq!(record.date("C"), None);
    }

    #[test]
    fn option_into_field_value() {
        let none: Option<&str> = None;
        assert_eq!(FieldValue::from(none), FieldValue::Null);
        assert_eq!(FieldValue::from(Some("x")), FieldValue::Text("x".into()));
    }

    #[test]
    fn record_deserializes_dates_and_nulls() {
        let json = r#"{"ANIMALNAME":"Fluffy","ID":7,"LASTCHANGEDDATE":"2024-01-02T03:04:05","DECEASEDDATE":null}"#;
        let record: Record = serde_json::from_str(json).expect("deserialize");
        assert_eq!(record.get("ID"), Some(&FieldValue::Integer(7)));
        assert!(matches!(
            record.get("LASTCHANGEDDATE"),
            Some(FieldValue::Date(_))
        ));
        assert!(record.get("DECEASEDDATE").is_none());
    }

    #[test]
    fn record_deserializes_flags_and_fractions() {
        let json = r#"{"ID":3,"ISSTAFF":true,"NONSHELTER":false,"WEIGHT":3.5}"#;
        let record: Record = serde_json::from_str(json).expect("deserialize");
        assert_eq!(record.get("ID"), Some(&FieldValue::Integer(3)));
        assert_eq!(record.get("ISSTAFF"), Some(&FieldValue::Bool(true)));
        assert_eq!(record.get("WEIGHT"), Some(&FieldValue::Float(3.5)));
        assert_eq!(record.text("ISSTAFF").as_deref(), Some("1"));
        assert_eq!(record.text("NONSHELTER").as_deref(), Some("0"));
        assert_eq!(record.text("WEIGHT").as_deref(), Some("3.5"));
        assert_eq!(record.date("WEIGHT"), None);
    }

    #[test]
    fn result_type_tags() {
        assert_eq!(ResultType::AnimalControl.to_string(), "ANIMALCONTROL");
        assert_eq!(ResultType::Licence.as_str(), "LICENCE");
        let json = serde_json::to_string(&ResultType::WaitingList).expect("serialize");
        assert_eq!(json, "\"WAITINGLIST\"");
        let decoded: ResultType = serde_json::from_str("\"LOSTANIMAL\"").expect("deserialize");
        assert_eq!(decoded, ResultType::LostAnimal);
    }

    #[test]
    fn all_result_types_in_dispatch_order() {
        let all = ResultType::all();
        assert_eq!(all.len(), 7);
        assert_eq!(all[0], ResultType::Animal);
        assert_eq!(all[1], ResultType::AnimalControl);
        assert_eq!(all[6], ResultType::Licence);
    }

    #[test]
    fn sort_keys_order_within_variant() {
        assert!(SortKey::Timestamp(dt(2020, 1, 1)) < SortKey::Timestamp(dt(2021, 1, 1)));
        assert!(SortKey::Text("apple".into()) < SortKey::Text("banana".into()));
    }

    #[test]
    fn search_result_serializes_flat() {
        let result = SearchResult {
            result_type: ResultType::Animal,
            sort_on: SortKey::Text("Fluffy".into()),
            record: Record::new().with("ANIMALNAME", "Fluffy"),
        };
        let value = serde_json::to_value(&result).expect("serialize");
        assert_eq!(value["RESULTTYPE"], "ANIMAL");
        assert_eq!(value["SORTON"], "Fluffy");
        assert_eq!(value["ANIMALNAME"], "Fluffy");
    }
}
