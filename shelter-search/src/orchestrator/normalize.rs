//! Turn raw source records into tagged, sortable search results.

use chrono::NaiveDateTime;

use crate::sort::{SortMode, SortSource};
use crate::types::{the_past, Record, ResultType, SearchResult, SortKey};

use super::relevance::relevance_key;

/// Keys a [`SearchResult`] serializes alongside the record's own fields.
const RESERVED_FIELDS: [&str; 2] = ["SORTON", "RESULTTYPE"];

/// What every result in one search is keyed by.
#[derive(Debug, Clone)]
pub struct Ranking<'a> {
    pub mode: SortMode,
    /// Lower-cased search term, used by relevance sorting.
    pub term: &'a str,
    pub now: NaiveDateTime,
    /// Records kept per source contribution.
    pub limit: usize,
}

/// Wrap one source's records, in order, as [`SearchResult`]s.
///
/// Records beyond `ranking.limit` are dropped. Each record is moved into a
/// new result. Source fields named `SORTON` or `RESULTTYPE` are removed so
/// they cannot shadow the computed tags when a result is serialized.
pub fn normalize_results(
    records: Vec<Record>,
    result_type: ResultType,
    ranking: &Ranking<'_>,
) -> Vec<SearchResult> {
    if records.len() > ranking.limit {
        tracing::debug!(
            %result_type,
            returned = records.len(),
            limit = ranking.limit,
            "source exceeded record limit, truncating"
        );
    }
    let source = ranking.mode.sort_source(result_type);
    records
        .into_iter()
        .take(ranking.limit)
        .map(|mut record| {
            for reserved in RESERVED_FIELDS {
                record.remove(reserved);
            }
            let sort_on = match source {
                SortSource::Relevance => SortKey::Timestamp(relevance_key(
                    ranking.term,
                    &record,
                    result_type,
                    ranking.now,
                )),
                SortSource::Field(field) => field_sort_key(&record, source, field),
            };
            SearchResult {
                result_type,
                sort_on,
                record,
            }
        })
        .collect()
}

/// Key from a plain column: dates default to THE_PAST, text to "".
fn field_sort_key(record: &Record, source: SortSource, field: &str) -> SortKey {
    if source.is_date() {
        SortKey::Timestamp(record.date(field).unwrap_or_else(the_past))
    } else {
        SortKey::Text(record.text(field).map(|v| v.into_owned()).unwrap_or_default())
    }
}
