//! Global stable sort of the merged result set.

use crate::sort::SortDirection;
use crate::types::SearchResult;

/// Sort `results` by `SORTON` in place.
///
/// The sort is stable in both directions: results with equal keys keep
/// their concatenation order, which is the fixed source dispatch order.
pub fn sort_results(results: &mut [SearchResult], direction: SortDirection) {
    match direction {
        SortDirection::Ascending => results.sort_by(|a, b| a.sort_on.cmp(&b.sort_on)),
        SortDirection::Descending => results.sort_by(|a, b| b.sort_on.cmp(&a.sort_on)),
    }
}
