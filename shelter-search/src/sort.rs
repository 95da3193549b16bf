//! Sort modes, in-query sort directives and the per-type sort field table.

use serde::{Deserialize, Serialize};

use crate::types::ResultType;

/// How the merged result list is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Name, A to Z.
    AlphaAsc,
    /// Name, Z to A.
    AlphaDesc,
    /// Least recently changed first.
    LastChangedAsc,
    /// Most recently changed first.
    LastChangedDesc,
    /// Species, A to Z.
    SpeciesAsc,
    /// Species, Z to A.
    SpeciesDesc,
    /// Relevance to the search term, ties broken by recency.
    Relevance,
}

/// Direction of the global sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Where a result's `SORTON` value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortSource {
    /// Copy this record field.
    Field(&'static str),
    /// Ask the relevance scorer.
    Relevance,
}

impl SortSource {
    /// Whether the field holds a date and so sorts as a timestamp.
    pub fn is_date(&self) -> bool {
        match self {
            Self::Field(name) => name.ends_with("DATE"),
            Self::Relevance => true,
        }
    }
}

/// In-query directives, in the order they are checked.
const DIRECTIVES: &[(&str, SortMode)] = &[
    ("sort:az", SortMode::AlphaAsc),
    ("sort:za", SortMode::AlphaDesc),
    ("sort:lr", SortMode::LastChangedAsc),
    ("sort:mr", SortMode::LastChangedDesc),
    ("sort:as", SortMode::SpeciesAsc),
    ("sort:sa", SortMode::SpeciesDesc),
    ("sort:rel", SortMode::Relevance),
];

impl SortMode {
    /// Map the legacy integer setting (0..=6) to a mode.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::AlphaAsc),
            1 => Some(Self::AlphaDesc),
            2 => Some(Self::LastChangedAsc),
            3 => Some(Self::LastChangedDesc),
            4 => Some(Self::SpeciesAsc),
            5 => Some(Self::SpeciesDesc),
            6 => Some(Self::Relevance),
            _ => None,
        }
    }

    /// The directive that selects this mode inside a query.
    pub fn directive(&self) -> &'static str {
        DIRECTIVES
            .iter()
            .find(|(_, mode)| mode == self)
            .map_or("", |(directive, _)| directive)
    }

    /// Untranslated label, used as the translation template.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AlphaAsc => "Alphabetically A-Z",
            Self::AlphaDesc => "Alphabetically Z-A",
            Self::LastChangedAsc => "Least recently changed",
            Self::LastChangedDesc => "Most recently changed",
            Self::SpeciesAsc => "Species A-Z",
            Self::SpeciesDesc => "Species Z-A",
            Self::Relevance => "Most relevant",
        }
    }

    pub fn direction(&self) -> SortDirection {
        match self {
            Self::AlphaAsc | Self::LastChangedAsc | Self::SpeciesAsc => SortDirection::Ascending,
            Self::AlphaDesc | Self::LastChangedDesc | Self::SpeciesDesc | Self::Relevance => {
                SortDirection::Descending
            }
        }
    }

    /// The field each result type sorts on under this mode.
    pub fn sort_source(&self, result_type: ResultType) -> SortSource {
        use ResultType as R;
        let field = match self {
            Self::Relevance => return SortSource::Relevance,
            Self::AlphaAsc | Self::AlphaDesc => match result_type {
                R::Animal => "ANIMALNAME",
                _ => "OWNERNAME",
            },
            Self::LastChangedAsc | Self::LastChangedDesc => match result_type {
                R::Licence => "ISSUEDATE",
                _ => "LASTCHANGEDDATE",
            },
            Self::SpeciesAsc | Self::SpeciesDesc => match result_type {
                R::Person => "OWNERNAME",
                R::Licence => "COMMENTS",
                _ => "SPECIESNAME",
            },
        };
        SortSource::Field(field)
    }
}

/// Strip the first matching sort directive out of `query`.
///
/// Directives are checked in a fixed priority order; only the winner is
/// removed (every occurrence of it), any others stay in the text.
pub fn extract_sort_directive(query: &str) -> Option<(SortMode, String)> {
    if !query.contains("sort:") {
        return None;
    }
    DIRECTIVES
        .iter()
        .find(|(directive, _)| query.contains(directive))
        .map(|(directive, mode)| (*mode, query.replace(directive, "")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_directive_maps_to_its_mode() {
        let cases = [
            ("sort:az", SortMode::AlphaAsc, "Alphabetically A-Z"),
            ("sort:za", SortMode::AlphaDesc, "Alphabetically Z-A"),
            ("sort:lr", SortMode::LastChangedAsc, "Least recently changed"),
            ("sort:mr", SortMode::LastChangedDesc, "Most recently changed"),
            ("sort:as", SortMode::SpeciesAsc, "Species A-Z"),
            ("sort:sa", SortMode::SpeciesDesc, "Species Z-A"),
            ("sort:rel", SortMode::Relevance, "Most relevant"),
        ];
        for (directive, mode, label) in cases {
            let query = format!("rex {directive} brown");
            let (found, rest) = extract_sort_directive(&query).expect("directive found");
            assert_eq!(found, mode, "{directive}");
            assert_eq!(rest, "rex  brown");
            assert_eq!(mode.label(), label);
            assert_eq!(mode.directive(), directive);
        }
    }

    #[test]
    fn first_directive_in_priority_order_wins() {
        let (mode, rest) = extract_sort_directive("sort:mr sort:az rex").expect("directive found");
        assert_eq!(mode, SortMode::AlphaAsc);
        assert_eq!(rest, "sort:mr  rex");
    }

    #[test]
    fn repeated_directive_removed_everywhere() {
        let (_, rest) = extract_sort_directive("sort:za a sort:za").expect("directive found");
        assert_eq!(rest, " a ");
    }

    #[test]
    fn no_directive_returns_none() {
        assert!(extract_sort_directive("fluffy").is_none());
        assert!(extract_sort_directive("sort:xx fluffy").is_none());
    }

    #[test]
    fn from_index_covers_legacy_settings() {
        assert_eq!(SortMode::from_index(0), Some(SortMode::AlphaAsc));
        assert_eq!(SortMode::from_index(3), Some(SortMode::LastChangedDesc));
        assert_eq!(SortMode::from_index(6), Some(SortMode::Relevance));
        assert_eq!(SortMode::from_index(7), None);
    }

    #[test]
    fn directions() {
        assert_eq!(SortMode::AlphaAsc.direction(), SortDirection::Ascending);
        assert_eq!(SortMode::SpeciesDesc.direction(), SortDirection::Descending);
        assert_eq!(SortMode::Relevance.direction(), SortDirection::Descending);
    }

    #[test]
    fn sort_field_table() {
        use ResultType as R;
        assert_eq!(SortMode::AlphaAsc.sort_source(R::Animal), SortSource::Field("ANIMALNAME"));
        assert_eq!(SortMode::AlphaDesc.sort_source(R::Licence), SortSource::Field("OWNERNAME"));
        assert_eq!(
            SortMode::LastChangedAsc.sort_source(R::Licence),
            SortSource::Field("ISSUEDATE")
        );
        assert_eq!(
            SortMode::LastChangedDesc.sort_source(R::WaitingList),
            SortSource::Field("LASTCHANGEDDATE")
        );
        assert_eq!(SortMode::SpeciesAsc.sort_source(R::Person), SortSource::Field("OWNERNAME"));
        assert_eq!(SortMode::SpeciesAsc.sort_source(R::Licence), SortSource::Field("COMMENTS"));
        assert_eq!(
            SortMode::SpeciesDesc.sort_source(R::FoundAnimal),
            SortSource::Field("SPECIESNAME")
        );
        assert_eq!(SortMode::Relevance.sort_source(R::Person), SortSource::Relevance);
    }

    #[test]
    fn date_fields_detected_by_suffix() {
        assert!(SortSource::Field("LASTCHANGEDDATE").is_date());
        assert!(SortSource::Field("ISSUEDATE").is_date());
        assert!(!SortSource::Field("OWNERNAME").is_date());
        assert!(SortSource::Relevance.is_date());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&SortMode::LastChangedDesc).expect("serialize");
        assert_eq!(json, "\"last_changed_desc\"");
    }
}
