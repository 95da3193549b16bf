//! Query mini-language: sort directives, special keywords and scoped prefixes.
//!
//! A raw query is reduced to a [`ParsedQuery`] in four steps:
//!
//! 1. apostrophes become backticks
//! 2. the first sort directive in priority order is stripped (see [`crate::sort`])
//! 3. surrounding whitespace is trimmed
//! 4. the text is matched against the special keywords, then scoped
//!    prefixes (`a:rex`, `person:smith`, ...); anything else searches every
//!    source
//!
//! ```text
//! "sort:mr la:fluffy"  →  LastChangedDesc, Scoped(LOSTANIMAL), "fluffy"
//! "os"                 →  default sort, Special(OnShelter), ""
//! "smith"              →  default sort, Everything, "smith"
//! ```

use crate::sort::{extract_sort_directive, SortMode};
use crate::source::{PersonClass, SourceQuery};
use crate::types::ResultType;

/// A named canned search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialSearch {
    OnShelter,
    NotForAdoption,
    LongTerm,
    NotMicrochipped,
    Hold,
    HoldToday,
    Quarantine,
    Deceased,
    ForPublish,
    /// People of one class (`people` is [`PersonClass::All`]).
    People(PersonClass),
    ReserveNoHomecheck,
    OverdueDonations,
    ActiveLost,
    ActiveFound,
}

const KEYWORDS: &[(&str, SpecialSearch)] = &[
    ("onshelter", SpecialSearch::OnShelter),
    ("os", SpecialSearch::OnShelter),
    ("notforadoption", SpecialSearch::NotForAdoption),
    ("longterm", SpecialSearch::LongTerm),
    ("notmicrochipped", SpecialSearch::NotMicrochipped),
    ("hold", SpecialSearch::Hold),
    ("holdtoday", SpecialSearch::HoldToday),
    ("quarantine", SpecialSearch::Quarantine),
    ("deceased", SpecialSearch::Deceased),
    ("forpublish", SpecialSearch::ForPublish),
    ("people", SpecialSearch::People(PersonClass::All)),
    ("vets", SpecialSearch::People(PersonClass::Vet)),
    ("retailers", SpecialSearch::People(PersonClass::Retailer)),
    ("staff", SpecialSearch::People(PersonClass::Staff)),
    ("fosterers", SpecialSearch::People(PersonClass::Fosterer)),
    ("volunteers", SpecialSearch::People(PersonClass::Volunteer)),
    ("shelters", SpecialSearch::People(PersonClass::Shelter)),
    ("aco", SpecialSearch::People(PersonClass::Aco)),
    ("banned", SpecialSearch::People(PersonClass::Banned)),
    ("homechecked", SpecialSearch::People(PersonClass::Homechecked)),
    ("homecheckers", SpecialSearch::People(PersonClass::Homechecker)),
    ("members", SpecialSearch::People(PersonClass::Member)),
    ("donors", SpecialSearch::People(PersonClass::Donor)),
    ("drivers", SpecialSearch::People(PersonClass::Driver)),
    ("reservenohomecheck", SpecialSearch::ReserveNoHomecheck),
    ("overduedonations", SpecialSearch::OverdueDonations),
    ("activelost", SpecialSearch::ActiveLost),
    ("activefound", SpecialSearch::ActiveFound),
];

impl SpecialSearch {
    /// Exact, case-sensitive keyword lookup.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(k, _)| *k == keyword)
            .map(|(_, special)| *special)
    }

    /// Every recognised keyword.
    pub fn keywords() -> impl Iterator<Item = &'static str> {
        KEYWORDS.iter().map(|(k, _)| *k)
    }

    /// The single lookup this search runs.
    pub fn source_query(&self) -> SourceQuery {
        match self {
            Self::OnShelter => SourceQuery::AnimalFind,
            Self::NotForAdoption => SourceQuery::AnimalsNotForAdoption,
            Self::LongTerm => SourceQuery::AnimalsLongTerm,
            Self::NotMicrochipped => SourceQuery::AnimalsNotMicrochipped,
            Self::Hold => SourceQuery::AnimalsOnHold,
            Self::HoldToday => SourceQuery::AnimalsHoldEndsToday,
            Self::Quarantine => SourceQuery::AnimalsInQuarantine,
            Self::Deceased => SourceQuery::AnimalsRecentlyDeceased,
            Self::ForPublish => SourceQuery::AnimalsForPublishing,
            Self::People(_) => SourceQuery::PersonFind,
            Self::ReserveNoHomecheck => SourceQuery::PersonsReservedWithoutHomecheck,
            Self::OverdueDonations => SourceQuery::PersonsWithOverdueDonations,
            Self::ActiveLost => SourceQuery::LostAnimalFind,
            Self::ActiveFound => SourceQuery::FoundAnimalFind,
        }
    }

    /// Person class filter, for the person-class keywords.
    pub fn class_filter(&self) -> Option<PersonClass> {
        match self {
            Self::People(class) => Some(*class),
            _ => None,
        }
    }

    /// Untranslated explanation. `LongTerm` takes the month count as `{0}`.
    pub fn explanation(&self) -> &'static str {
        match self {
            Self::OnShelter => "All animals on the shelter.",
            Self::NotForAdoption => "All animals who are flagged as not for adoption.",
            Self::LongTerm => "All animals who have been on the shelter longer than {0} months.",
            Self::NotMicrochipped => "All animals who have not been microchipped",
            Self::Hold => "All animals who are currently held in case of reclaim.",
            Self::HoldToday => "All animals where the hold ends today.",
            Self::Quarantine => "All animals who are currently quarantined.",
            Self::Deceased => "Recently deceased shelter animals (last 30 days).",
            Self::ForPublish => "All animals matching current publishing options.",
            Self::People(class) => match class {
                PersonClass::All => "All people on file.",
                PersonClass::Vet => "All vets on file.",
                PersonClass::Retailer => "All retailers on file.",
                PersonClass::Staff => "All staff on file.",
                PersonClass::Fosterer => "All fosterers on file.",
                PersonClass::Volunteer => "All volunteers on file.",
                PersonClass::Shelter => "All animal shelters on file.",
                PersonClass::Aco => "All animal care officers on file.",
                PersonClass::Banned => "All banned owners on file.",
                PersonClass::Homechecked => "All homechecked owners on file.",
                PersonClass::Homechecker => "All homecheckers on file.",
                PersonClass::Member => "All members on file.",
                PersonClass::Donor => "All donors on file.",
                PersonClass::Driver => "All drivers on file.",
            },
            Self::ReserveNoHomecheck => {
                "People with active reservations, but no homecheck has been done."
            }
            Self::OverdueDonations => "People with overdue donations.",
            Self::ActiveLost => "Lost animals reported in the last 30 days.",
            Self::ActiveFound => "Found animals reported in the last 30 days.",
        }
    }
}

/// Result type selected by a scoped prefix, short or long form.
pub fn scope_for_prefix(prefix: &str) -> Option<ResultType> {
    match prefix {
        "a" | "animal" => Some(ResultType::Animal),
        "ac" | "animalcontrol" => Some(ResultType::AnimalControl),
        "p" | "person" => Some(ResultType::Person),
        "wl" | "waitinglist" => Some(ResultType::WaitingList),
        "la" | "lostanimal" => Some(ResultType::LostAnimal),
        "fa" | "foundanimal" => Some(ResultType::FoundAnimal),
        "li" | "license" => Some(ResultType::Licence),
        _ => None,
    }
}

/// Untranslated explanation for a scoped search; the term is `{0}`.
pub fn scope_explanation(scope: ResultType) -> &'static str {
    match scope {
        ResultType::Animal => "Animals matching '{0}'.",
        ResultType::AnimalControl => "Animal control incidents matching '{0}'.",
        ResultType::Person => "People matching '{0}'.",
        ResultType::WaitingList => "Waiting list entries matching '{0}'.",
        ResultType::LostAnimal => "Lost animal entries matching '{0}'.",
        ResultType::FoundAnimal => "Found animal entries matching '{0}'.",
        ResultType::Licence => "License numbers matching '{0}'.",
    }
}

/// Untranslated explanation for an unscoped search; the term is `{0}`.
pub const EVERYTHING_EXPLANATION: &str = "Results for '{0}'.";

/// Where a parsed query is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A canned search with an implicit term.
    Special(SpecialSearch),
    /// One source only.
    Scoped(ResultType),
    /// Every permitted source.
    Everything,
}

/// The routing decision for one raw query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub dispatch: Dispatch,
    /// Term handed to sources; empty for special searches.
    pub term: String,
    pub sort_mode: SortMode,
}

impl ParsedQuery {
    /// Untranslated explanation template for this query.
    pub fn explanation(&self) -> &'static str {
        match self.dispatch {
            Dispatch::Special(special) => special.explanation(),
            Dispatch::Scoped(scope) => scope_explanation(scope),
            Dispatch::Everything => EVERYTHING_EXPLANATION,
        }
    }
}

/// Parse a raw query string.
pub fn parse_query(raw: &str, default_sort: SortMode) -> ParsedQuery {
    let normalized = raw.replace('\'', "`");
    let (sort_mode, text) = match extract_sort_directive(&normalized) {
        Some((mode, rest)) => (mode, rest),
        None => (default_sort, normalized),
    };
    let text = text.trim();

    if let Some(special) = SpecialSearch::from_keyword(text) {
        return ParsedQuery {
            dispatch: Dispatch::Special(special),
            term: String::new(),
            sort_mode,
        };
    }

    if let Some((prefix, rest)) = text.split_once(':') {
        if let Some(scope) = scope_for_prefix(prefix) {
            return ParsedQuery {
                dispatch: Dispatch::Scoped(scope),
                term: rest.trim().to_string(),
                sort_mode,
            };
        }
    }

    ParsedQuery {
        dispatch: Dispatch::Everything,
        term: text.to_string(),
        sort_mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: SortMode = SortMode::Relevance;

    #[test]
    fn sort_directive_stripped_before_prefix() {
        let parsed = parse_query("sort:mr la:fluffy", DEFAULT);
        assert_eq!(parsed.sort_mode, SortMode::LastChangedDesc);
        assert_eq!(parsed.dispatch, Dispatch::Scoped(ResultType::LostAnimal));
        assert_eq!(parsed.term, "fluffy");
        assert_eq!(parsed.explanation(), "Lost animal entries matching '{0}'.");
    }

    #[test]
    fn directive_anywhere_in_query() {
        let parsed = parse_query("brown dog sort:za", SortMode::AlphaAsc);
        assert_eq!(parsed.sort_mode, SortMode::AlphaDesc);
        assert_eq!(parsed.dispatch, Dispatch::Everything);
        assert_eq!(parsed.term, "brown dog");
    }

    #[test]
    fn default_sort_kept_without_directive() {
        let parsed = parse_query("rex", SortMode::SpeciesAsc);
        assert_eq!(parsed.sort_mode, SortMode::SpeciesAsc);
    }

    #[test]
    fn apostrophes_become_backticks() {
        let parsed = parse_query("o'brien", DEFAULT);
        assert_eq!(parsed.term, "o`brien");
        assert_eq!(parsed.explanation(), "Results for '{0}'.");
    }

    #[test]
    fn every_keyword_is_special_with_empty_term() {
        for keyword in SpecialSearch::keywords() {
            let parsed = parse_query(keyword, DEFAULT);
            assert!(
                matches!(parsed.dispatch, Dispatch::Special(_)),
                "{keyword} should be special"
            );
            assert!(parsed.term.is_empty(), "{keyword} should have empty term");
        }
        assert_eq!(SpecialSearch::keywords().count(), 28);
    }

    #[test]
    fn keyword_survives_sort_directive_and_padding() {
        let parsed = parse_query("  os sort:az ", DEFAULT);
        assert_eq!(parsed.dispatch, Dispatch::Special(SpecialSearch::OnShelter));
        assert_eq!(parsed.sort_mode, SortMode::AlphaAsc);
    }

    #[test]
    fn keywords_are_case_sensitive_and_exact() {
        assert_eq!(parse_query("OS", DEFAULT).dispatch, Dispatch::Everything);
        assert_eq!(parse_query("hold rex", DEFAULT).dispatch, Dispatch::Everything);
    }

    #[test]
    fn keyword_lookups() {
        assert_eq!(
            SpecialSearch::from_keyword("homecheckers"),
            Some(SpecialSearch::People(PersonClass::Homechecker))
        );
        assert_eq!(
            SpecialSearch::from_keyword("holdtoday").map(|s| s.source_query()),
            Some(SourceQuery::AnimalsHoldEndsToday)
        );
        assert_eq!(
            SpecialSearch::ActiveFound.source_query(),
            SourceQuery::FoundAnimalFind
        );
        assert_eq!(SpecialSearch::Hold.class_filter(), None);
        assert_eq!(
            SpecialSearch::People(PersonClass::Vet).class_filter(),
            Some(PersonClass::Vet)
        );
    }

    #[test]
    fn every_prefix_form_routes_to_one_scope() {
        let cases = [
            ("a", "animal", ResultType::Animal),
            ("ac", "animalcontrol", ResultType::AnimalControl),
            ("p", "person", ResultType::Person),
            ("wl", "waitinglist", ResultType::WaitingList),
            ("la", "lostanimal", ResultType::LostAnimal),
            ("fa", "foundanimal", ResultType::FoundAnimal),
            ("li", "license", ResultType::Licence),
        ];
        for (short, long, scope) in cases {
            for prefix in [short, long] {
                let parsed = parse_query(&format!("{prefix}: term "), DEFAULT);
                assert_eq!(parsed.dispatch, Dispatch::Scoped(scope), "{prefix}");
                assert_eq!(parsed.term, "term");
            }
        }
    }

    #[test]
    fn only_first_colon_splits() {
        let parsed = parse_query("ac:12:30 noise", DEFAULT);
        assert_eq!(parsed.dispatch, Dispatch::Scoped(ResultType::AnimalControl));
        assert_eq!(parsed.term, "12:30 noise");
    }

    #[test]
    fn unknown_prefix_searches_everything_verbatim() {
        let parsed = parse_query("xyz:rex", DEFAULT);
        assert_eq!(parsed.dispatch, Dispatch::Everything);
        assert_eq!(parsed.term, "xyz:rex");
    }

    #[test]
    fn empty_scoped_term_is_allowed() {
        let parsed = parse_query("p:", DEFAULT);
        assert_eq!(parsed.dispatch, Dispatch::Scoped(ResultType::Person));
        assert!(parsed.term.is_empty());
    }

    #[test]
    fn long_term_explanation_has_placeholder() {
        assert!(SpecialSearch::LongTerm.explanation().contains("{0}"));
    }
}
