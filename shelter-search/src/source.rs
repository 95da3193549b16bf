//! Contract for the record sources a search fans out to.
//!
//! The search core never reads records itself. The host implements
//! [`RecordSource`] over its own storage and answers each [`FindRequest`]
//! with a sequence of flat [`Record`]s. Requests carry the term, the record
//! cap and the session's scope filters; the source is expected to honour
//! them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::permission::Capability;
use crate::types::{Record, ResultType};

/// Which lookup a source is asked to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceQuery {
    /// Free-text animal find; an empty term means every animal on shelter.
    AnimalFind,
    /// Animals flagged as not for adoption.
    AnimalsNotForAdoption,
    /// Animals on shelter longer than the configured long-term period.
    AnimalsLongTerm,
    /// Animals with no microchip recorded.
    AnimalsNotMicrochipped,
    /// Animals held in case of reclaim.
    AnimalsOnHold,
    /// Animals whose hold ends today.
    AnimalsHoldEndsToday,
    /// Animals currently in quarantine.
    AnimalsInQuarantine,
    /// Shelter animals deceased in the last 30 days.
    AnimalsRecentlyDeceased,
    /// Animals matching the current publishing options.
    AnimalsForPublishing,
    /// Free-text person find, optionally restricted to a class.
    PersonFind,
    /// People with active reservations but no homecheck.
    PersonsReservedWithoutHomecheck,
    /// People with overdue donations.
    PersonsWithOverdueDonations,
    /// Free-text animal-control incident find.
    IncidentFind,
    /// Free-text waiting-list find.
    WaitingListFind,
    /// Free-text lost-animal find; an empty term means recent reports.
    LostAnimalFind,
    /// Free-text found-animal find; an empty term means recent reports.
    FoundAnimalFind,
    /// Licence number find.
    LicenceFind,
}

impl SourceQuery {
    /// The result type records from this lookup are tagged with.
    pub fn result_type(&self) -> ResultType {
        match self {
            Self::AnimalFind
            | Self::AnimalsNotForAdoption
            | Self::AnimalsLongTerm
            | Self::AnimalsNotMicrochipped
            | Self::AnimalsOnHold
            | Self::AnimalsHoldEndsToday
            | Self::AnimalsInQuarantine
            | Self::AnimalsRecentlyDeceased
            | Self::AnimalsForPublishing => ResultType::Animal,
            Self::PersonFind
            | Self::PersonsReservedWithoutHomecheck
            | Self::PersonsWithOverdueDonations => ResultType::Person,
            Self::IncidentFind => ResultType::AnimalControl,
            Self::WaitingListFind => ResultType::WaitingList,
            Self::LostAnimalFind => ResultType::LostAnimal,
            Self::FoundAnimalFind => ResultType::FoundAnimal,
            Self::LicenceFind => ResultType::Licence,
        }
    }

    /// The capability that must be held to run this lookup.
    pub fn capability(&self) -> Capability {
        match self.result_type() {
            ResultType::Animal => Capability::ViewAnimal,
            ResultType::Person => Capability::ViewPerson,
            ResultType::AnimalControl => Capability::ViewIncident,
            ResultType::WaitingList => Capability::ViewWaitingList,
            ResultType::LostAnimal => Capability::ViewLostAnimal,
            ResultType::FoundAnimal => Capability::ViewFoundAnimal,
            ResultType::Licence => Capability::ViewLicence,
        }
    }

    /// The free-text find for a result type.
    pub fn find_for(result_type: ResultType) -> Self {
        match result_type {
            ResultType::Animal => Self::AnimalFind,
            ResultType::Person => Self::PersonFind,
            ResultType::AnimalControl => Self::IncidentFind,
            ResultType::WaitingList => Self::WaitingListFind,
            ResultType::LostAnimal => Self::LostAnimalFind,
            ResultType::FoundAnimal => Self::FoundAnimalFind,
            ResultType::Licence => Self::LicenceFind,
        }
    }
}

/// Person sub-type filter for person finds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonClass {
    All,
    Vet,
    Retailer,
    Staff,
    Fosterer,
    Volunteer,
    Shelter,
    Aco,
    Banned,
    Homechecked,
    Homechecker,
    Member,
    Donor,
    Driver,
}

impl PersonClass {
    /// The class filter value understood by person stores.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Vet => "vet",
            Self::Retailer => "retailer",
            Self::Staff => "staff",
            Self::Fosterer => "fosterer",
            Self::Volunteer => "volunteer",
            Self::Shelter => "shelter",
            Self::Aco => "aco",
            Self::Banned => "banned",
            Self::Homechecked => "homechecked",
            Self::Homechecker => "homechecker",
            Self::Member => "member",
            Self::Donor => "donor",
            Self::Driver => "driver",
        }
    }
}

/// Session-derived restrictions passed to a source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeFilters {
    /// Searching user, for person and incident finds.
    pub user: Option<String>,
    /// Location restriction for animal finds.
    pub location_filter: Option<String>,
    /// Site restriction.
    pub site_id: Option<i64>,
    /// Animal id allowlist for animal finds.
    pub visible_animal_ids: Option<Vec<i64>>,
    /// Person class restriction for person finds.
    pub class_filter: Option<PersonClass>,
    /// Whether staff may appear in person finds.
    pub include_staff: bool,
    /// Whether volunteers may appear in person finds.
    pub include_volunteers: bool,
}

/// One lookup against a record source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindRequest {
    pub query: SourceQuery,
    /// Cleaned search term; empty for special searches.
    pub term: String,
    /// Maximum number of records to return.
    pub limit: usize,
    pub filters: ScopeFilters,
}

/// A pluggable record store.
///
/// Implementations must be `Send + Sync`: lookups for an unscoped search
/// are issued concurrently.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Run one lookup and return its records in the store's own order.
    ///
    /// # Errors
    ///
    /// Any failure is fatal to the search call and is returned unchanged.
    async fn find(&self, request: &FindRequest) -> Result<Vec<Record>>;
}
