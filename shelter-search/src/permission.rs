//! View capabilities and the per-search permission gate.
//!
//! Every record source is guarded by a view capability. A denied source
//! contributes nothing to the result set; denial is never an error.
//! [`PermissionGate`] asks the [`PermissionService`] at most once per
//! capability for the duration of one search.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::session::Session;

/// A view permission checked before querying a record source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// View animal records.
    ViewAnimal,
    /// View person records.
    ViewPerson,
    /// Include staff in person finds.
    ViewStaff,
    /// Include volunteers in person finds.
    ViewVolunteer,
    /// View animal-control incidents.
    ViewIncident,
    /// View the waiting list.
    ViewWaitingList,
    /// View lost-animal reports.
    ViewLostAnimal,
    /// View found-animal reports.
    ViewFoundAnimal,
    /// View licences.
    ViewLicence,
}

impl Capability {
    /// Return all capability variants.
    pub fn all() -> &'static [Capability] {
        &[
            Capability::ViewAnimal,
            Capability::ViewPerson,
            Capability::ViewStaff,
            Capability::ViewVolunteer,
            Capability::ViewIncident,
            Capability::ViewWaitingList,
            Capability::ViewLostAnimal,
            Capability::ViewFoundAnimal,
            Capability::ViewLicence,
        ]
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Capability::ViewAnimal => "view_animal",
            Capability::ViewPerson => "view_person",
            Capability::ViewStaff => "view_staff",
            Capability::ViewVolunteer => "view_volunteer",
            Capability::ViewIncident => "view_incident",
            Capability::ViewWaitingList => "view_waiting_list",
            Capability::ViewLostAnimal => "view_lost_animal",
            Capability::ViewFoundAnimal => "view_found_animal",
            Capability::ViewLicence => "view_licence",
        };
        f.write_str(s)
    }
}

impl FromStr for Capability {
    type Err = CapabilityParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "view_animal" => Ok(Capability::ViewAnimal),
            "view_person" => Ok(Capability::ViewPerson),
            "view_staff" => Ok(Capability::ViewStaff),
            "view_volunteer" => Ok(Capability::ViewVolunteer),
            "view_incident" => Ok(Capability::ViewIncident),
            "view_waiting_list" | "view_waitinglist" => Ok(Capability::ViewWaitingList),
            "view_lost_animal" => Ok(Capability::ViewLostAnimal),
            "view_found_animal" => Ok(Capability::ViewFoundAnimal),
            "view_licence" | "view_license" => Ok(Capability::ViewLicence),
            _ => Err(CapabilityParseError(s.to_owned())),
        }
    }
}

/// Error returned when parsing an unknown capability string.
#[derive(Debug, Clone)]
pub struct CapabilityParseError(pub String);

impl fmt::Display for CapabilityParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown capability: {:?}", self.0)
    }
}

impl std::error::Error for CapabilityParseError {}

/// Answers capability checks for a session.
pub trait PermissionService: Send + Sync {
    /// Whether `session` holds `capability`.
    ///
    /// # Errors
    ///
    /// Implementations backed by an external service may fail; the error is
    /// fatal to the search call.
    fn has_capability(&self, session: &Session, capability: Capability) -> Result<bool>;
}

/// Checks capabilities against [`Session::capabilities`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionCapabilities;

impl PermissionService for SessionCapabilities {
    fn has_capability(&self, session: &Session, capability: Capability) -> Result<bool> {
        Ok(session.capabilities.contains(&capability))
    }
}

/// Memoizing capability gate for one search call.
pub struct PermissionGate<'a> {
    service: &'a dyn PermissionService,
    session: &'a Session,
    answers: HashMap<Capability, bool>,
}

impl<'a> PermissionGate<'a> {
    pub fn new(service: &'a dyn PermissionService, session: &'a Session) -> Self {
        Self {
            service,
            session,
            answers: HashMap::new(),
        }
    }

    /// Whether the session may use `capability`.
    pub fn allows(&mut self, capability: Capability) -> Result<bool> {
        if let Some(&answer) = self.answers.get(&capability) {
            return Ok(answer);
        }
        let answer = self.service.has_capability(self.session, capability)?;
        if !answer {
            tracing::debug!(%capability, user = %self.session.user, "capability denied");
        }
        self.answers.insert(capability, answer);
        Ok(answer)
    }
}
