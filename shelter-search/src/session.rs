//! The caller's authenticated session.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::permission::Capability;

/// Who is searching, what they may see, and which scope filters apply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    /// Authenticated user name.
    pub user: String,
    /// Capabilities granted to the user.
    pub capabilities: HashSet<Capability>,
    /// Restricts animal finds to these locations, when set.
    pub location_filter: Option<String>,
    /// Restricts finds to one site, when set.
    pub site_id: Option<i64>,
    /// Restricts animal finds to these animal ids, when set.
    pub visible_animal_ids: Option<Vec<i64>>,
}

impl Session {
    /// A session for `user` holding `capabilities`, with no scope filters.
    pub fn new(user: impl Into<String>, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            user: user.into(),
            capabilities: capabilities.into_iter().collect(),
            ..Default::default()
        }
    }

    /// A session holding every capability.
    pub fn superuser(user: impl Into<String>) -> Self {
        Self::new(user, Capability::all().iter().copied())
    }
}
