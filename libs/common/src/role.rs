//! Resident roles and the authorization predicates attached to them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role carried by every resident account.
///
/// Stored as lowercase text; parsing ignores case so that rows written by
/// older tooling (`"Police"`, `"ADMIN"`) still resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Role {
    Resident,
    Police,
    Admin,
    Accountant,
    Guard,
}

/// Returned when a role string is not one of the known roles
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Resident,
        Role::Police,
        Role::Admin,
        Role::Accountant,
        Role::Guard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Resident => "resident",
            Role::Police => "police",
            Role::Admin => "admin",
            Role::Accountant => "accountant",
            Role::Guard => "guard",
        }
    }

    /// Only security staff can hold a duty shift
    pub fn is_assignable_to_shift(&self) -> bool {
        matches!(self, Role::Police)
    }

    /// Create, reassign and delete shifts
    pub fn can_schedule_shifts(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn can_view_shifts(&self) -> bool {
        matches!(self, Role::Admin | Role::Police | Role::Guard)
    }

    /// Staff roles that triage complaints and write responses
    pub fn handles_complaints(&self) -> bool {
        matches!(self, Role::Admin | Role::Police | Role::Accountant)
    }

    pub fn can_delete_any_complaint(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
