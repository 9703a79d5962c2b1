use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::FilterError;
use crate::model::Role;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleFilter {
    #[default]
    All,
    Only(Role),
}

impl RoleFilter {
    pub fn matches(&self, role: Role) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::Only(wanted) => *wanted == role,
        }
    }
}

impl FromStr for RoleFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(RoleFilter::All),
            "teacher" => Ok(RoleFilter::Only(Role::Teacher)),
            "deanery" => Ok(RoleFilter::Only(Role::Deanery)),
            "student" => Ok(RoleFilter::Only(Role::Student)),
            other => Err(FilterError::UnknownRole(other.to_string())),
        }
    }
}

/// View-owned predicates layered over a loaded collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub role: RoleFilter,
    pub query: String,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(mut self, role: RoleFilter) -> Self {
        self.role = role;
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn is_unfiltered(&self) -> bool {
        self.role == RoleFilter::All && self.query.is_empty()
    }
}
