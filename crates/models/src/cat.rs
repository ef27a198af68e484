use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Lifecycle of an adoptable cat.
///
/// The stored set is open: values other than the three known ones are kept
/// verbatim in `Other` so such cats still list and link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CatStatus {
    Available,
    Pending,
    Adopted,
    Other(String),
}

impl CatStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CatStatus::Available => "Available",
            CatStatus::Pending => "Pending",
            CatStatus::Adopted => "Adopted",
            CatStatus::Other(raw) => raw,
        }
    }

    fn known(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Some(CatStatus::Available),
            "pending" => Some(CatStatus::Pending),
            "adopted" => Some(CatStatus::Adopted),
            _ => None,
        }
    }
}

impl fmt::Display for CatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient: whatever the store holds is kept.
impl From<&str> for CatStatus {
    fn from(s: &str) -> Self {
        CatStatus::known(s).unwrap_or_else(|| CatStatus::Other(s.trim().to_string()))
    }
}

impl From<String> for CatStatus {
    fn from(s: String) -> Self {
        CatStatus::from(s.as_str())
    }
}

impl From<CatStatus> for String {
    fn from(status: CatStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Strict: only the known statuses parse. Used for caller-supplied filters.
impl FromStr for CatStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CatStatus::known(s).ok_or_else(|| ModelError::Validation(format!("unknown cat status: {}", s.trim())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(ModelError::Validation(format!("unknown gender: {other}"))),
        }
    }
}

/// Adoptable cat, normalised from a `cats` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cat {
    pub id: String,
    pub name: String,
    pub age_months: u32,
    pub gender: Gender,
    pub breed: Option<String>,
    pub location: String,
    pub images: Vec<String>,
    pub description: String,
    /// Keys keep their stored order; values are already reduced to booleans.
    pub attributes: IndexMap<String, bool>,
    pub status: CatStatus,
    pub created_at: Option<DateTime<Utc>>,
}
