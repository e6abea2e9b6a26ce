//! Family member domain model.
//!
//! # Responsibility
//! - Define the canonical record stored by the member repository.
//! - Define the candidate shape (`MemberDraft`) produced by form input.
//!
//! # Invariants
//! - `id` is stable and never reused for another member.
//! - `age` is derived from `date_of_birth`; it is never authoritative input.
//! - `name` and `education` are stored trimmed.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a family member.
pub type MemberId = Uuid;

/// Placeholder rendered for an empty education field.
pub const EDUCATION_PLACEHOLDER: &str = "-";

/// Gender choices offered by the member form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    /// Display and wire text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }

    /// Parses display text case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|gender| gender.as_str().eq_ignore_ascii_case(value))
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relation of a member to the household owner.
///
/// New relations may be appended; callers outside the crate must keep a
/// wildcard arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Relation {
    Father,
    Mother,
    Spouse,
    Sibling,
    Child,
    Grandparent,
    Other,
}

impl Relation {
    pub const ALL: [Relation; 7] = [
        Relation::Father,
        Relation::Mother,
        Relation::Spouse,
        Relation::Sibling,
        Relation::Child,
        Relation::Grandparent,
        Relation::Other,
    ];

    /// Display and wire text. Search matches against this text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Father => "Father",
            Self::Mother => "Mother",
            Self::Spouse => "Spouse",
            Self::Sibling => "Sibling",
            Self::Child => "Child",
            Self::Grandparent => "Grandparent",
            Self::Other => "Other",
        }
    }

    /// Parses display text case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|relation| relation.as_str().eq_ignore_ascii_case(value))
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for member candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberValidationError {
    /// Name is empty after trimming.
    EmptyName,
}

impl Display for MemberValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
        }
    }
}

impl Error for MemberValidationError {}

/// Canonical stored record for one family member.
///
/// Serialized with camelCase field names; this is the persisted layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    /// Accepts the legacy `dob` key and an empty string for "absent".
    #[serde(default, alias = "dob", deserialize_with = "deserialize_optional_date")]
    pub date_of_birth: Option<NaiveDate>,
    /// Whole years as of the last save. `None` when the birth date is unknown.
    #[serde(default)]
    pub age: Option<u32>,
    pub gender: Gender,
    pub relation: Relation,
    #[serde(default)]
    pub education: String,
}

impl Member {
    /// Education text for display, with a placeholder when empty.
    pub fn education_display(&self) -> &str {
        if self.education.is_empty() {
            EDUCATION_PLACEHOLDER
        } else {
            self.education.as_str()
        }
    }

    /// Age text for display; empty when unknown.
    pub fn age_display(&self) -> String {
        self.age.map(|age| age.to_string()).unwrap_or_default()
    }
}

/// Candidate member built from form input.
///
/// `age` mirrors whatever the caller displayed; the repository ignores it and
/// recomputes from `date_of_birth`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDraft {
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub age: Option<u32>,
    pub gender: Gender,
    pub relation: Relation,
    pub education: String,
}

impl MemberDraft {
    /// Creates a draft with no birth date and empty education.
    pub fn new(name: impl Into<String>, gender: Gender, relation: Relation) -> Self {
        Self {
            name: name.into(),
            date_of_birth: None,
            age: None,
            gender,
            relation,
            education: String::new(),
        }
    }

    pub fn with_date_of_birth(mut self, date_of_birth: NaiveDate) -> Self {
        self.date_of_birth = Some(date_of_birth);
        self
    }

    pub fn with_education(mut self, education: impl Into<String>) -> Self {
        self.education = education.into();
        self
    }

    /// Checks the only hard invariant enforced at write time.
    pub fn validate(&self) -> Result<(), MemberValidationError> {
        if self.name.trim().is_empty() {
            return Err(MemberValidationError::EmptyName);
        }
        Ok(())
    }
}

impl From<&Member> for MemberDraft {
    fn from(member: &Member) -> Self {
        Self {
            name: member.name.clone(),
            date_of_birth: member.date_of_birth,
            age: member.age,
            gender: member.gender,
            relation: member.relation,
            education: member.education.clone(),
        }
    }
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
