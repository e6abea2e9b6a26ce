//! Member list filtering.
//!
//! # Responsibility
//! - Match a free-text term against name and relation text.
//! - Apply exact gender/relation filters.
//!
//! # Invariants
//! - Pure and deterministic; input order is preserved.
//! - A blank term matches everything.

use crate::model::member::{Gender, Member, Relation};

/// Search and filter criteria for the member table.
///
/// `None` for `gender`/`relation` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberQuery {
    pub term: String,
    pub gender: Option<Gender>,
    pub relation: Option<Relation>,
}

impl MemberQuery {
    /// Query matching every member.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    pub fn with_gender(mut self, gender: Option<Gender>) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_relation(mut self, relation: Option<Relation>) -> Self {
        self.relation = relation;
        self
    }

    /// Returns whether `member` passes every criterion.
    pub fn matches(&self, member: &Member) -> bool {
        self.matcher().matches(member)
    }

    fn matcher(&self) -> Matcher<'_> {
        Matcher {
            needle: self.term.trim().to_lowercase(),
            query: self,
        }
    }
}

// Holds the lowercased term so one `visible` call lowercases it once.
struct Matcher<'q> {
    needle: String,
    query: &'q MemberQuery,
}

impl Matcher<'_> {
    fn matches(&self, member: &Member) -> bool {
        self.matches_term(member)
            && self.query.gender.map_or(true, |gender| member.gender == gender)
            && self
                .query
                .relation
                .map_or(true, |relation| member.relation == relation)
    }

    fn matches_term(&self, member: &Member) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        member.name.to_lowercase().contains(&self.needle)
            || member
                .relation
                .as_str()
                .to_lowercase()
                .contains(&self.needle)
    }
}

/// Returns clones of the members passing `query`, in input order.
pub fn visible(records: &[Member], query: &MemberQuery) -> Vec<Member> {
    let matcher = query.matcher();
    records
        .iter()
        .filter(|member| matcher.matches(member))
        .cloned()
        .collect()
}
