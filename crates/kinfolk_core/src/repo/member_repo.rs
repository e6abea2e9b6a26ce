//! Member repository: the single owner of the member collection.
//!
//! # Responsibility
//! - Provide upsert/delete/find/list over an ordered in-memory collection.
//! - Persist the whole collection through the injected `Store` after every
//!   mutation.
//!
//! # Invariants
//! - Member ids are unique within the collection.
//! - `age` is recomputed from `date_of_birth` on load and on every write.
//! - A failed save rolls the in-memory mutation back.
//! - A blob from a newer format is never overwritten.
//! - Callers only get clones or shared slices, never `&mut Member`.

use crate::age::{age_on, Clock, SystemClock};
use crate::model::member::{Member, MemberDraft, MemberId, MemberValidationError};
use crate::store::{Store, StoreError, FORMAT_VERSION};
use log::{error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for member writes.
#[derive(Debug)]
pub enum RepoError {
    Validation(MemberValidationError),
    /// Durable write failed; the in-memory collection was left unchanged.
    Persistence(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "failed to persist members: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<MemberValidationError> for RepoError {
    fn from(value: MemberValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Persistence(value)
    }
}

enum Undo {
    Pop,
    Restore(usize, Member),
}

/// In-memory member collection backed by a durable store.
pub struct MemberRepository<S: Store, C: Clock = SystemClock> {
    store: S,
    clock: C,
    members: Vec<Member>,
    load_error: Option<StoreError>,
    // Format version of an unreadable newer blob; writes are refused.
    newer_format: Option<u32>,
}

impl<S: Store> MemberRepository<S> {
    /// Loads the collection using the system calendar for ages.
    pub fn open(store: S) -> Self {
        Self::open_with_clock(store, SystemClock)
    }
}

impl<S: Store, C: Clock> MemberRepository<S, C> {
    /// Loads the collection from `store`.
    ///
    /// A load failure is not fatal: the collection starts empty and the error
    /// is kept for [`Self::take_load_error`]. When the blob was written in a
    /// newer format the repository stays read-only.
    ///
    /// Ages of loaded members are recomputed against `clock`.
    pub fn open_with_clock(store: S, clock: C) -> Self {
        let today = clock.today();
        let (members, load_error) = match store.load() {
            Ok(members) => {
                let mut members = dedupe_ids(members);
                for member in &mut members {
                    member.age = age_on(member.date_of_birth, today);
                }
                (members, None)
            }
            Err(err) => {
                warn!(
                    "event=repo_open module=repo status=degraded error={}",
                    err
                );
                (Vec::new(), Some(err))
            }
        };

        let newer_format = match &load_error {
            Some(StoreError::UnsupportedFormatVersion { found, .. }) => Some(*found),
            _ => None,
        };

        info!(
            "event=repo_open module=repo status=ok count={} read_only={}",
            members.len(),
            newer_format.is_some()
        );

        Self {
            store,
            clock,
            members,
            load_error,
            newer_format,
        }
    }

    /// True when the stored blob is newer than this build can write.
    pub fn is_read_only(&self) -> bool {
        self.newer_format.is_some()
    }

    /// Returns the load failure raised during open, once.
    pub fn take_load_error(&mut self) -> Option<StoreError> {
        self.load_error.take()
    }

    /// Creates or replaces a member.
    ///
    /// With a `target_id` that resolves, the member is replaced in place and
    /// keeps its id and position. Otherwise a fresh id is generated and the
    /// member is appended. Any age carried by `draft` is ignored.
    ///
    /// # Errors
    /// - `Validation` when the trimmed name is empty.
    /// - `Persistence` when the store rejects the write or the repository is
    ///   read-only; nothing changes.
    pub fn upsert(
        &mut self,
        draft: &MemberDraft,
        target_id: Option<MemberId>,
    ) -> RepoResult<Member> {
        draft.validate()?;
        self.ensure_writable("member_upsert")?;

        let existing = target_id.and_then(|id| self.position(id));
        if let (Some(id), None) = (target_id, existing) {
            warn!(
                "event=member_upsert module=repo status=target_missing target_id={}",
                id
            );
        }

        let id = match existing {
            Some(index) => self.members[index].id,
            None => self.fresh_id(),
        };
        let member = Member {
            id,
            name: draft.name.trim().to_string(),
            date_of_birth: draft.date_of_birth,
            age: age_on(draft.date_of_birth, self.clock.today()),
            gender: draft.gender,
            relation: draft.relation,
            education: draft.education.trim().to_string(),
        };

        let undo = match existing {
            Some(index) => Undo::Restore(
                index,
                std::mem::replace(&mut self.members[index], member.clone()),
            ),
            None => {
                self.members.push(member.clone());
                Undo::Pop
            }
        };

        if let Err(err) = self.store.save(&self.members) {
            self.rollback(undo);
            error!(
                "event=member_upsert module=repo status=error member_id={} error={}",
                id, err
            );
            return Err(RepoError::Persistence(err));
        }

        info!(
            "event=member_upsert module=repo status=ok member_id={} mode={} count={}",
            id,
            if existing.is_some() { "update" } else { "create" },
            self.members.len()
        );
        Ok(member)
    }

    /// Removes a member by id.
    ///
    /// Returns `Ok(false)` without touching the store when `id` is absent.
    pub fn delete(&mut self, id: MemberId) -> RepoResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        self.ensure_writable("member_delete")?;

        let removed = self.members.remove(index);
        if let Err(err) = self.store.save(&self.members) {
            self.members.insert(index, removed);
            error!(
                "event=member_delete module=repo status=error member_id={} error={}",
                id, err
            );
            return Err(RepoError::Persistence(err));
        }

        info!(
            "event=member_delete module=repo status=ok member_id={} count={}",
            id,
            self.members.len()
        );
        Ok(true)
    }

    pub fn find_by_id(&self, id: MemberId) -> Option<Member> {
        self.members.iter().find(|member| member.id == id).cloned()
    }

    /// Read-only view in insertion order.
    pub fn all(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn ensure_writable(&self, event: &str) -> RepoResult<()> {
        match self.newer_format {
            None => Ok(()),
            Some(found) => {
                warn!(
                    "event={} module=repo status=read_only format_version={}",
                    event, found
                );
                Err(RepoError::Persistence(StoreError::UnsupportedFormatVersion {
                    found,
                    supported: FORMAT_VERSION,
                }))
            }
        }
    }

    fn position(&self, id: MemberId) -> Option<usize> {
        self.members.iter().position(|member| member.id == id)
    }

    fn fresh_id(&self) -> MemberId {
        loop {
            let candidate = Uuid::new_v4();
            if self.position(candidate).is_none() {
                return candidate;
            }
        }
    }

    fn rollback(&mut self, undo: Undo) {
        match undo {
            Undo::Pop => {
                self.members.pop();
            }
            Undo::Restore(index, previous) => {
                self.members[index] = previous;
            }
        }
    }
}

// Older blobs may contain repeated ids; the first occurrence wins.
fn dedupe_ids(members: Vec<Member>) -> Vec<Member> {
    let mut seen = HashSet::with_capacity(members.len());
    let before = members.len();
    let unique: Vec<Member> = members
        .into_iter()
        .filter(|member| seen.insert(member.id))
        .collect();
    if unique.len() != before {
        warn!(
            "event=repo_open module=repo status=deduped dropped={}",
            before - unique.len()
        );
    }
    unique
}
