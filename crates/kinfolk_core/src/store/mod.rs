//! Durable key-value persistence for the member collection.
//!
//! # Responsibility
//! - Define the `Store` contract used by the member repository.
//! - Own the serialized blob layout (versioned envelope + legacy array).
//!
//! # Invariants
//! - The whole collection lives in one blob under [`STORAGE_KEY`].
//! - Unreadable blobs load as an empty collection; transport failures and
//!   newer format versions are reported as errors.
//! - Write failures are always returned to the caller.

use crate::db::DbError;
use crate::model::member::Member;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory_store;
pub mod sqlite_store;

pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;

/// Fixed key of the member collection slot.
pub const STORAGE_KEY: &str = "family_details_data";

/// Blob layout version written by this build.
pub const FORMAT_VERSION: u32 = 1;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence-layer failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Encode(serde_json::Error),
    /// Blob was written by a newer build.
    UnsupportedFormatVersion { found: u32, supported: u32 },
    /// Backend refused the operation.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode member records: {err}"),
            Self::UnsupportedFormatVersion { found, supported } => write!(
                f,
                "stored records use format version {found}, newer than supported {supported}"
            ),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::UnsupportedFormatVersion { .. } | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable slot holding the member collection.
pub trait Store {
    /// Loads the persisted collection, or an empty one when nothing usable is
    /// stored.
    fn load(&self) -> StoreResult<Vec<Member>>;
    /// Replaces the persisted collection.
    fn save(&self, members: &[Member]) -> StoreResult<()>;
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn load(&self) -> StoreResult<Vec<Member>> {
        (**self).load()
    }

    fn save(&self, members: &[Member]) -> StoreResult<()> {
        (**self).save(members)
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    records: &'a [Member],
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    records: Vec<Member>,
}

/// Serializes members into the versioned blob layout.
pub fn encode_members(members: &[Member]) -> StoreResult<String> {
    serde_json::to_string(&EnvelopeRef {
        version: FORMAT_VERSION,
        records: members,
    })
    .map_err(StoreError::Encode)
}

/// Decodes a stored blob.
///
/// Accepts the versioned envelope and the unversioned legacy array. Anything
/// else decodes to an empty collection.
pub fn decode_members(blob: &str) -> StoreResult<Vec<Member>> {
    let value: Value = match serde_json::from_str(blob) {
        Ok(value) => value,
        Err(err) => return Ok(unreadable(&format!("invalid json: {err}"))),
    };

    if let Some(version) = value.get("version").and_then(Value::as_u64) {
        let found = u32::try_from(version).unwrap_or(u32::MAX);
        if found > FORMAT_VERSION {
            return Err(StoreError::UnsupportedFormatVersion {
                found,
                supported: FORMAT_VERSION,
            });
        }
    }

    if value.is_array() {
        return Ok(serde_json::from_value::<Vec<Member>>(value)
            .unwrap_or_else(|err| unreadable(&format!("legacy array: {err}"))));
    }

    match serde_json::from_value::<Envelope>(value) {
        Ok(envelope) => Ok(envelope.records),
        Err(err) => Ok(unreadable(&format!("envelope: {err}"))),
    }
}

fn unreadable(reason: &str) -> Vec<Member> {
    warn!(
        "event=store_decode module=store status=degraded key={} reason={}",
        STORAGE_KEY, reason
    );
    Vec::new()
}
