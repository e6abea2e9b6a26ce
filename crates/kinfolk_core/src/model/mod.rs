//! Domain model for household member records.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the persisted record shape and the form candidate shape apart.
//!
//! # Invariants
//! - Every member is identified by a stable `MemberId`.
//! - Deletion is a hard removal; there are no tombstones.

pub mod member;
