//! Repository layer over the member collection.
//!
//! # Responsibility
//! - Own the live member collection and its invariants.
//! - Isolate persistence (`Store`) from service/controller orchestration.
//!
//! # Invariants
//! - Writes validate the candidate before mutating anything.
//! - Memory and durable state never diverge after a failed write.

pub mod member_repo;
