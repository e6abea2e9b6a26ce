//! Registration form field validation.
//!
//! # Responsibility
//! - Provide stateless per-field predicates for the registration form.
//! - Aggregate a whole-form report without stopping at the first failure.
//!
//! This concern is independent of member records and holds no state.

pub mod field;
