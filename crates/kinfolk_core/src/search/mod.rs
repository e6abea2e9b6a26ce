//! Search and filter entry points over the member collection.
//!
//! # Responsibility
//! - Compute the visible subset for a query without touching storage.

pub mod filter;
