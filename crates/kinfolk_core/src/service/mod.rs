//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into user-facing commands.
//! - Keep UI adapters (CLI, tests, future GUIs) decoupled from storage.

pub mod form_controller;
