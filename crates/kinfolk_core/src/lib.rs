//! Core domain logic for kinfolk, a household member register.
//! This crate is the single source of truth for record invariants.

pub mod age;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;
pub mod validation;

pub use age::{age_on, Clock, FixedClock, SystemClock};
pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::member::{
    Gender, Member, MemberDraft, MemberId, MemberValidationError, Relation,
};
pub use repo::member_repo::{MemberRepository, RepoError, RepoResult};
pub use search::filter::{visible, MemberQuery};
pub use service::form_controller::{
    ControllerError, FormController, FormField, FormMode, MemberForm, Notice, NoticeKind,
    NullSink, RenderSink,
};
pub use store::{MemoryStore, SqliteStore, Store, StoreError, StoreResult};
pub use validation::field::{
    validate_registration, FieldKind, FieldValidator, RegistrationForm, RegistrationReport,
    RegistrationValidator, ValidationContext,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
