//! Per-field registration predicates.
//!
//! # Invariants
//! - Values are trimmed before every rule.
//! - Validation never fails with an error; it answers valid or not.

use once_cell::sync::Lazy;
use regex::Regex;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub const MIN_PASSWORD_CHARS: usize = 6;

/// Registration form fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    FirstName,
    LastName,
    Phone,
    Email,
    Password,
    ConfirmPassword,
    Address,
}

impl FieldKind {
    pub const ALL: [FieldKind; 7] = [
        FieldKind::FirstName,
        FieldKind::LastName,
        FieldKind::Phone,
        FieldKind::Email,
        FieldKind::Password,
        FieldKind::ConfirmPassword,
        FieldKind::Address,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirm_password",
            Self::Address => "address",
        }
    }
}

/// Cross-field data needed by single-field rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationContext<'a> {
    /// Current password text; compared by `ConfirmPassword`.
    pub password: Option<&'a str>,
}

/// Pluggable field predicate set.
pub trait FieldValidator {
    fn validate(&self, kind: FieldKind, value: &str, context: &ValidationContext<'_>) -> bool;
}

/// Default registration rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationValidator;

impl FieldValidator for RegistrationValidator {
    fn validate(&self, kind: FieldKind, value: &str, context: &ValidationContext<'_>) -> bool {
        let value = value.trim();
        match kind {
            FieldKind::FirstName | FieldKind::LastName | FieldKind::Address => !value.is_empty(),
            FieldKind::Phone => PHONE_RE.is_match(value),
            FieldKind::Email => EMAIL_RE.is_match(value),
            FieldKind::Password => value.chars().count() >= MIN_PASSWORD_CHARS,
            FieldKind::ConfirmPassword => value == context.password.unwrap_or_default().trim(),
        }
    }
}

/// Raw registration form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub address: String,
    pub terms_accepted: bool,
}

impl RegistrationForm {
    pub fn value(&self, kind: FieldKind) -> &str {
        match kind {
            FieldKind::FirstName => &self.first_name,
            FieldKind::LastName => &self.last_name,
            FieldKind::Phone => &self.phone,
            FieldKind::Email => &self.email,
            FieldKind::Password => &self.password,
            FieldKind::ConfirmPassword => &self.confirm_password,
            FieldKind::Address => &self.address,
        }
    }
}

/// Outcome of a whole-form validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReport {
    /// Failing fields in form order.
    pub invalid: Vec<FieldKind>,
    pub terms_accepted: bool,
}

impl RegistrationReport {
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty() && self.terms_accepted
    }

    /// Field a UI should focus first.
    pub fn first_invalid(&self) -> Option<FieldKind> {
        self.invalid.first().copied()
    }

    pub fn is_field_valid(&self, kind: FieldKind) -> bool {
        !self.invalid.contains(&kind)
    }
}

/// Runs every field rule; one failing field does not skip the others.
pub fn validate_registration(
    validator: &impl FieldValidator,
    form: &RegistrationForm,
) -> RegistrationReport {
    let context = ValidationContext {
        password: Some(form.password.as_str()),
    };
    let invalid = FieldKind::ALL
        .into_iter()
        .filter(|kind| !validator.validate(*kind, form.value(*kind), &context))
        .collect();

    RegistrationReport {
        invalid,
        terms_accepted: form.terms_accepted,
    }
}
