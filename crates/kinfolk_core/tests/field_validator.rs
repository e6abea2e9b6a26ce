use kinfolk_core::{
    validate_registration, FieldKind, FieldValidator, RegistrationForm, RegistrationValidator,
    ValidationContext,
};

fn check(kind: FieldKind, value: &str) -> bool {
    RegistrationValidator.validate(kind, value, &ValidationContext::default())
}

fn valid_form() -> RegistrationForm {
    RegistrationForm {
        first_name: "Asha".to_string(),
        last_name: "Rao".to_string(),
        phone: "9876543210".to_string(),
        email: "asha@example.com".to_string(),
        password: "secret1".to_string(),
        confirm_password: "secret1".to_string(),
        address: "12 Lake Road".to_string(),
        terms_accepted: true,
    }
}

#[test]
fn required_fields_reject_blank_values() {
    for kind in [FieldKind::FirstName, FieldKind::LastName, FieldKind::Address] {
        assert!(check(kind, "x"), "{} should accept text", kind.as_str());
        assert!(!check(kind, "   "), "{} should reject blanks", kind.as_str());
    }
}

#[test]
fn phone_requires_exactly_ten_digits() {
    assert!(check(FieldKind::Phone, "9876543210"));
    assert!(check(FieldKind::Phone, " 9876543210 "));
    assert!(!check(FieldKind::Phone, "987654321"));
    assert!(!check(FieldKind::Phone, "98765432100"));
    assert!(!check(FieldKind::Phone, "98765-4321"));
    assert!(!check(FieldKind::Phone, "987654321٠"));
}

#[test]
fn email_requires_simple_local_domain_tld_shape() {
    assert!(check(FieldKind::Email, "a@b.co"));
    assert!(!check(FieldKind::Email, "a@b"));
    assert!(!check(FieldKind::Email, "a b@c.de"));
    assert!(!check(FieldKind::Email, "@b.co"));
    assert!(!check(FieldKind::Email, "a@@b.co"));
}

#[test]
fn password_needs_six_characters() {
    assert!(check(FieldKind::Password, "abcdef"));
    assert!(!check(FieldKind::Password, "abcde"));
    assert!(!check(FieldKind::Password, "  abc  "));
}

#[test]
fn confirm_password_compares_against_context() {
    let context = ValidationContext {
        password: Some(" secret1 "),
    };
    assert!(RegistrationValidator.validate(FieldKind::ConfirmPassword, "secret1", &context));
    assert!(!RegistrationValidator.validate(FieldKind::ConfirmPassword, "secret2", &context));
}

#[test]
fn valid_form_passes() {
    let report = validate_registration(&RegistrationValidator, &valid_form());
    assert!(report.is_valid());
    assert_eq!(report.first_invalid(), None);
}

#[test]
fn every_failing_field_is_reported_in_form_order() {
    let form = RegistrationForm {
        first_name: String::new(),
        phone: "123".to_string(),
        confirm_password: "different".to_string(),
        ..valid_form()
    };

    let report = validate_registration(&RegistrationValidator, &form);
    assert_eq!(
        report.invalid,
        vec![
            FieldKind::FirstName,
            FieldKind::Phone,
            FieldKind::ConfirmPassword
        ]
    );
    assert_eq!(report.first_invalid(), Some(FieldKind::FirstName));
    assert!(report.is_field_valid(FieldKind::Email));
    assert!(!report.is_valid());
}

#[test]
fn unaccepted_terms_fail_an_otherwise_valid_form() {
    let form = RegistrationForm {
        terms_accepted: false,
        ..valid_form()
    };
    let report = validate_registration(&RegistrationValidator, &form);
    assert!(report.invalid.is_empty());
    assert!(!report.is_valid());
}

#[test]
fn custom_validators_plug_in() {
    struct AcceptAll;
    impl FieldValidator for AcceptAll {
        fn validate(&self, _: FieldKind, _: &str, _: &ValidationContext<'_>) -> bool {
            true
        }
    }

    let report = validate_registration(&AcceptAll, &RegistrationForm {
        terms_accepted: true,
        ..RegistrationForm::default()
    });
    assert!(report.is_valid());
}
