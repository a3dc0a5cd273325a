//! End-to-end validation of the sample sign-up form.

mod common;

use common::{sample_schema, values};
use schemaform::{FieldType, FormError, FormValidator};
use serde_json::json;

fn submission() -> serde_json::Value {
    json!({
        "date": "2023-04-13",
        "email": "asdf@adsfasd",
        "firstName": "asdfasd",
        "lastName": "asdfas",
        "password": "1231231231asdfasd",
        "phone": "1231231231",
        "question1": "",
        "question2": ["option3", "option1"],
        "question3": "option2"
    })
}

#[test]
fn sample_submission_is_valid() {
    let schema = sample_schema();
    let validator = FormValidator::new(&schema).unwrap();

    let values = values(submission());
    assert!(validator.is_valid(&values));
    assert!(validator.validate(&values).is_ok());
}

#[test]
fn short_password_is_reported_verbatim() {
    let schema = sample_schema();
    let validator = FormValidator::new(&schema).unwrap();

    let mut submission = submission();
    submission["email"] = json!("asdfa@dsfasd");
    submission["password"] = json!("12312");
    let values = values(submission);

    assert!(!validator.is_valid(&values));
    let err = validator.validate(&values).unwrap_err();
    assert_eq!(err.to_string(), "Password must be at least 8 characters");
    assert!(matches!(err, FormError::InvalidValue { ref field, .. } if field == "password"));
}

#[test]
fn disjoint_keys_are_trivially_valid() {
    let schema = sample_schema();
    let validator = FormValidator::new(&schema).unwrap();

    let values = values(json!({ "nickname": "", "favouriteColour": 42 }));
    assert!(validator.rules(&values).is_empty());
    assert!(validator.is_valid(&values));
}

#[test]
fn choice_fields_never_get_rules() {
    let schema = sample_schema();
    let validator = FormValidator::new(&schema).unwrap();

    let values = values(submission());
    let rules = validator.rules(&values);
    for name in ["question1", "question2", "question3"] {
        assert!(rules.get(name).is_none(), "{name} should have no rules");
    }
    assert_eq!(
        schema.field("question1").map(|f| f.field_type),
        Some(FieldType::Radio)
    );
}

#[test]
fn initial_values_cover_every_field() {
    let schema = sample_schema();
    let validator = FormValidator::new(&schema).unwrap();
    let initial = validator.initial_values();

    assert_eq!(initial.len(), schema.fields().count());
    assert_eq!(initial["age"], json!("18"));
    assert_eq!(initial["question3"], json!("option1"));
    assert_eq!(initial["firstName"], json!(""));

    let errors = validator.errors(&initial);
    assert_eq!(errors.first("firstName"), Some("Please enter first name"));
    assert_eq!(errors.first("lastName"), Some("Minimum length is 3 characters"));
    assert_eq!(errors.first("email"), Some("Please enter email"));
    assert_eq!(errors.first("phone"), Some("Please enter a valid phone number"));
    assert_eq!(errors.first("date"), Some("Date must be a valid date"));
    assert_eq!(errors.first("acceptTerms"), Some("acceptTerms is required"));
    assert_eq!(errors.first("confirmPassword"), Some("Confirm Password is required"));
    assert!(errors.get("age").is_none());
    assert!(errors.get("question1").is_none());
}

#[test]
fn date_outside_range() {
    let schema = sample_schema();
    let validator = FormValidator::new(&schema).unwrap();

    let mut early = submission();
    early["date"] = json!("2022-12-31");
    assert_eq!(
        validator.validate(&values(early)).unwrap_err().to_string(),
        "Date must be after 2023-01-01"
    );

    let mut late = submission();
    late["date"] = json!("2024-01-01");
    assert_eq!(
        validator.validate(&values(late)).unwrap_err().to_string(),
        "Date must be before 2023-12-31"
    );
}

#[test]
fn confirmation_is_checked_against_password() {
    let schema = sample_schema();
    let validator = FormValidator::new(&schema).unwrap();

    let mut submission = submission();
    submission["confirmPassword"] = json!("1231231231asdfasX");
    let errors = validator.errors(&values(submission));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first("confirmPassword"), Some("Passwords must match"));
}
