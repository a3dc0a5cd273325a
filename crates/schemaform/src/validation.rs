//! Field validators.
//!
//! Each validator is one predicate with one message. Validators receive the
//! field's own value plus the whole submission, so cross-field checks such
//! as [`MatchesFieldValidator`] fit the same trait.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

use crate::values::{as_date, as_flag, as_number, as_text, is_absent, FormValues};

/// Trait for field validators.
pub trait Validator: Send + Sync {
    /// Validates a value and returns an error message if invalid.
    ///
    /// `values` is the full submission the value was taken from.
    fn validate(&self, value: &Value, values: &FormValues) -> Result<(), String>;

    /// Returns the error message for this validator.
    fn message(&self) -> &str;

    /// Returns whether this validator rejects absent values.
    fn is_required(&self) -> bool {
        false
    }
}

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

fn check(ok: bool, message: &str) -> Result<(), String> {
    if ok {
        Ok(())
    } else {
        Err(message.to_string())
    }
}

/// Validator that requires a present, non-empty value.
#[derive(Debug, Clone)]
pub struct RequiredValidator {
    message: String,
}

impl RequiredValidator {
    /// Creates a new RequiredValidator with custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Validator for RequiredValidator {
    fn validate(&self, value: &Value, _values: &FormValues) -> Result<(), String> {
        let present = match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            _ => true,
        };
        check(present, &self.message)
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn is_required(&self) -> bool {
        true
    }
}

/// Validator that accepts only values with a text form.
#[derive(Debug, Clone)]
pub struct TextValidator {
    message: String,
}

impl TextValidator {
    /// Creates a new TextValidator.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Validator for TextValidator {
    fn validate(&self, value: &Value, _values: &FormValues) -> Result<(), String> {
        check(is_absent(value) || as_text(value).is_some(), &self.message)
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator that enforces a maximum length in characters.
#[derive(Debug, Clone)]
pub struct MaxLengthValidator {
    max_length: usize,
    message: String,
}

impl MaxLengthValidator {
    /// Creates a new MaxLengthValidator.
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            message: format!("Maximum length is {max_length} characters"),
        }
    }
}

impl Validator for MaxLengthValidator {
    fn validate(&self, value: &Value, _values: &FormValues) -> Result<(), String> {
        match as_text(value) {
            Some(text) => check(text.chars().count() <= self.max_length, &self.message),
            None => Ok(()),
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator that enforces a minimum length in characters.
///
/// The empty string is checked like any other text.
#[derive(Debug, Clone)]
pub struct MinLengthValidator {
    min_length: usize,
    message: String,
}

impl MinLengthValidator {
    /// Creates a new MinLengthValidator.
    pub fn new(min_length: usize) -> Self {
        Self {
            min_length,
            message: format!("Minimum length is {min_length} characters"),
        }
    }

    /// Creates a new MinLengthValidator with custom message.
    pub fn with_message(min_length: usize, message: impl Into<String>) -> Self {
        Self {
            min_length,
            message: message.into(),
        }
    }
}

impl Validator for MinLengthValidator {
    fn validate(&self, value: &Value, _values: &FormValues) -> Result<(), String> {
        match as_text(value) {
            Some(text) => check(text.chars().count() >= self.min_length, &self.message),
            None => Ok(()),
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator for email addresses. Empty strings are left to
/// [`RequiredValidator`].
#[derive(Debug, Clone)]
pub struct EmailValidator {
    message: String,
}

impl EmailValidator {
    /// Creates a new EmailValidator with default message.
    pub fn new() -> Self {
        Self {
            message: "A valid email is required".to_string(),
        }
    }
}

impl Default for EmailValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for EmailValidator {
    fn validate(&self, value: &Value, _values: &FormValues) -> Result<(), String> {
        match as_text(value) {
            Some(text) if !text.is_empty() => {
                check(EMAIL_PATTERN.is_match(&text), &self.message)
            }
            _ => Ok(()),
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator using a custom regex pattern. The empty string must match the
/// pattern too.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    pattern: Regex,
    message: String,
}

impl RegexValidator {
    /// Creates a RegexValidator from an already compiled pattern.
    pub fn with_regex(pattern: Regex, message: impl Into<String>) -> Self {
        Self {
            pattern,
            message: message.into(),
        }
    }
}

impl Validator for RegexValidator {
    fn validate(&self, value: &Value, _values: &FormValues) -> Result<(), String> {
        match as_text(value) {
            Some(text) => check(self.pattern.is_match(&text), &self.message),
            None => Ok(()),
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator for password strength: ASCII letters and digits only, at
/// least one of each, at least eight characters.
#[derive(Debug, Clone)]
pub struct PasswordStrengthValidator {
    message: String,
}

impl PasswordStrengthValidator {
    pub const MIN_LENGTH: usize = 8;

    /// Creates a new PasswordStrengthValidator.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn is_strong(password: &str) -> bool {
        password.len() >= Self::MIN_LENGTH
            && password.chars().all(|c| c.is_ascii_alphanumeric())
            && password.chars().any(|c| c.is_ascii_alphabetic())
            && password.chars().any(|c| c.is_ascii_digit())
    }
}

impl Validator for PasswordStrengthValidator {
    fn validate(&self, value: &Value, _values: &FormValues) -> Result<(), String> {
        match as_text(value) {
            Some(text) => check(Self::is_strong(&text), &self.message),
            None => Ok(()),
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator that requires the value to equal another field's value.
#[derive(Debug, Clone)]
pub struct MatchesFieldValidator {
    other: String,
    message: String,
}

impl MatchesFieldValidator {
    /// Creates a validator comparing against the field named `other`.
    pub fn new(other: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            other: other.into(),
            message: message.into(),
        }
    }
}

impl Validator for MatchesFieldValidator {
    fn validate(&self, value: &Value, values: &FormValues) -> Result<(), String> {
        if is_absent(value) {
            return Ok(());
        }
        let other = values.get(&self.other).and_then(as_text);
        check(as_text(value) == other, &self.message)
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator that accepts only values parseable as a calendar date.
#[derive(Debug, Clone)]
pub struct DateValidator {
    message: String,
}

impl DateValidator {
    /// Creates a new DateValidator.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Validator for DateValidator {
    fn validate(&self, value: &Value, _values: &FormValues) -> Result<(), String> {
        check(is_absent(value) || as_date(value).is_some(), &self.message)
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Which side of a date range a [`DateBoundValidator`] enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    /// The date must be on or after this day.
    NotBefore(NaiveDate),
    /// The date must be on or before this day.
    NotAfter(NaiveDate),
}

/// Validator for one inclusive date bound.
#[derive(Debug, Clone)]
pub struct DateBoundValidator {
    bound: DateBound,
    message: String,
}

impl DateBoundValidator {
    /// Creates a validator rejecting dates earlier than `min`.
    pub fn not_before(min: NaiveDate) -> Self {
        Self {
            bound: DateBound::NotBefore(min),
            message: format!("Date must be after {min}"),
        }
    }

    /// Creates a validator rejecting dates later than `max`.
    pub fn not_after(max: NaiveDate) -> Self {
        Self {
            bound: DateBound::NotAfter(max),
            message: format!("Date must be before {max}"),
        }
    }
}

impl Validator for DateBoundValidator {
    fn validate(&self, value: &Value, _values: &FormValues) -> Result<(), String> {
        let Some(date) = as_date(value) else {
            return Ok(());
        };
        let ok = match self.bound {
            DateBound::NotBefore(min) => date >= min,
            DateBound::NotAfter(max) => date <= max,
        };
        check(ok, &self.message)
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// The numeric properties a [`NumberValidator`] can enforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberCheck {
    /// The value coerces to a finite number.
    Numeric,
    /// The number is greater than zero.
    Positive,
    /// The number has no fractional part.
    Integer,
}

/// Validator for numeric values.
#[derive(Debug, Clone)]
pub struct NumberValidator {
    check: NumberCheck,
    message: String,
}

impl NumberValidator {
    /// Creates a new NumberValidator.
    pub fn new(check: NumberCheck, message: impl Into<String>) -> Self {
        Self {
            check,
            message: message.into(),
        }
    }
}

impl Validator for NumberValidator {
    fn validate(&self, value: &Value, _values: &FormValues) -> Result<(), String> {
        if is_absent(value) {
            return Ok(());
        }
        let number = as_number(value);
        let ok = match (self.check, number) {
            (NumberCheck::Numeric, n) => n.is_some(),
            (_, None) => true,
            (NumberCheck::Positive, Some(n)) => n > 0.0,
            (NumberCheck::Integer, Some(n)) => n.fract() == 0.0,
        };
        check(ok, &self.message)
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator that requires a boolean `true`.
#[derive(Debug, Clone)]
pub struct AcceptedValidator {
    message: String,
}

impl AcceptedValidator {
    /// Creates a new AcceptedValidator.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Validator for AcceptedValidator {
    fn validate(&self, value: &Value, _values: &FormValues) -> Result<(), String> {
        check(is_absent(value) || as_flag(value) == Some(true), &self.message)
    }

    fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(v: &dyn Validator, value: Value) -> Result<(), String> {
        v.validate(&value, &FormValues::new())
    }

    #[test]
    fn test_required_validator() {
        let v = RequiredValidator::with_message("Please enter name");
        assert!(run(&v, json!("hello")).is_ok());
        assert!(run(&v, json!(" ")).is_ok());
        assert!(run(&v, json!(0)).is_ok());
        assert_eq!(run(&v, json!("")), Err("Please enter name".to_string()));
        assert!(run(&v, Value::Null).is_err());
        assert!(run(&v, json!([])).is_err());
        assert!(v.is_required());
    }

    #[test]
    fn test_text_validator() {
        let v = TextValidator::new("Name must be a string");
        assert!(run(&v, json!("x")).is_ok());
        assert!(run(&v, json!(12)).is_ok());
        assert!(run(&v, Value::Null).is_ok());
        assert!(run(&v, json!(["a", "b"])).is_err());
        assert!(run(&v, json!({"a": 1})).is_err());
    }

    #[test]
    fn test_max_length_validator() {
        let v = MaxLengthValidator::new(5);
        assert!(run(&v, json!("hello")).is_ok());
        assert!(run(&v, json!("")).is_ok());
        assert_eq!(
            run(&v, json!("hello world")),
            Err("Maximum length is 5 characters".to_string())
        );
    }

    #[test]
    fn test_min_length_validator() {
        let v = MinLengthValidator::new(3);
        assert!(run(&v, json!("abc")).is_ok());
        assert!(run(&v, Value::Null).is_ok());
        assert_eq!(
            run(&v, json!("")),
            Err("Minimum length is 3 characters".to_string())
        );
    }

    #[test]
    fn test_length_counts_chars() {
        // Three chars, six UTF-16 units.
        let emoji = json!("\u{1F600}\u{1F601}\u{1F602}");
        assert!(run(&MaxLengthValidator::new(3), emoji.clone()).is_ok());
        assert!(run(&MinLengthValidator::new(3), emoji.clone()).is_ok());
        assert!(run(&MinLengthValidator::new(4), emoji).is_err());
    }

    #[test]
    fn test_email_validator() {
        let v = EmailValidator::new();
        assert!(run(&v, json!("user@example.com")).is_ok());
        assert!(run(&v, json!("asdf@adsfasd")).is_ok());
        assert!(run(&v, json!("")).is_ok());
        assert!(run(&v, json!("invalid")).is_err());
        assert!(run(&v, json!("@example.com")).is_err());
        assert!(run(&v, json!("user@-example.com")).is_err());
    }

    #[test]
    fn test_regex_validator() {
        let v = RegexValidator::with_regex(Regex::new(r"^\d{4}$").unwrap(), "Enter four digits");
        assert!(run(&v, json!("2024")).is_ok());
        assert!(run(&v, json!(2024)).is_ok());
        assert!(run(&v, json!("")).is_err());
        assert!(run(&v, Value::Null).is_ok());
    }

    #[test]
    fn test_password_strength_validator() {
        let v = PasswordStrengthValidator::new("weak");
        assert!(run(&v, json!("abcd1234")).is_ok());
        assert!(run(&v, json!("abcdefgh")).is_err());
        assert!(run(&v, json!("12345678")).is_err());
        assert!(run(&v, json!("abcd 1234")).is_err());
        assert!(run(&v, json!("abc123")).is_err());
        assert!(run(&v, json!("")).is_err());
    }

    #[test]
    fn test_matches_field_validator() {
        let v = MatchesFieldValidator::new("password", "Passwords must match");
        let mut values = FormValues::new();
        values.insert("password".to_string(), json!("abcd1234"));

        assert!(v.validate(&json!("abcd1234"), &values).is_ok());
        assert_eq!(
            v.validate(&json!("abcd12345"), &values),
            Err("Passwords must match".to_string())
        );
        assert!(v.validate(&Value::Null, &values).is_ok());
        assert!(v.validate(&json!("x"), &FormValues::new()).is_err());
    }

    #[test]
    fn test_date_bound_validator() {
        let min = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let v = DateBoundValidator::not_before(min);
        assert!(run(&v, json!("2023-01-01")).is_ok());
        assert_eq!(
            run(&v, json!("2022-12-31")),
            Err("Date must be after 2023-01-01".to_string())
        );

        let max = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let v = DateBoundValidator::not_after(max);
        assert!(run(&v, json!("2023-12-31")).is_ok());
        assert!(run(&v, json!("2024-01-01")).is_err());
    }

    #[test]
    fn test_number_validator() {
        let numeric = NumberValidator::new(NumberCheck::Numeric, "nan");
        let positive = NumberValidator::new(NumberCheck::Positive, "neg");
        let integer = NumberValidator::new(NumberCheck::Integer, "frac");

        assert!(run(&numeric, json!("abc")).is_err());
        assert!(run(&numeric, json!("")).is_err());
        assert!(run(&numeric, json!("12")).is_ok());
        assert!(run(&positive, json!(-5)).is_err());
        assert!(run(&positive, json!(0)).is_err());
        assert!(run(&positive, json!("abc")).is_ok());
        assert!(run(&integer, json!(2.5)).is_err());
        assert!(run(&integer, json!("5")).is_ok());
    }

    #[test]
    fn test_accepted_validator() {
        let v = AcceptedValidator::new("terms is required");
        assert!(run(&v, json!(true)).is_ok());
        assert!(run(&v, json!("true")).is_ok());
        assert!(run(&v, Value::Null).is_ok());
        assert!(run(&v, json!(false)).is_err());
        assert!(run(&v, json!("")).is_err());
    }
}
