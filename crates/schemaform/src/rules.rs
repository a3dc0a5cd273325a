//! Rule generation: compiling field specs into constraint chains.
//!
//! A [`RuleSet`] is derived from a schema and the key set of one
//! submission. Only keys present in the submission and known to the schema
//! get a [`RuleChain`]; everything else passes silently. Rule sets are
//! cheap to build and are rebuilt for every validation pass.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::{FormError, Result, ValidationErrors};
use crate::schema::{FieldSpec, FieldType, FormSchema};
use crate::validation::{
    AcceptedValidator, DateBoundValidator, DateValidator, EmailValidator, MatchesFieldValidator,
    MaxLengthValidator, MinLengthValidator, NumberCheck, NumberValidator,
    PasswordStrengthValidator, RegexValidator, RequiredValidator, TextValidator, Validator,
};
use crate::values::FormValues;

/// Name of the field a `confirmPassword` field is compared against.
pub const PASSWORD_FIELD: &str = "password";

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\+91|0)?[1-9][0-9]{9}$").expect("phone pattern is valid")
});

/// The ordered validators of one field. The first failure wins.
pub struct RuleChain {
    field: String,
    validators: Vec<Box<dyn Validator>>,
}

impl std::fmt::Debug for RuleChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleChain")
            .field("field", &self.field)
            .field("messages", &self.messages().collect::<Vec<_>>())
            .finish()
    }
}

impl RuleChain {
    /// Creates an empty chain for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            validators: Vec::new(),
        }
    }

    /// Appends a validator.
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Returns the field this chain validates.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the number of validators in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns whether the chain has no validators.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Returns whether any validator in the chain rejects absent values.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.validators.iter().any(|v| v.is_required())
    }

    /// Returns the messages of the chain's validators, in order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.validators.iter().map(|v| v.message())
    }

    /// Runs the chain against the field's value in `values`, returning the
    /// first failing message. A missing key is treated as `null`.
    ///
    /// # Errors
    ///
    /// Returns the message of the first validator that rejects the value.
    pub fn check(&self, values: &FormValues) -> std::result::Result<(), String> {
        let value = values.get(&self.field).unwrap_or(&Value::Null);
        self.validators
            .iter()
            .try_for_each(|v| v.validate(value, values))
    }
}

/// Per-field constraint chains derived for one validation pass.
#[derive(Debug, Default)]
pub struct RuleSet {
    chains: BTreeMap<String, RuleChain>,
}

impl RuleSet {
    /// Derives the rules for the keys of `values` from `schema`.
    ///
    /// Keys with no matching field, and fields whose type produces no
    /// rules, are skipped.
    #[must_use]
    pub fn generate(schema: &FormSchema, values: &FormValues) -> Self {
        let mut chains = BTreeMap::new();
        for key in values.keys() {
            let Some(field) = schema.field(key) else {
                debug!(field = %key, "no field in schema, skipping");
                continue;
            };
            match field_rules(field) {
                Some(chain) => {
                    debug!(field = %key, validators = chain.len(), "generated rule chain");
                    chains.insert(key.clone(), chain);
                }
                None => {
                    debug!(field = %key, field_type = %field.field_type, "no rules for field type");
                }
            }
        }
        Self { chains }
    }

    /// Returns the chain for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&RuleChain> {
        self.chains.get(field)
    }

    /// Returns the number of fields with a chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Returns whether no field has a chain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Returns the chains in field-name order.
    pub fn chains(&self) -> impl Iterator<Item = &RuleChain> {
        self.chains.values()
    }

    /// Returns whether every chain passes.
    #[must_use]
    pub fn is_valid(&self, values: &FormValues) -> bool {
        self.chains().all(|chain| chain.check(values).is_ok())
    }

    /// Validates `values`, stopping at the first failing constraint.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidValue`] carrying the failing field and
    /// the constraint's message.
    pub fn validate(&self, values: &FormValues) -> Result<()> {
        for chain in self.chains() {
            chain
                .check(values)
                .map_err(|message| FormError::InvalidValue {
                    field: chain.field().to_string(),
                    message,
                })?;
        }
        Ok(())
    }

    /// Returns the first failing message of every field.
    #[must_use]
    pub fn errors(&self, values: &FormValues) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for chain in self.chains() {
            if let Err(message) = chain.check(values) {
                errors.add(chain.field(), message);
            }
        }
        errors
    }
}

/// Derives the rules for the keys of `values` from `schema`.
#[must_use]
pub fn generate_rules(schema: &FormSchema, values: &FormValues) -> RuleSet {
    RuleSet::generate(schema, values)
}

/// Builds the chain for one field, or `None` for choice types.
///
/// Type-specific constraints come first; the required check, when the field
/// asks for one, comes last.
#[must_use]
pub fn field_rules(field: &FieldSpec) -> Option<RuleChain> {
    let chain = match field.field_type {
        FieldType::Text | FieldType::Textarea => length_rules(text_chain(field), field),
        FieldType::Email => text_chain(field).validator(EmailValidator::new()),
        FieldType::Password => text_chain(field)
            .validator(MinLengthValidator::with_message(
                PasswordStrengthValidator::MIN_LENGTH,
                "Password must be at least 8 characters",
            ))
            .validator(PasswordStrengthValidator::new(
                "Password must contain at least one letter and one number",
            )),
        FieldType::ConfirmPassword => text_chain(field)
            .validator(MatchesFieldValidator::new(PASSWORD_FIELD, "Passwords must match"))
            .validator(RequiredValidator::with_message("Confirm Password is required")),
        FieldType::Tel => text_chain(field).validator(RegexValidator::with_regex(
            PHONE_PATTERN.clone(),
            "Please enter a valid phone number",
        )),
        FieldType::Date => date_rules(field),
        FieldType::Boolean => RuleChain::new(&field.name)
            .validator(AcceptedValidator::new(format!("{} is required", field.name))),
        FieldType::Number => RuleChain::new(&field.name)
            .validator(NumberValidator::new(NumberCheck::Numeric, "Age must be a number"))
            .validator(NumberValidator::new(
                NumberCheck::Positive,
                "Age must be a positive number",
            ))
            .validator(NumberValidator::new(
                NumberCheck::Integer,
                "Age must be a whole number",
            )),
        FieldType::Checkbox | FieldType::Radio | FieldType::Select => return None,
    };

    if field.required && !chain.is_required() {
        let message = format!("Please enter {}", field.label.to_lowercase());
        return Some(chain.validator(RequiredValidator::with_message(message)));
    }
    Some(chain)
}

fn text_chain(field: &FieldSpec) -> RuleChain {
    RuleChain::new(&field.name)
        .validator(TextValidator::new(format!("{} must be a string", field.label)))
}

// maxlen wins over minlen; zero counts as unset.
fn length_rules(chain: RuleChain, field: &FieldSpec) -> RuleChain {
    match (
        field.maxlen.filter(|&n| n > 0),
        field.minlen.filter(|&n| n > 0),
    ) {
        (Some(max), _) => chain.validator(MaxLengthValidator::new(max)),
        (None, Some(min)) => chain.validator(MinLengthValidator::new(min)),
        (None, None) => chain,
    }
}

fn date_rules(field: &FieldSpec) -> RuleChain {
    let mut chain = RuleChain::new(&field.name)
        .validator(DateValidator::new(format!("{} must be a valid date", field.label)));
    if let Some(min) = field.min_date {
        chain = chain.validator(DateBoundValidator::not_before(min));
    }
    if let Some(max) = field.max_date {
        chain = chain.validator(DateBoundValidator::not_after(max));
    }
    chain
}
