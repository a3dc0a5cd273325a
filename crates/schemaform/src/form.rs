//! Schema-bound form validation.

use crate::error::{Result, ValidationErrors};
use crate::rules::RuleSet;
use crate::schema::FormSchema;
use crate::values::FormValues;

/// Validates submissions against one explicit schema.
///
/// Rules are regenerated on every call from the keys of the submission, so
/// a single validator serves every keystroke of a form's lifetime.
#[derive(Debug, Clone, Copy)]
pub struct FormValidator<'a> {
    schema: &'a FormSchema,
}

impl<'a> FormValidator<'a> {
    /// Creates a validator for `schema` after checking its field names.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::DuplicateField`](crate::FormError::DuplicateField)
    /// when two fields share a name.
    pub fn new(schema: &'a FormSchema) -> Result<Self> {
        schema.check()?;
        Ok(Self { schema })
    }

    /// Returns the schema this validator checks against.
    #[must_use]
    pub const fn schema(&self) -> &'a FormSchema {
        self.schema
    }

    /// Derives the rule set for `values`.
    #[must_use]
    pub fn rules(&self, values: &FormValues) -> RuleSet {
        RuleSet::generate(self.schema, values)
    }

    /// Returns whether every submitted field passes its rules.
    #[must_use]
    pub fn is_valid(&self, values: &FormValues) -> bool {
        self.rules(values).is_valid(values)
    }

    /// Validates `values`, failing on the first broken constraint.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidValue`](crate::FormError::InvalidValue)
    /// whose message is the failing constraint's message.
    pub fn validate(&self, values: &FormValues) -> Result<()> {
        self.rules(values).validate(values)
    }

    /// Returns the first error message of every failing field.
    #[must_use]
    pub fn errors(&self, values: &FormValues) -> ValidationErrors {
        self.rules(values).errors(values)
    }

    /// Returns the values a fresh form starts with.
    #[must_use]
    pub fn initial_values(&self) -> FormValues {
        self.schema.initial_values()
    }
}
