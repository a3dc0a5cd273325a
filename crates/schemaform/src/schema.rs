//! Declarative form schema: sections of typed field specifications.
//!
//! A [`FormSchema`] is loaded once (from JSON or built in code) and is
//! immutable afterwards. Field names must be unique across all sections;
//! [`FormSchema::check`] enforces this and every loading path calls it.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{FormError, Result};
use crate::values::FormValues;

/// The closed set of field types a schema may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Text,
    Textarea,
    Tel,
    Email,
    Password,
    ConfirmPassword,
    Date,
    Boolean,
    Number,
    Checkbox,
    Radio,
    Select,
}

impl FieldType {
    /// Returns the schema spelling of this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Tel => "tel",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Select => "select",
        }
    }

    /// Returns whether the rule generator produces a constraint chain for
    /// this type.
    ///
    /// Choice types (`checkbox`, `radio`, `select`) never get one, so their
    /// `required` flag is not enforced.
    #[must_use]
    pub const fn generates_rules(self) -> bool {
        !matches!(self, Self::Checkbox | Self::Radio | Self::Select)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable option of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: String,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Seed value of a field, coerced to text when the form is initialised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InitialValue {
    Flag(bool),
    Number(serde_json::Number),
    Text(String),
}

impl InitialValue {
    /// Returns whether the value counts as set: `false`, `0` and the empty
    /// string do not.
    #[must_use]
    pub fn is_set(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Self::Text(text) => !text.is_empty(),
        }
    }
}

impl fmt::Display for InitialValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "{flag}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Definition of a single form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Field name, unique within the schema.
    pub name: String,
    /// Human-readable label.
    pub label: String,
    /// Field type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Placeholder text for the rendered widget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Whether an empty value fails validation.
    #[serde(default)]
    pub required: bool,
    /// Minimum text length, ignored when `maxlen` is also set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minlen: Option<usize>,
    /// Maximum text length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxlen: Option<usize>,
    /// Earliest accepted date (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_date: Option<NaiveDate>,
    /// Latest accepted date (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_date: Option<NaiveDate>,
    /// Choices for `checkbox`, `radio` and `select` fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    /// Seed value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<InitialValue>,
}

impl FieldSpec {
    /// Creates a new, optional field with no constraints.
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            placeholder: None,
            required: false,
            minlen: None,
            maxlen: None,
            min_date: None,
            max_date: None,
            options: Vec::new(),
            initial_value: None,
        }
    }

    /// Makes the field required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets placeholder text.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    /// Sets the minimum text length.
    #[must_use]
    pub fn minlen(mut self, len: usize) -> Self {
        self.minlen = Some(len);
        self
    }

    /// Sets the maximum text length.
    #[must_use]
    pub fn maxlen(mut self, len: usize) -> Self {
        self.maxlen = Some(len);
        self
    }

    /// Sets the earliest accepted date.
    #[must_use]
    pub fn min_date(mut self, date: NaiveDate) -> Self {
        self.min_date = Some(date);
        self
    }

    /// Sets the latest accepted date.
    #[must_use]
    pub fn max_date(mut self, date: NaiveDate) -> Self {
        self.max_date = Some(date);
        self
    }

    /// Adds a choice.
    #[must_use]
    pub fn option(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(FieldOption::new(label, value));
        self
    }

    /// Sets the seed value.
    #[must_use]
    pub fn initial(mut self, value: InitialValue) -> Self {
        self.initial_value = Some(value);
        self
    }

    /// Returns the textual value this field starts with.
    #[must_use]
    pub fn initial_text(&self) -> String {
        self.initial_value
            .as_ref()
            .filter(|v| v.is_set())
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}

/// A named group of fields. Sections only affect display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "formFields", alias = "fields")]
    pub fields: Vec<FieldSpec>,
}

impl SectionSpec {
    /// Creates an empty section.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field to the section.
    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }
}

/// An ordered collection of sections describing one form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    pub sections: Vec<SectionSpec>,
}

impl FormSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a section.
    #[must_use]
    pub fn section(mut self, section: SectionSpec) -> Self {
        self.sections.push(section);
        self
    }

    /// Parses and checks a schema from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::ParseError`] for malformed JSON, unknown field
    /// types or invalid dates, and [`FormError::DuplicateField`] when two
    /// fields share a name.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let schema: Self = serde_json::from_str(json)?;
        schema.check()?;
        Ok(schema)
    }

    /// Converts and checks a schema from an already parsed JSON value.
    ///
    /// # Errors
    ///
    /// Same as [`FormSchema::from_json_str`].
    pub fn from_value(value: Value) -> Result<Self> {
        let schema: Self = serde_json::from_value(value)?;
        schema.check()?;
        Ok(schema)
    }

    /// Reads, parses and checks a schema file.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`FormSchema::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| FormError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks that field names are unique across sections and logs
    /// suspicious field definitions.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::DuplicateField`] on the first repeated name.
    pub fn check(&self) -> Result<()> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for section in &self.sections {
            for field in &section.fields {
                if let Some(first) = seen.insert(&field.name, &section.name) {
                    return Err(FormError::DuplicateField {
                        name: field.name.clone(),
                        first_section: first.to_string(),
                        second_section: section.name.clone(),
                    });
                }
            }
        }

        self.log_diagnostics();
        Ok(())
    }

    fn log_diagnostics(&self) {
        let has_password = self.field(crate::rules::PASSWORD_FIELD).is_some();

        for field in self.fields() {
            if field.field_type == FieldType::ConfirmPassword && !has_password {
                warn!(
                    field = %field.name,
                    "confirmPassword field without a `password` field"
                );
            }
            if let (Some(min), Some(max)) = (field.min_date, field.max_date) {
                if min > max {
                    warn!(field = %field.name, %min, %max, "minDate is after maxDate");
                }
            }
            if field.minlen.is_some() && field.maxlen.is_some() {
                warn!(field = %field.name, "both minlen and maxlen set, minlen is ignored");
            }
            if field.required && !field.field_type.generates_rules() {
                warn!(
                    field = %field.name,
                    field_type = %field.field_type,
                    "required is not enforced for this field type"
                );
            }
        }
    }

    /// Returns all fields across sections, in order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    /// Finds a field by name across all sections.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields().find(|f| f.name == name)
    }

    /// Returns the values a fresh form starts with: every field mapped to
    /// its initial text, or `""`.
    #[must_use]
    pub fn initial_values(&self) -> FormValues {
        self.fields()
            .map(|f| (f.name.clone(), Value::String(f.initial_text())))
            .collect()
    }
}
