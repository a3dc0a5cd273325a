//! # schemaform
//!
//! Schema-driven form validation.
//!
//! This crate provides:
//! - A declarative form schema (sections of typed fields) loaded from JSON
//! - A rule generator compiling each field into a constraint chain
//! - Field validators, including the cross-field password confirmation
//! - Per-field error collection and form initial values
//!
//! ## Quick Start
//!
//! ```rust
//! use schemaform::{FormSchema, FormValidator};
//! use serde_json::json;
//!
//! let schema = FormSchema::from_json_str(r#"{
//!     "sections": [{
//!         "name": "account",
//!         "label": "Account",
//!         "formFields": [
//!             { "name": "email", "label": "Email", "type": "email", "required": true },
//!             { "name": "password", "label": "Password", "type": "password", "required": true }
//!         ]
//!     }]
//! }"#).unwrap();
//!
//! let validator = FormValidator::new(&schema).unwrap();
//!
//! let values = json!({ "email": "ada@example.com", "password": "short" });
//! let values = values.as_object().unwrap();
//!
//! assert!(!validator.is_valid(values));
//! let err = validator.validate(values).unwrap_err();
//! assert_eq!(err.to_string(), "Password must be at least 8 characters");
//! ```
//!
//! ## Building Schemas In Code
//!
//! ```rust
//! use schemaform::{FieldSpec, FieldType, FormSchema, SectionSpec};
//!
//! let schema = FormSchema::new().section(
//!     SectionSpec::new("profile", "Profile")
//!         .field(FieldSpec::new("firstName", "First Name", FieldType::Text).maxlen(20).required())
//!         .field(FieldSpec::new("phone", "Phone", FieldType::Tel)),
//! );
//! assert!(schema.check().is_ok());
//! assert_eq!(schema.initial_values().len(), 2);
//! ```
//!
//! ## Rule Chains
//!
//! Rules are derived per submission: only keys present in the submitted
//! values and known to the schema are checked.
//!
//! ```rust
//! use schemaform::{generate_rules, FieldSpec, FieldType, FormSchema, SectionSpec};
//! use serde_json::json;
//!
//! let schema = FormSchema::new().section(
//!     SectionSpec::new("s", "S").field(FieldSpec::new("age", "Age", FieldType::Number)),
//! );
//! let values = json!({ "age": 2.5, "unknown": "ignored" });
//! let values = values.as_object().unwrap();
//!
//! let rules = generate_rules(&schema, values);
//! assert_eq!(rules.len(), 1);
//! assert_eq!(rules.errors(values).first("age"), Some("Age must be a whole number"));
//! ```

mod error;
mod form;
pub mod rules;
pub mod schema;
pub mod validation;
pub mod values;

pub use error::{FormError, Result, ValidationErrors};
pub use form::FormValidator;
pub use rules::{generate_rules, RuleChain, RuleSet};
pub use schema::{FieldOption, FieldSpec, FieldType, FormSchema, InitialValue, SectionSpec};
pub use values::FormValues;
