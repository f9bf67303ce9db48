//! Field schemas: type, requiredness, default and value processing
//!
//! A [`FieldSchema`] is the contract a prompt validates against. Schemas are
//! usually loaded from a TOML file through [`converter::ConverterRegistry`].

pub mod converter;

pub use converter::{load_schema_file, parse_schema, ConverterRegistry, SchemaConverter};

use crate::error::ValidationError;

/// Boolean spellings accepted on input, normalized to `true`/`false`.
const TRUE_WORDS: &[&str] = &["true", "yes", "y", "on", "1"];
const FALSE_WORDS: &[&str] = &["false", "no", "n", "off", "0"];

/// Value type of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Enum(Vec<String>),
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Enum(_) => "enum",
        }
    }

    /// Type-specific cleanup applied before validation.
    pub fn preprocess(&self, raw: &str) -> String {
        match self {
            FieldType::String => raw.to_string(),
            FieldType::Number | FieldType::Enum(_) => raw.trim().to_string(),
            FieldType::Boolean => raw.trim().to_lowercase(),
        }
    }

    /// Options offered as fixed choices.
    pub fn options(&self) -> &[String] {
        match self {
            FieldType::Enum(options) => options,
            _ => &[],
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Enum(options) => write!(f, "enum({})", options.join("|")),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// A processed field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// One environment variable's contract.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub key: String,
    pub field_type: FieldType,
    pub required: bool,
    pub default: Option<String>,
    pub description: Option<String>,
    pub secret: bool,
}

impl FieldSchema {
    pub fn new(key: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            field_type,
            required: true,
            default: None,
            description: None,
            secret: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Validate and coerce a raw candidate.
    ///
    /// Empty input falls back to the default, then to an empty string for
    /// optional fields; a required field without a default rejects it.
    pub fn process(&self, raw: &str) -> Result<FieldValue, ValidationError> {
        let candidate = self.field_type.preprocess(raw);

        if candidate.is_empty() {
            if let Some(default) = &self.default {
                return self.coerce(&self.field_type.preprocess(default));
            }
            if self.required {
                return Err(ValidationError::new(format!("{} is required", self.key)));
            }
            return Ok(FieldValue::String(String::new()));
        }

        self.coerce(&candidate)
    }

    fn coerce(&self, candidate: &str) -> Result<FieldValue, ValidationError> {
        match &self.field_type {
            FieldType::String => Ok(FieldValue::String(candidate.to_string())),
            FieldType::Number => match candidate.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(FieldValue::Number(n)),
                _ => Err(ValidationError::new(format!(
                    "{} must be a number, got '{}'",
                    self.key, candidate
                ))),
            },
            FieldType::Boolean => {
                if TRUE_WORDS.contains(&candidate) {
                    Ok(FieldValue::Boolean(true))
                } else if FALSE_WORDS.contains(&candidate) {
                    Ok(FieldValue::Boolean(false))
                } else {
                    Err(ValidationError::new(format!(
                        "{} must be true or false, got '{}'",
                        self.key, candidate
                    )))
                }
            }
            FieldType::Enum(options) => {
                if options.iter().any(|o| o == candidate) {
                    Ok(FieldValue::String(candidate.to_string()))
                } else {
                    Err(ValidationError::new(format!(
                        "{} must be one of: {}",
                        self.key,
                        options.join(", ")
                    )))
                }
            }
        }
    }
}
