//! # Schema Converters
//!
//! A schema file lists fields under `[fields]`, in prompt order:
//!
//! ```toml
//! [fields]
//! DATABASE_URL = { type = "string", description = "Postgres URL", secret = true }
//! LOG_LEVEL = ["debug", "info", "warn"]
//! DEBUG = "boolean?"
//! PORT = 8080
//! ```
//!
//! Each definition goes to the first converter in the registry that
//! recognizes its shape:
//!
//! | Converter | Shape | Result |
//! |-----------|-------|--------|
//! | [`TableConverter`] | table with `type`/`options`/... | as described |
//! | [`ShorthandConverter`] | `"number"`, `"enum:a\|b"`, `?` optional, `!` secret | as described |
//! | [`ChoicesConverter`] | array of strings | required enum |
//! | [`LiteralConverter`] | integer, float, bool | optional, literal is the default |

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use toml::Value;

use super::{FieldSchema, FieldType};
use crate::error::SchemaError;
use crate::store::validate_key;

lazy_static! {
    /// `string`, `number`, `boolean` or `enum:a|b|c`, then `?`/`!` flags in any order
    static ref SHORTHAND_RE: Regex =
        Regex::new(r"^(string|number|boolean|enum:[^?!]+)([?!]*)$").unwrap();
}

/// Turns one field definition into a [`FieldSchema`].
pub trait SchemaConverter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this converter handles the definition's shape.
    fn recognizes(&self, definition: &Value) -> bool;

    fn convert(&self, key: &str, definition: &Value) -> Result<FieldSchema, SchemaError>;
}

/// Converters tried in priority order.
pub struct ConverterRegistry {
    converters: Vec<Box<dyn SchemaConverter>>,
}

impl ConverterRegistry {
    pub fn empty() -> Self {
        Self {
            converters: Vec::new(),
        }
    }

    /// Registry with the built-in converters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(TableConverter));
        registry.register(Box::new(ShorthandConverter));
        registry.register(Box::new(ChoicesConverter));
        registry.register(Box::new(LiteralConverter));
        registry
    }

    /// Append a converter at the lowest priority.
    pub fn register(&mut self, converter: Box<dyn SchemaConverter>) {
        self.converters.push(converter);
    }

    pub fn convert(&self, key: &str, definition: &Value) -> Result<FieldSchema, SchemaError> {
        validate_key(key)?;
        let converter = self
            .converters
            .iter()
            .find(|c| c.recognizes(definition))
            .ok_or_else(|| SchemaError::Unrecognized {
                key: key.to_string(),
            })?;
        tracing::trace!(key, converter = converter.name(), "converting field");
        converter.convert(key, definition)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Parse schema TOML with the default registry.
pub fn parse_schema(content: &str) -> Result<Vec<FieldSchema>, SchemaError> {
    parse_schema_with(content, &ConverterRegistry::with_defaults())
}

/// Parse schema TOML with a custom registry.
pub fn parse_schema_with(
    content: &str,
    registry: &ConverterRegistry,
) -> Result<Vec<FieldSchema>, SchemaError> {
    let document: toml::Table = content.parse()?;
    let fields = document
        .get("fields")
        .and_then(Value::as_table)
        .ok_or(SchemaError::MissingFields)?;

    fields
        .iter()
        .map(|(key, definition)| registry.convert(key, definition))
        .collect()
}

/// Read and parse a schema file.
pub fn load_schema_file(path: &Path) -> Result<Vec<FieldSchema>, SchemaError> {
    let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_schema(&content)
}

/// Render a scalar as the text it would have in a `.env` file.
fn literal_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_options(key: &str, value: &Value) -> Result<Vec<String>, SchemaError> {
    let items = value
        .as_array()
        .ok_or_else(|| SchemaError::field(key, "options must be an array of strings"))?;
    let options: Vec<String> = items
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect::<Option<_>>()
        .ok_or_else(|| SchemaError::field(key, "options must be an array of strings"))?;
    if options.is_empty() {
        return Err(SchemaError::field(key, "options must not be empty"));
    }
    Ok(options)
}

/// `{ type = "...", required = .., default = .., description = .., secret = .., options = [..] }`
pub struct TableConverter;

impl SchemaConverter for TableConverter {
    fn name(&self) -> &'static str {
        "table"
    }

    fn recognizes(&self, definition: &Value) -> bool {
        definition.is_table()
    }

    fn convert(&self, key: &str, definition: &Value) -> Result<FieldSchema, SchemaError> {
        let Some(table) = definition.as_table() else {
            return Err(SchemaError::Unrecognized {
                key: key.to_string(),
            });
        };

        let options = table
            .get("options")
            .map(|v| string_options(key, v))
            .transpose()?;

        let type_name = match table.get("type") {
            Some(v) => v
                .as_str()
                .ok_or_else(|| SchemaError::field(key, "type must be a string"))?,
            None if options.is_some() => "enum",
            None => "string",
        };

        let field_type = match (type_name, options) {
            ("string", None) => FieldType::String,
            ("number", None) => FieldType::Number,
            ("boolean", None) => FieldType::Boolean,
            ("enum", Some(options)) => FieldType::Enum(options),
            ("enum", None) => return Err(SchemaError::field(key, "enum requires options")),
            (other, Some(_)) if other != "enum" => {
                return Err(SchemaError::field(key, "options only apply to enum"))
            }
            (other, _) => {
                return Err(SchemaError::field(key, format!("unknown type '{}'", other)))
            }
        };

        let mut field = FieldSchema::new(key, field_type);

        if let Some(required) = table.get("required") {
            field.required = required
                .as_bool()
                .ok_or_else(|| SchemaError::field(key, "required must be a boolean"))?;
        }
        if let Some(default) = table.get("default") {
            field.default = Some(
                literal_text(default)
                    .ok_or_else(|| SchemaError::field(key, "default must be a scalar"))?,
            );
        }
        if let Some(description) = table.get("description") {
            field.description = Some(
                description
                    .as_str()
                    .ok_or_else(|| SchemaError::field(key, "description must be a string"))?
                    .to_string(),
            );
        }
        if let Some(secret) = table.get("secret") {
            field.secret = secret
                .as_bool()
                .ok_or_else(|| SchemaError::field(key, "secret must be a boolean"))?;
        }

        Ok(field)
    }
}

/// `"number"`, `"boolean?"`, `"string!"`, `"enum:a|b|c?"`
pub struct ShorthandConverter;

impl SchemaConverter for ShorthandConverter {
    fn name(&self) -> &'static str {
        "shorthand"
    }

    fn recognizes(&self, definition: &Value) -> bool {
        definition
            .as_str()
            .is_some_and(|s| SHORTHAND_RE.is_match(s.trim()))
    }

    fn convert(&self, key: &str, definition: &Value) -> Result<FieldSchema, SchemaError> {
        let text = definition.as_str().unwrap_or_default().trim();
        let caps = SHORTHAND_RE
            .captures(text)
            .ok_or_else(|| SchemaError::field(key, format!("bad shorthand '{}'", text)))?;

        let base = &caps[1];
        let flags = &caps[2];

        let field_type = match base {
            "string" => FieldType::String,
            "number" => FieldType::Number,
            "boolean" => FieldType::Boolean,
            _ => {
                let options: Vec<String> = base
                    .trim_start_matches("enum:")
                    .split('|')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect();
                if options.is_empty() {
                    return Err(SchemaError::field(key, "enum requires options"));
                }
                FieldType::Enum(options)
            }
        };

        let mut field = FieldSchema::new(key, field_type);
        field.required = !flags.contains('?');
        field.secret = flags.contains('!');
        Ok(field)
    }
}

/// `["a", "b"]`
pub struct ChoicesConverter;

impl SchemaConverter for ChoicesConverter {
    fn name(&self) -> &'static str {
        "choices"
    }

    fn recognizes(&self, definition: &Value) -> bool {
        definition
            .as_array()
            .is_some_and(|items| !items.is_empty() && items.iter().all(Value::is_str))
    }

    fn convert(&self, key: &str, definition: &Value) -> Result<FieldSchema, SchemaError> {
        Ok(FieldSchema::new(
            key,
            FieldType::Enum(string_options(key, definition)?),
        ))
    }
}

/// `8080`, `0.5`, `true`
pub struct LiteralConverter;

impl SchemaConverter for LiteralConverter {
    fn name(&self) -> &'static str {
        "literal"
    }

    fn recognizes(&self, definition: &Value) -> bool {
        matches!(
            definition,
            Value::Integer(_) | Value::Float(_) | Value::Boolean(_)
        )
    }

    fn convert(&self, key: &str, definition: &Value) -> Result<FieldSchema, SchemaError> {
        let field_type = match definition {
            Value::Boolean(_) => FieldType::Boolean,
            _ => FieldType::Number,
        };
        let default = literal_text(definition)
            .ok_or_else(|| SchemaError::field(key, "literal must be a scalar"))?;
        Ok(FieldSchema::new(key, field_type)
            .optional()
            .with_default(default))
    }
}
