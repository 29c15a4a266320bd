//! Declarative schema engine
//!
//! A schema describes the expected shape of a JSON value and produces a
//! normalized copy of it: unknown fields are dropped, filters rewrite field
//! values, validators check constraints. The engine follows "parse, don't
//! validate" — callers receive either the normalized value or the full
//! ordered list of violations, never a half-checked input.
//!
//! [`ObjectSchema`] is the built-in engine. Anything implementing the
//! [`Schema`] trait can stand in for it, including engines that need to
//! suspend (remote lookups, async uniqueness checks).

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::error::{FieldError, LivraError};

pub mod filters;
pub mod validators;

type BoxedValidator = Arc<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;
type BoxedFilter = Arc<dyn Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync>;

/// Outcome of a failed parse
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The input does not conform to the declared shape
    #[error("input failed schema validation ({} field error(s))", .0.len())]
    Invalid(Vec<FieldError>),

    /// The engine itself faulted; not a property of the input
    #[error("schema engine fault: {0}")]
    Engine(#[from] anyhow::Error),
}

impl From<SchemaError> for LivraError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::Invalid(errors) => LivraError::Validation(errors),
            SchemaError::Engine(err) => LivraError::Internal(err),
        }
    }
}

/// A schema engine: parses raw data into its normalized form
///
/// Parsing may suspend, so engines backed by async checks plug in without a
/// dedicated code path.
#[async_trait]
pub trait Schema: Send + Sync {
    async fn parse(&self, data: Value) -> Result<Value, SchemaError>;
}

/// Declaration for one field of an [`ObjectSchema`]
///
/// Filters run first, in declaration order, and their output is what lands in
/// the normalized value. Validators then each check one constraint; every
/// failing validator contributes its own entry to the error list.
#[derive(Clone, Default)]
pub struct FieldSchema {
    required: bool,
    filters: Vec<BoxedFilter>,
    validators: Vec<BoxedValidator>,
    nested: Option<ObjectSchema>,
}

impl FieldSchema {
    /// A field that must be present and non-null
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    /// A field that may be absent or null; when absent it is omitted from the
    /// normalized value
    pub fn optional() -> Self {
        Self::default()
    }

    /// Append a normalization filter
    pub fn filter(
        mut self,
        filter: impl Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    ) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Append a constraint validator
    pub fn validate(
        mut self,
        validator: impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Validate this field against a nested object schema
    ///
    /// Violations inside the nested schema are reported with dotted paths
    /// rooted at this field.
    pub fn nested(mut self, schema: ObjectSchema) -> Self {
        self.nested = Some(schema);
        self
    }
}

/// Order-preserving object schema
///
/// Fields are checked in declaration order and violations are reported in
/// that same order, which is the order clients see in rejection responses.
#[derive(Clone, Default)]
pub struct ObjectSchema {
    fields: IndexMap<String, FieldSchema>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field
    pub fn field(mut self, name: impl Into<String>, field: FieldSchema) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// Parse a value synchronously
    ///
    /// Non-object input yields a single root-level violation (empty path).
    pub fn parse_value(&self, data: Value) -> Result<Value, SchemaError> {
        let Value::Object(input) = data else {
            return Err(SchemaError::Invalid(vec![FieldError::root(
                "Un objet JSON est attendu",
            )]));
        };

        let mut errors = Vec::new();
        let normalized = self.parse_object(input, &[], &mut errors)?;
        if errors.is_empty() {
            Ok(Value::Object(normalized))
        } else {
            Err(SchemaError::Invalid(errors))
        }
    }

    fn parse_object(
        &self,
        mut input: Map<String, Value>,
        prefix: &[String],
        errors: &mut Vec<FieldError>,
    ) -> anyhow::Result<Map<String, Value>> {
        // Fields absent from the declaration are dropped.
        let mut normalized = Map::new();

        for (name, field) in &self.fields {
            let path: Vec<String> = prefix
                .iter()
                .cloned()
                .chain(std::iter::once(name.clone()))
                .collect();

            // Absent and null are equivalent: a violation when required,
            // omitted from the normalized value otherwise.
            let mut value = match input.remove(name) {
                Some(value) if !value.is_null() => value,
                _ => {
                    if field.required {
                        errors.push(FieldError::new(
                            path,
                            format!("Le champ '{}' est requis", name),
                        ));
                    }
                    continue;
                }
            };

            for filter in &field.filters {
                value = filter(name, value)?;
            }

            if let Some(nested) = &field.nested {
                match value {
                    Value::Object(map) => {
                        let inner = nested.parse_object(map, &path, errors)?;
                        normalized.insert(name.clone(), Value::Object(inner));
                    }
                    _ => {
                        errors.push(FieldError::new(
                            path,
                            format!("'{}' doit être un objet", name),
                        ));
                    }
                }
                continue;
            }

            for validator in &field.validators {
                if let Err(message) = validator(name, &value) {
                    errors.push(FieldError::new(path.clone(), message));
                }
            }

            normalized.insert(name.clone(), value);
        }

        Ok(normalized)
    }
}

#[async_trait]
impl Schema for ObjectSchema {
    async fn parse(&self, data: Value) -> Result<Value, SchemaError> {
        self.parse_value(data)
    }
}
