//! # Structural Validation
//!
//! Compiles the schema tables from [`crate::definitions`] once with the
//! `jsonschema` crate (Draft 2020-12) and evaluates records against them.
//! Every violation is collected; validation never stops at the first one.
//!
//! ## Schema Resolution
//!
//! The tables are self-contained. Any `$ref` to an external URI is refused by
//! [`OfflineRetriever`], so validation never touches the network.

use std::fmt;

use jsonschema::{Retrieve, Uri, Validator};
use serde_json::Value;
use thiserror::Error;

use crate::definitions::SchemaKind;

/// Retriever that rejects every external reference.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external schema references are not allowed: {}", uri.as_str()).into())
    }
}

/// Error while preparing validators.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// A schema table could not be compiled.
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuildError {
        /// Name of the schema table.
        schema_name: &'static str,
        /// Compiler message.
        reason: String,
    },
}

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Slash-separated path to the violating field within the record. Field
    /// names are kept verbatim, so `inference time (ms/im)` stays readable.
    pub instance_path: String,
    /// JSON Pointer to the rule that was violated.
    pub schema_path: String,
    /// Human-readable reason, including the offending value.
    pub message: String,
}

impl Violation {
    /// A violation raised by a field-specific check rather than the schema
    /// table.
    pub fn check(field: &str, message: impl Into<String>) -> Self {
        Self {
            instance_path: format!("/{field}"),
            schema_path: format!("/checks/{field}"),
            message: message.into(),
        }
    }

    /// A violation on the whole document.
    pub fn root(message: impl Into<String>) -> Self {
        Self {
            instance_path: String::new(),
            schema_path: String::new(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Compiled validators for every schema table.
///
/// Construction compiles all tables; validating is then allocation-light and
/// side-effect free, so one instance serves a whole run.
pub struct SchemaValidator {
    collection: Table,
    model: Table,
    ecosystem_project: Table,
}

/// A compiled validator together with the document it was compiled from.
struct Table {
    validator: Validator,
    definition: Value,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schemas", &SchemaKind::ALL.map(SchemaKind::name))
            .finish()
    }
}

impl SchemaValidator {
    /// Compile every schema table.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidatorBuildError` if a table does
    /// not compile.
    pub fn new() -> Result<Self, SchemaValidationError> {
        Ok(Self {
            collection: build_table(SchemaKind::Collection)?,
            model: build_table(SchemaKind::Model)?,
            ecosystem_project: build_table(SchemaKind::EcosystemProject)?,
        })
    }

    fn table(&self, kind: SchemaKind) -> &Table {
        match kind {
            SchemaKind::Collection => &self.collection,
            SchemaKind::Model => &self.model,
            SchemaKind::EcosystemProject => &self.ecosystem_project,
        }
    }

    /// Validate `instance` against the table for `kind`, returning every
    /// violation. An empty vector means the instance is valid.
    ///
    /// Integer fields reject floats even when they have no fractional part
    /// (`Epochs: 100.0`), which JSON Schema alone would accept.
    pub fn validate_value(&self, kind: SchemaKind, instance: &Value) -> Vec<Violation> {
        let table = self.table(kind);
        let mut violations: Vec<Violation> = table
            .validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: field_path(&e.instance_path.to_string()),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        let mut fields = Vec::new();
        whole_floats_in_integer_fields(
            &table.definition,
            instance,
            &mut fields,
            String::new(),
            &mut violations,
        );
        violations
    }

    /// Validate one `Collections` entry.
    pub fn validate_collection(&self, record: &Value) -> Vec<Violation> {
        self.validate_value(SchemaKind::Collection, record)
    }

    /// Validate one `Models` entry.
    pub fn validate_model(&self, record: &Value) -> Vec<Violation> {
        self.validate_value(SchemaKind::Model, record)
    }

    /// Structural validation of one ecosystem project. Field-specific checks
    /// live in [`crate::ecosystem`].
    pub fn validate_project_shape(&self, project: &Value) -> Vec<Violation> {
        self.validate_value(SchemaKind::EcosystemProject, project)
    }
}

fn build_table(kind: SchemaKind) -> Result<Table, SchemaValidationError> {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft202012);
    opts.with_retriever(OfflineRetriever);

    let definition = kind.definition();
    let validator =
        opts.build(&definition)
            .map_err(|e| SchemaValidationError::ValidatorBuildError {
                schema_name: kind.name(),
                reason: e.to_string(),
            })?;

    tracing::debug!(schema = kind.name(), "compiled schema table");
    Ok(Table {
        validator,
        definition,
    })
}

/// Decode the RFC 6901 escapes of a JSON Pointer so that field names
/// containing `/` or `~` print as written.
fn field_path(pointer: &str) -> String {
    pointer.replace("~1", "/").replace("~0", "~")
}

/// Walk `instance` along the `properties` and `items` of `schema` and report
/// every float with no fractional part sitting in an `"integer"` field.
/// Floats with a fractional part are already reported by the schema.
fn whole_floats_in_integer_fields(
    schema: &Value,
    instance: &Value,
    fields: &mut Vec<String>,
    schema_path: String,
    out: &mut Vec<Violation>,
) {
    if schema.get("type").and_then(Value::as_str) == Some("integer") {
        if let Value::Number(n) = instance {
            if !n.is_i64() && !n.is_u64() && n.as_f64().is_some_and(|x| x.fract() == 0.0) {
                out.push(Violation {
                    instance_path: fields.iter().map(|f| format!("/{f}")).collect(),
                    schema_path: format!("{schema_path}/type"),
                    message: format!("{instance} is not of type \"integer\""),
                });
            }
        }
        return;
    }

    if let (Some(properties), Some(object)) = (
        schema.get("properties").and_then(Value::as_object),
        instance.as_object(),
    ) {
        for (name, sub_schema) in properties {
            if let Some(value) = object.get(name) {
                fields.push(name.clone());
                let sub_path = format!("{schema_path}/properties/{}", escape_token(name));
                whole_floats_in_integer_fields(sub_schema, value, fields, sub_path, out);
                fields.pop();
            }
        }
    }

    if let (Some(items), Some(array)) = (schema.get("items"), instance.as_array()) {
        for (position, value) in array.iter().enumerate() {
            fields.push(position.to_string());
            let sub_path = format!("{schema_path}/items");
            whole_floats_in_integer_fields(items, value, fields, sub_path, out);
            fields.pop();
        }
    }
}

fn escape_token(name: &str) -> String {
    name.replace('~', "~0").replace('/', "~1")
}
