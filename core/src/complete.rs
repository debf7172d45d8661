//! Schema completion.
//!
//! Parsed schemas only describe the keys that have a `[KEY]` block.
//! [`complete_schema`] layers three sources into one schema so every
//! assignment has a contract:
//!
//! 1. the process-wide builtin schema ([`builtin_schema`]),
//! 2. the explicitly parsed schema, which overrides builtin entries,
//! 3. an inferred `{ type, required: false }` entry for each remaining key.
//!
//! # Example
//!
//! ```
//! use envx_core::*;
//!
//! let entries = vec![
//!     RawEntry::new("PORT", "3000"),
//!     RawEntry::new("HOST", "localhost"),
//! ];
//! let mut parsed = Schema::new();
//! parsed.insert("HOST".into(), SchemaEntry::typed(EnvType::Url).required());
//!
//! let schema = complete_schema(&entries, &parsed);
//! assert_eq!(schema["PORT"].env_type, Some(EnvType::Number));
//! assert_eq!(schema["HOST"].env_type, Some(EnvType::Url));
//! assert!(schema["HOST"].required);
//! ```

use std::sync::OnceLock;

use crate::{EnvType, EnvValue, RawEntry, Schema, SchemaEntry, parse_number};

static BUILTIN_SCHEMA: OnceLock<Schema> = OnceLock::new();

/// Installs the process-wide builtin schema.
///
/// May succeed at most once, before the first pipeline run reads it. A second
/// call, or a call after [`builtin_schema`] has been read, hands the schema
/// back as the error value.
pub fn install_builtin_schema(schema: Schema) -> Result<(), Schema> {
    BUILTIN_SCHEMA.set(schema)
}

/// Returns the builtin schema, empty unless one was installed.
pub fn builtin_schema() -> &'static Schema {
    BUILTIN_SCHEMA.get_or_init(Schema::new)
}

/// Merges the builtin schema under `schema`.
///
/// Entries in `schema` win over builtin entries with the same key.
pub fn with_builtin_schema(schema: Option<&Schema>) -> Schema {
    let mut merged = builtin_schema().clone();
    if let Some(schema) = schema {
        merge_into(&mut merged, schema);
    }
    merged
}

/// Builds the effective schema for a set of parsed entries.
///
/// Keys keep the order builtin → parsed → first appearance in `entries`.
pub fn complete_schema(entries: &[RawEntry], schema: &Schema) -> Schema {
    complete_with_builtin(builtin_schema(), entries, schema)
}

fn complete_with_builtin(builtin: &Schema, entries: &[RawEntry], schema: &Schema) -> Schema {
    let mut completed = builtin.clone();
    merge_into(&mut completed, schema);

    for entry in entries {
        if !completed.contains_key(&entry.key) {
            completed.insert(
                entry.key.clone(),
                SchemaEntry::typed(infer_type(&entry.value)),
            );
        }
    }

    completed
}

/// Overlays `overlay` onto `base`; existing keys keep their position.
pub fn merge_into(base: &mut Schema, overlay: &Schema) {
    for (key, entry) in overlay {
        base.insert(key.clone(), entry.clone());
    }
}

/// Infers a type from a raw value.
///
/// Blank strings infer as `string`.
///
/// # Examples
///
/// ```
/// use envx_core::{EnvType, EnvValue, infer_type};
///
/// assert_eq!(infer_type(&EnvValue::Bool(true)), EnvType::Boolean);
/// assert_eq!(infer_type(&EnvValue::from(" 8080 ")), EnvType::Number);
/// assert_eq!(infer_type(&EnvValue::from("")), EnvType::String);
/// assert_eq!(infer_type(&EnvValue::from("true")), EnvType::String);
/// ```
pub fn infer_type(value: &EnvValue) -> EnvType {
    match value {
        EnvValue::Bool(_) => EnvType::Boolean,
        EnvValue::Number(_) => EnvType::Number,
        EnvValue::String(raw) if !raw.trim().is_empty() && parse_number(raw).is_some() => {
            EnvType::Number
        }
        EnvValue::String(_) => EnvType::String,
    }
}
