//! Typed validation and coercion of resolved values.
//!
//! [`validate`] walks the schema in declaration order, coercing each present
//! value (or its default) to the declared [`EnvType`], and fails on the first
//! value that does not fit. Keys without a schema entry pass through as
//! strings.
//!
//! # Examples
//!
//! ```
//! use envx_core::*;
//!
//! let mut schema = Schema::new();
//! schema.insert("PORT".into(), SchemaEntry::typed(EnvType::Number).required());
//!
//! let pairs = vec![("PORT".to_string(), "8080".to_string())];
//! let env = validate(&pairs, Some(&schema)).unwrap();
//! assert_eq!(env["PORT"], EnvValue::Number(8080.0));
//!
//! // Invalid: not a number
//! let pairs = vec![("PORT".to_string(), "eighty".to_string())];
//! let err = validate(&pairs, Some(&schema)).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::TypeMismatch);
//! ```

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use url::Url;

use crate::error::Result;
use crate::{EnvType, EnvValue, EnvxError, Schema, SchemaEntry, ValidatedEnv, parse_number};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex must compile")
});

/// Validates `(key, value)` pairs against an optional schema.
///
/// For each schema key: a present value is coerced, else a default is
/// coerced from its string form, else a required key fails with
/// [`EnvxError::MissingRequired`], else the key is left out. Remaining pairs
/// are appended unchanged as strings. When the same key appears more than
/// once in `pairs` the last value wins.
pub fn validate(pairs: &[(String, String)], schema: Option<&Schema>) -> Result<ValidatedEnv> {
    let mut inputs: IndexMap<&str, &str> = IndexMap::new();
    for (key, value) in pairs {
        inputs.insert(key.as_str(), value.as_str());
    }

    let mut result = ValidatedEnv::new();

    if let Some(schema) = schema {
        for (key, entry) in schema {
            if let Some(raw) = inputs.get(key.as_str()) {
                result.insert(key.clone(), coerce_value(key, raw, entry)?);
                continue;
            }

            if let Some(default) = &entry.default {
                let raw = default.to_string();
                result.insert(key.clone(), coerce_value(key, &raw, entry)?);
                continue;
            }

            if entry.required {
                return Err(EnvxError::MissingRequired { key: key.clone() });
            }
        }
    }

    for (key, value) in inputs {
        if !result.contains_key(key) {
            result.insert(key.to_string(), EnvValue::from(value));
        }
    }

    Ok(result)
}

/// Coerces one string value according to `entry`.
///
/// # Examples
///
/// ```
/// use envx_core::*;
///
/// let flag = SchemaEntry::typed(EnvType::Boolean);
/// assert_eq!(coerce_value("DEBUG", " TRUE ", &flag), Ok(EnvValue::Bool(true)));
///
/// let mode = SchemaEntry::typed(EnvType::Enum).with_values(["dev", "prod"]);
/// assert!(coerce_value("MODE", "staging", &mode).is_err());
/// ```
pub fn coerce_value(key: &str, value: &str, entry: &SchemaEntry) -> Result<EnvValue> {
    let Some(env_type) = entry.env_type else {
        return Err(EnvxError::UnsupportedType {
            key: key.to_string(),
        });
    };

    let mismatch = || EnvxError::TypeMismatch {
        key: key.to_string(),
        expected: env_type,
        value: value.to_string(),
    };

    match env_type {
        EnvType::String => Ok(EnvValue::from(value)),
        EnvType::Number => parse_number(value).map(EnvValue::Number).ok_or_else(mismatch),
        EnvType::Boolean => {
            let normalized = value.trim();
            if normalized.eq_ignore_ascii_case("true") {
                Ok(EnvValue::Bool(true))
            } else if normalized.eq_ignore_ascii_case("false") {
                Ok(EnvValue::Bool(false))
            } else {
                Err(mismatch())
            }
        }
        EnvType::Enum => {
            let allowed = match entry.values.as_deref() {
                Some(values) if !values.is_empty() => values,
                _ => {
                    return Err(EnvxError::MissingEnumValues {
                        key: key.to_string(),
                    });
                }
            };
            if allowed.iter().any(|candidate| candidate == value) {
                Ok(EnvValue::from(value))
            } else {
                Err(EnvxError::EnumViolation {
                    key: key.to_string(),
                    value: value.to_string(),
                    allowed: allowed.to_vec(),
                })
            }
        }
        EnvType::Email => {
            if EMAIL_RE.is_match(value) {
                Ok(EnvValue::from(value))
            } else {
                Err(mismatch())
            }
        }
        EnvType::Url => match Url::parse(value) {
            Ok(_) => Ok(EnvValue::from(value)),
            Err(_) => Err(mismatch()),
        },
    }
}
