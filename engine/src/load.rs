//! Pipeline entry points: parse → complete → resolve → validate.

use std::path::Path;

use envx_core::{EnvValue, EnvxError, Schema, complete_schema, merge_into, validate, with_builtin_schema};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::parser::parse;
use crate::resolver::resolve;

/// Result of a full pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadOutcome {
    /// Validated values when a schema was in effect, else resolved values.
    pub result: IndexMap<String, EnvValue>,
    /// The schema validation ran against, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// Runs the full pipeline over in-memory content.
///
/// The effective schema is the completed schema (builtin, parsed, inferred)
/// with `schema_override` merged on top. Without an override it is used only
/// when non-empty; validation runs iff an effective schema exists.
///
/// # Examples
///
/// ```
/// use envx_core::EnvValue;
/// use envx_engine::load_from_string;
///
/// let content = "\
/// PORT=8080
/// DEBUG=${ENABLE} ? \"true\" : \"false\"
/// ENABLE=true
///
/// [DEBUG]
/// type = boolean
/// ";
/// let outcome = load_from_string(content, None).unwrap();
/// assert_eq!(outcome.result["PORT"], EnvValue::Number(8080.0));
/// assert_eq!(outcome.result["DEBUG"], EnvValue::Bool(true));
/// ```
pub fn load_from_string(
    content: &str,
    schema_override: Option<&Schema>,
) -> std::result::Result<LoadOutcome, EnvxError> {
    let parsed = parse(content)?;
    let completed = complete_schema(&parsed.entries, &parsed.schema);

    let effective = match schema_override {
        Some(overlay) => {
            let mut merged = completed;
            merge_into(&mut merged, overlay);
            Some(merged)
        }
        None if !completed.is_empty() => Some(completed),
        None => None,
    };

    let resolved = resolve(&parsed.entries, effective.as_ref())?;

    let Some(schema) = effective else {
        debug!(keys = resolved.len(), "no schema in effect; skipping validation");
        return Ok(LoadOutcome {
            result: resolved,
            schema: None,
        });
    };

    let pairs: Vec<(String, String)> = resolved
        .into_iter()
        .map(|(key, value)| (key, value.to_string()))
        .collect();
    let result = validate(&pairs, Some(&schema))?;
    debug!(keys = result.len(), "validated envx values");

    Ok(LoadOutcome {
        result,
        schema: Some(schema),
    })
}

/// Reads a `.envx` file and runs the full pipeline over it.
///
/// The builtin schema is merged under `schema_override`, so validation
/// always runs. The process environment is never touched.
///
/// # Errors
///
/// Returns [`Error::FileNotFound`] if `path` does not exist,
/// [`Error::IoError`] if it cannot be read, or [`Error::Envx`] for pipeline
/// failures.
pub fn load_from_path(
    path: impl AsRef<Path>,
    schema_override: Option<&Schema>,
) -> Result<LoadOutcome> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    info!(path = %path.display(), bytes = content.len(), "loading envx file");

    let schema = with_builtin_schema(schema_override);
    Ok(load_from_string(&content, Some(&schema))?)
}

#[cfg(test)]
mod tests {
    use envx_core::{EnvType, ErrorKind, SchemaEntry};

    use super::*;

    #[test]
    fn test_load_without_any_schema_still_infers_types() {
        let outcome = load_from_string("KEY=\"value\"\nCOUNT=3", None).unwrap();
        assert_eq!(outcome.result["KEY"], EnvValue::from("value"));
        assert_eq!(outcome.result["COUNT"], EnvValue::Number(3.0));
        assert!(outcome.schema.is_some());
    }

    #[test]
    fn test_load_empty_content_skips_validation() {
        let outcome = load_from_string("# nothing here\n", None).unwrap();
        assert!(outcome.result.is_empty());
        assert!(outcome.schema.is_none());
    }

    #[test]
    fn test_load_override_wins_over_parsed_schema() {
        let mut overlay = Schema::new();
        overlay.insert("PORT".into(), SchemaEntry::typed(EnvType::String));

        let outcome = load_from_string("PORT=8080\n[PORT]\ntype=number\n", Some(&overlay)).unwrap();
        assert_eq!(outcome.result["PORT"], EnvValue::from("8080"));
    }

    #[test]
    fn test_load_override_can_require_missing_keys() {
        let mut overlay = Schema::new();
        overlay.insert("SECRET".into(), SchemaEntry::typed(EnvType::String).required());

        let err = load_from_string("A=1", Some(&overlay)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequired);
    }

    #[test]
    fn test_load_validates_interpolated_values() {
        let content = "HOST=localhost\nURL=http://${HOST}:3000\n[URL]\ntype=url\n";
        let outcome = load_from_string(content, None).unwrap();
        assert_eq!(outcome.result["URL"], EnvValue::from("http://localhost:3000"));

        let content = "HOST=not a host\nURL=${HOST}\n[URL]\ntype=url\n";
        let err = load_from_string(content, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_load_from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.envx");
        let err = load_from_path(&missing, None).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(path) if path == missing));
    }

    #[test]
    fn test_load_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".envx");
        std::fs::write(&path, "NAME=app\n[NAME]\ntype=string\nrequired=true\n").unwrap();

        let outcome = load_from_path(&path, None).unwrap();
        assert_eq!(outcome.result["NAME"], EnvValue::from("app"));
    }

    #[test]
    fn test_load_from_path_surfaces_pipeline_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".envx");
        std::fs::write(&path, "X=${X}\n").unwrap();

        let err = load_from_path(&path, None).unwrap_err();
        assert_eq!(
            err.as_envx().map(EnvxError::kind),
            Some(ErrorKind::CircularDependency)
        );
    }
}
