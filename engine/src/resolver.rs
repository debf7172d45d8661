//! Interpolation, ternary expansion and default injection.
//!
//! [`resolve`] turns parsed entries into a flat [`ResolvedEnv`]:
//!
//! - `${NAME}` tokens are replaced by the resolved value of `NAME`;
//! - a value of the form `${VAR} ? "a" : "b"` or `${VAR} == "x" ? "a" : "b"`
//!   (also `!=`) is replaced by one of its branches, which is then
//!   interpolated like a plain value;
//! - schema defaults fill in keys that have no assignment, and take part in
//!   interpolation like any other value;
//! - self-referencing chains fail with
//!   [`CircularDependency`](envx_core::EnvxError::CircularDependency).
//!
//! Resolution state is local to each call, so concurrent calls never share
//! anything.

use std::collections::HashSet;
use std::sync::LazyLock;

use envx_core::{EnvValue, EnvxError, RawEntry, ResolvedEnv, Schema};
use indexmap::IndexMap;
use regex::{Captures, Regex};
use tracing::debug;

type Result<T> = std::result::Result<T, EnvxError>;

static TERNARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*\$\{([^}]+)\}(?:\s*(==|!=)\s*"([^"]*)")?\s*\?\s*"([^"]*)"\s*:\s*"([^"]*)"\s*$"#,
    )
    .expect("static regex must compile")
});

static INTERPOLATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex must compile"));

/// Resolves raw entries against an optional schema.
///
/// Keys keep the order of their first assignment, followed by keys that
/// only exist through a schema default. When a key is assigned more than
/// once the last assignment wins.
///
/// # Errors
///
/// - [`EnvxError::CircularDependency`] when a key is reached again while it
///   is still being resolved;
/// - [`EnvxError::MissingInterpolationTarget`] when `${NAME}` has no value;
/// - [`EnvxError::MissingRequired`] when a required schema key has neither
///   an assignment nor a default.
///
/// # Examples
///
/// ```
/// use envx_core::{EnvValue, RawEntry};
/// use envx_engine::resolve;
///
/// let entries = vec![
///     RawEntry::new("HOST", "localhost"),
///     RawEntry::new("PORT", "3000"),
///     RawEntry::new("URL", "http://${HOST}:${PORT}"),
/// ];
/// let env = resolve(&entries, None).unwrap();
/// assert_eq!(env["URL"], EnvValue::from("http://localhost:3000"));
/// ```
pub fn resolve(entries: &[RawEntry], schema: Option<&Schema>) -> Result<ResolvedEnv> {
    let mut raw: IndexMap<String, EnvValue> = IndexMap::new();
    for entry in entries {
        raw.insert(entry.key.clone(), entry.value.clone());
    }

    if let Some(schema) = schema {
        for (key, entry) in schema {
            if raw.contains_key(key) {
                continue;
            }
            if let Some(default) = &entry.default {
                raw.insert(key.clone(), default.clone());
            }
        }
    }

    debug!(keys = raw.len(), "resolving envx values");

    let mut resolver = Resolver::new(&raw);
    for (key, value) in &raw {
        let resolved = resolver.resolve_value(key, value)?;
        resolver.resolved.insert(key.clone(), resolved);
    }

    if let Some(schema) = schema {
        if let Some((key, _)) = schema
            .iter()
            .find(|(key, entry)| entry.required && !raw.contains_key(key.as_str()))
        {
            return Err(EnvxError::MissingRequired { key: key.clone() });
        }
    }

    Ok(resolver.resolved)
}

struct Resolver<'a> {
    raw: &'a IndexMap<String, EnvValue>,
    resolved: ResolvedEnv,
    in_progress: HashSet<String>,
}

impl<'a> Resolver<'a> {
    fn new(raw: &'a IndexMap<String, EnvValue>) -> Self {
        Self {
            raw,
            resolved: ResolvedEnv::new(),
            in_progress: HashSet::new(),
        }
    }

    fn resolve_value(&mut self, key: &str, raw_value: &EnvValue) -> Result<EnvValue> {
        let EnvValue::String(text) = raw_value else {
            return Ok(raw_value.clone());
        };

        if !self.in_progress.insert(key.to_string()) {
            return Err(EnvxError::CircularDependency {
                key: key.to_string(),
            });
        }

        let value = match TERNARY_RE.captures(text.trim()) {
            Some(caps) => {
                let branch = self.expand_ternary(&caps)?;
                self.interpolate(&branch)?
            }
            None => self.interpolate(text)?,
        };

        self.in_progress.remove(key);
        Ok(EnvValue::String(value))
    }

    /// Looks up `name`, preferring already-resolved values.
    fn lookup(&mut self, name: &str) -> Result<Option<EnvValue>> {
        if let Some(value) = self.resolved.get(name) {
            return Ok(Some(value.clone()));
        }
        let raw = self.raw;
        match raw.get(name) {
            Some(raw_value) => self.resolve_value(name, raw_value).map(Some),
            None => Ok(None),
        }
    }

    fn expand_ternary(&mut self, caps: &Captures<'_>) -> Result<String> {
        let group = |idx: usize| caps.get(idx).map_or("", |m| m.as_str());
        let name = group(1).trim();
        let actual = self.lookup(name)?;

        let condition = match caps.get(2).map(|m| m.as_str()) {
            Some(operator) => {
                let equal = actual
                    .as_ref()
                    .is_some_and(|value| value.to_string() == group(3));
                if operator == "==" { equal } else { !equal }
            }
            None => actual.as_ref().is_some_and(EnvValue::is_truthy),
        };

        debug!(condition = name, result = condition, "expanded ternary");
        Ok(if condition { group(4) } else { group(5) }.to_string())
    }

    fn interpolate(&mut self, text: &str) -> Result<String> {
        if !text.contains("${") {
            return Ok(text.to_string());
        }

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in INTERPOLATION_RE.captures_iter(text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let name = name.as_str().trim();
            let value = self
                .lookup(name)?
                .ok_or_else(|| EnvxError::MissingInterpolationTarget {
                    key: name.to_string(),
                })?;

            out.push_str(&text[last..whole.start()]);
            out.push_str(&value.to_string());
            last = whole.end();
        }
        out.push_str(&text[last..]);

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use envx_core::{EnvType, ErrorKind, SchemaEntry};

    use super::*;

    fn entries(items: &[(&str, &str)]) -> Vec<RawEntry> {
        items.iter().map(|(k, v)| RawEntry::new(*k, *v)).collect()
    }

    #[test]
    fn test_resolve_passes_plain_values_through() {
        let env = resolve(&entries(&[("KEY", "value"), ("OTHER", "")]), None).unwrap();
        assert_eq!(env["KEY"], EnvValue::from("value"));
        assert_eq!(env["OTHER"], EnvValue::from(""));
    }

    #[test]
    fn test_resolve_interpolates_forward_references() {
        let env = resolve(
            &entries(&[("URL", "${SCHEME}://${ HOST }"), ("SCHEME", "https"), ("HOST", "example.com")]),
            None,
        )
        .unwrap();
        assert_eq!(env["URL"], EnvValue::from("https://example.com"));
        let keys: Vec<&str> = env.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["URL", "SCHEME", "HOST"]);
    }

    #[test]
    fn test_resolve_interpolates_chains() {
        let env = resolve(&entries(&[("A", "a"), ("B", "${A}b"), ("C", "${B}c")]), None).unwrap();
        assert_eq!(env["C"], EnvValue::from("abc"));
    }

    #[test]
    fn test_resolve_detects_self_reference() {
        let err = resolve(&entries(&[("X", "${X}")]), None).unwrap_err();
        assert_eq!(err, EnvxError::CircularDependency { key: "X".into() });
    }

    #[test]
    fn test_resolve_detects_indirect_cycles() {
        let err = resolve(&entries(&[("A", "${B}"), ("B", "${C}"), ("C", "${A}")]), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CircularDependency);
        assert_eq!(err.key(), Some("A"));
    }

    #[test]
    fn test_resolve_reports_missing_interpolation_target() {
        let err = resolve(&entries(&[("PORT", "3000"), ("URL", "http://${HOST}:${PORT}")]), None)
            .unwrap_err();
        assert_eq!(
            err,
            EnvxError::MissingInterpolationTarget {
                key: "HOST".into()
            }
        );
    }

    #[test]
    fn test_resolve_ternary_with_comparator() {
        let value = r#"${X}=="a"?"yes":"no""#;
        let env = resolve(&entries(&[("X", "a"), ("V", value)]), None).unwrap();
        assert_eq!(env["V"], EnvValue::from("yes"));

        let env = resolve(&entries(&[("X", "b"), ("V", value)]), None).unwrap();
        assert_eq!(env["V"], EnvValue::from("no"));

        let value = r#"${X} != "a" ? "other" : "same""#;
        let env = resolve(&entries(&[("X", "b"), ("V", value)]), None).unwrap();
        assert_eq!(env["V"], EnvValue::from("other"));
    }

    #[test]
    fn test_resolve_ternary_truthiness() {
        let value = r#"${DEV_MODE} ? "http://localhost:3000" : "https://api.example.com""#;
        let env = resolve(&entries(&[("DEV_MODE", "TRUE"), ("API_URL", value)]), None).unwrap();
        assert_eq!(env["API_URL"], EnvValue::from("http://localhost:3000"));

        let env = resolve(&entries(&[("DEV_MODE", "false"), ("API_URL", value)]), None).unwrap();
        assert_eq!(env["API_URL"], EnvValue::from("https://api.example.com"));

        // Only the number 1 is truthy, not the string "1".
        let env = resolve(&entries(&[("DEV_MODE", "1"), ("API_URL", value)]), None).unwrap();
        assert_eq!(env["API_URL"], EnvValue::from("https://api.example.com"));

        let mut schema = Schema::new();
        schema.insert("DEV_MODE".into(), SchemaEntry::typed(EnvType::Number).with_default(1.0));
        let env = resolve(&entries(&[("API_URL", value)]), Some(&schema)).unwrap();
        assert_eq!(env["API_URL"], EnvValue::from("http://localhost:3000"));
    }

    #[test]
    fn test_resolve_ternary_on_absent_variable() {
        let env = resolve(&entries(&[("V", r#"${NOPE} ? "a" : "b""#)]), None).unwrap();
        assert_eq!(env["V"], EnvValue::from("b"));

        let env = resolve(&entries(&[("V", r#"${NOPE} != "x" ? "a" : "b""#)]), None).unwrap();
        assert_eq!(env["V"], EnvValue::from("a"));
    }

    #[test]
    fn test_resolve_ternary_branch_is_interpolated() {
        let value = r#"${FLAG} ? "${OTHER}" : "no""#;
        let env = resolve(&entries(&[("FLAG", "true"), ("OTHER", "x"), ("V", value)]), None)
            .unwrap();
        assert_eq!(env["V"], EnvValue::from("x"));

        let env = resolve(&entries(&[("FLAG", "false"), ("V", value)]), None).unwrap();
        assert_eq!(env["V"], EnvValue::from("no"));
    }

    #[test]
    fn test_resolve_ternary_branch_with_missing_target() {
        let value = r#"${FLAG} ? "${ABSENT}/api" : "no""#;
        let err = resolve(&entries(&[("FLAG", "true"), ("V", value)]), None).unwrap_err();
        assert_eq!(
            err,
            EnvxError::MissingInterpolationTarget {
                key: "ABSENT".into()
            }
        );
    }

    #[test]
    fn test_resolve_ternary_condition_is_resolved_recursively() {
        let value = r#"${MODE} == "prod" ? "on" : "off""#;
        let env = resolve(
            &entries(&[("V", value), ("MODE", "${TARGET}"), ("TARGET", "prod")]),
            None,
        )
        .unwrap();
        assert_eq!(env["V"], EnvValue::from("on"));
    }

    #[test]
    fn test_resolve_ternary_cycle_is_detected() {
        let err = resolve(&entries(&[("V", r#"${V} ? "a" : "b""#)]), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CircularDependency);
    }

    #[test]
    fn test_resolve_injects_defaults_for_missing_keys() {
        let mut schema = Schema::new();
        schema.insert(
            "TIMEOUT".into(),
            SchemaEntry::typed(EnvType::Number).with_default(30.0).required(),
        );
        schema.insert(
            "HOST".into(),
            SchemaEntry::typed(EnvType::String).with_default("localhost"),
        );

        let env = resolve(&entries(&[("URL", "http://${HOST}")]), Some(&schema)).unwrap();
        assert_eq!(env["TIMEOUT"], EnvValue::Number(30.0));
        assert_eq!(env["URL"], EnvValue::from("http://localhost"));
        let keys: Vec<&str> = env.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["URL", "TIMEOUT", "HOST"]);
    }

    #[test]
    fn test_resolve_prefers_assignment_over_default() {
        let mut schema = Schema::new();
        schema.insert(
            "HOST".into(),
            SchemaEntry::typed(EnvType::String).with_default("localhost"),
        );
        let env = resolve(&entries(&[("HOST", "db")]), Some(&schema)).unwrap();
        assert_eq!(env["HOST"], EnvValue::from("db"));
    }

    #[test]
    fn test_resolve_last_assignment_wins() {
        let env = resolve(&entries(&[("A", "1"), ("B", "${A}"), ("A", "2")]), None).unwrap();
        assert_eq!(env["A"], EnvValue::from("2"));
        assert_eq!(env["B"], EnvValue::from("2"));
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn test_resolve_fails_on_required_key_without_value() {
        let mut schema = Schema::new();
        schema.insert(
            "DATABASE_URL".into(),
            SchemaEntry::typed(EnvType::String).required(),
        );
        let err = resolve(&entries(&[("DB_NAME", "hello")]), Some(&schema)).unwrap_err();
        assert_eq!(
            err,
            EnvxError::MissingRequired {
                key: "DATABASE_URL".into()
            }
        );
    }
}
