//! `[KEY]` schema blocks and their property lines.

use envx_core::{EnvType, EnvValue, EnvxError, Schema, SchemaEntry, parse_number};

use super::Result;
use super::line::{split_key_value, strip_quotes};

pub(super) fn is_schema_header(line: &str) -> bool {
    line.starts_with('[') && line.ends_with(']')
}

/// Registers a new schema block and returns its key.
pub(super) fn open_schema_block(line: &str, line_no: usize, schema: &mut Schema) -> Result<String> {
    let key = line[1..line.len() - 1].trim();
    if key.is_empty() {
        return Err(EnvxError::syntax(line_no, "schema block name cannot be empty"));
    }

    if schema.contains_key(key) {
        return Err(EnvxError::schema_definition(
            line_no,
            format!(
                "schema key \"{key}\" is already defined; duplicate schema definitions are not allowed"
            ),
        ));
    }

    schema.insert(key.to_string(), SchemaEntry::default());
    Ok(key.to_string())
}

/// Applies one `property = value` line to the block's entry.
pub(super) fn apply_schema_property(
    line: &str,
    line_no: usize,
    target: &mut SchemaEntry,
) -> Result<()> {
    let (raw_key, raw_value) = split_key_value(line, line_no)?;
    let key = raw_key.trim();
    let value = strip_quotes(raw_value.trim());

    match key {
        "type" => {
            if target.env_type.is_some() {
                return Err(EnvxError::schema_definition(
                    line_no,
                    "\"type\" is already defined for this variable and cannot be redefined",
                ));
            }
            let env_type = value.parse::<EnvType>().map_err(|name| {
                EnvxError::schema_definition(line_no, format!("unsupported type \"{name}\""))
            })?;
            target.env_type = Some(env_type);
        }
        "required" => target.required = value == "true",
        "deprecated" => target.deprecated = value == "true",
        "default" => apply_default(value, line_no, target)?,
        "values" => {
            let values: Vec<String> = serde_json::from_str(value).map_err(|_| {
                EnvxError::schema_definition(
                    line_no,
                    "\"values\" must be a valid JSON string array",
                )
            })?;
            target.values = Some(values);
        }
        "description" => target.description = Some(value.to_string()),
        other => {
            return Err(EnvxError::syntax(
                line_no,
                format!("unknown schema property \"{other}\""),
            ));
        }
    }

    Ok(())
}

fn apply_default(value: &str, line_no: usize, target: &mut SchemaEntry) -> Result<()> {
    let Some(env_type) = target.env_type else {
        return Err(EnvxError::schema_definition(
            line_no,
            "\"type\" must be defined before \"default\"",
        ));
    };

    let default = match env_type {
        EnvType::Number => parse_number(value).map(EnvValue::Number).ok_or_else(|| {
            EnvxError::schema_definition(line_no, "default value must be a valid number")
        })?,
        EnvType::Boolean => match value {
            "true" => EnvValue::Bool(true),
            "false" => EnvValue::Bool(false),
            _ => {
                return Err(EnvxError::schema_definition(
                    line_no,
                    "default value must be \"true\" or \"false\"",
                ));
            }
        },
        EnvType::Enum => {
            let allowed = target.values.as_deref().unwrap_or_default();
            if !allowed.iter().any(|candidate| candidate == value) {
                return Err(EnvxError::schema_definition(
                    line_no,
                    format!("default \"{value}\" is not in enum values"),
                ));
            }
            EnvValue::from(value)
        }
        EnvType::String | EnvType::Email | EnvType::Url => EnvValue::from(value),
    };

    target.default = Some(default);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_schema_header() {
        assert!(is_schema_header("[PORT]"));
        assert!(is_schema_header("[]"));
        assert!(!is_schema_header("PORT=[1]x"));
        assert!(!is_schema_header("["));
    }

    #[test]
    fn test_open_schema_block_trims_name() {
        let mut schema = Schema::new();
        let key = open_schema_block("[  PORT ]", 1, &mut schema).unwrap();
        assert_eq!(key, "PORT");
        assert!(schema.contains_key("PORT"));
    }

    #[test]
    fn test_schema_block_names_are_case_sensitive() {
        let mut schema = Schema::new();
        open_schema_block("[port]", 1, &mut schema).unwrap();
        open_schema_block("[PORT]", 2, &mut schema).unwrap();
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_number_defaults() {
        let mut entry = SchemaEntry::typed(EnvType::Number);
        apply_schema_property("default = 2.5", 3, &mut entry).unwrap();
        assert_eq!(entry.default, Some(EnvValue::Number(2.5)));

        let mut entry = SchemaEntry::typed(EnvType::Number);
        apply_schema_property("default =", 3, &mut entry).unwrap();
        assert_eq!(entry.default, Some(EnvValue::Number(0.0)));

        let mut entry = SchemaEntry::typed(EnvType::Number);
        let err = apply_schema_property("default = many", 7, &mut entry).unwrap_err();
        assert_eq!(err.line(), Some(7));
    }

    #[test]
    fn test_string_like_defaults_are_stored_verbatim() {
        let mut entry = SchemaEntry::typed(EnvType::Url);
        apply_schema_property("default = 'http://localhost'", 3, &mut entry).unwrap();
        assert_eq!(entry.default, Some(EnvValue::from("http://localhost")));
    }
}
