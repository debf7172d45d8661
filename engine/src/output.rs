//! Output formatting for resolved environments and schemas.

use envx_core::{EnvType, EnvValue, Schema, SchemaEntry};
use indexmap::IndexMap;

use crate::error::Result;

/// Supported output formats for printing an environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Formats an environment in the requested output format.
pub fn format_env(env: &IndexMap<String, EnvValue>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(env)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(env)?),
    }
}

/// Renders an environment as a plain `.env` file.
///
/// Each key becomes a `KEY="value"` line; newlines inside values are
/// escaped as `\n`.
///
/// # Examples
///
/// ```
/// use envx_core::EnvValue;
/// use envx_engine::render_dotenv;
/// use indexmap::IndexMap;
///
/// let mut env = IndexMap::new();
/// env.insert("PORT".to_string(), EnvValue::Number(8080.0));
/// env.insert("MOTD".to_string(), EnvValue::from("hello\nworld"));
/// assert_eq!(render_dotenv(&env), "PORT=\"8080\"\nMOTD=\"hello\\nworld\"");
/// ```
pub fn render_dotenv(env: &IndexMap<String, EnvValue>) -> String {
    env.iter()
        .map(|(key, value)| format!("{key}=\"{}\"", value.to_string().replace('\n', "\\n")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Generates TypeScript declarations describing the schema.
///
/// Produces one `Envx` interface member per key. Keys are optional unless
/// marked `required`.
pub fn generate_type_declarations(schema: &Schema) -> String {
    let mut lines = vec![
        "// AUTO GENERATED FILE - DO NOT EDIT\n".to_string(),
        "export interface Envx {".to_string(),
    ];

    for (key, entry) in schema {
        let optional = if entry.required { "" } else { "?" };
        lines.push(format!("  {key}{optional}: {};", ts_type(entry)));
    }

    lines.push("}\n".to_string());
    lines.join("\n")
}

fn ts_type(entry: &SchemaEntry) -> String {
    match entry.env_type.unwrap_or(EnvType::String) {
        EnvType::String | EnvType::Email | EnvType::Url => "string".to_string(),
        EnvType::Number => "number".to_string(),
        EnvType::Boolean => "boolean".to_string(),
        EnvType::Enum => match entry.values.as_deref() {
            Some(values) if values.len() > 1 => values
                .iter()
                .map(|value| format!("\"{value}\""))
                .collect::<Vec<_>>()
                .join(" | "),
            _ => "string".to_string(),
        },
    }
}
