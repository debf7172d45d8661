//! Data model shared by every pipeline stage.
//!
//! Values flow through the pipeline as [`EnvValue`] scalars. The parser
//! produces [`RawEntry`] items and a [`Schema`], the resolver turns them into
//! a [`ResolvedEnv`], and the validator coerces that into a [`ValidatedEnv`].
//! All maps preserve insertion order so results follow file order.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

/// A single scalar value.
///
/// Parsed values are always [`EnvValue::String`]; numbers and booleans appear
/// through schema defaults and after validation.
///
/// # Examples
///
/// ```
/// use envx_core::EnvValue;
///
/// assert_eq!(EnvValue::Number(30.0).to_string(), "30");
/// assert_eq!(EnvValue::Number(1.5).to_string(), "1.5");
/// assert_eq!(EnvValue::from("abc").to_string(), "abc");
/// assert_eq!(EnvValue::Bool(true).to_string(), "true");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl EnvValue {
    /// Returns the string slice when this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Permissive truthiness used by ternary conditions.
    ///
    /// Booleans are taken as-is, strings match `true`/`false`
    /// case-insensitively, the number `1` is true. Everything else is false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::String(value) => value.eq_ignore_ascii_case("true"),
            Self::Number(value) => *value == 1.0,
        }
    }
}

impl fmt::Display for EnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
        }
    }
}

// Whole numbers serialize as integers so `30` does not print as `30.0`.
impl Serialize for EnvValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Number(value) if value.fract() == 0.0 && value.abs() < 9.0e15 => {
                serializer.serialize_i64(*value as i64)
            }
            Self::Number(value) => serializer.serialize_f64(*value),
            Self::String(value) => serializer.serialize_str(value),
        }
    }
}

impl From<&str> for EnvValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for EnvValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for EnvValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for EnvValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A `KEY=value` assignment in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    pub key: String,
    pub value: EnvValue,
}

impl RawEntry {
    pub fn new(key: impl Into<String>, value: impl Into<EnvValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Declared type of a variable.
///
/// # Examples
///
/// ```
/// use envx_core::EnvType;
///
/// assert_eq!("url".parse::<EnvType>(), Ok(EnvType::Url));
/// assert!("integer".parse::<EnvType>().is_err());
/// assert_eq!(EnvType::Enum.as_str(), "enum");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvType {
    String,
    Number,
    Boolean,
    Enum,
    Email,
    Url,
}

impl EnvType {
    /// Every supported type, in declaration order.
    pub const ALL: [EnvType; 6] = [
        Self::String,
        Self::Number,
        Self::Boolean,
        Self::Enum,
        Self::Email,
        Self::Url,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Enum => "enum",
            Self::Email => "email",
            Self::Url => "url",
        }
    }
}

impl fmt::Display for EnvType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Contract for one variable, declared by a `[KEY]` block or inferred.
///
/// Use [`SchemaEntry::typed`] and the builder methods to construct entries
/// by hand, e.g. for schema overrides.
///
/// # Examples
///
/// ```
/// use envx_core::{EnvType, SchemaEntry};
///
/// let entry = SchemaEntry::typed(EnvType::Enum)
///     .with_values(["development", "production"])
///     .with_default("development")
///     .required();
/// assert!(entry.required);
/// assert_eq!(entry.values.as_ref().map(Vec::len), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntry {
    /// Declared type; `None` when a block never set `type`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub env_type: Option<EnvType>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<EnvValue>,
    /// Allowed values for `enum`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SchemaEntry {
    pub fn typed(env_type: EnvType) -> Self {
        Self {
            env_type: Some(env_type),
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<EnvValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }
}

/// Variable key → contract, in declaration order.
pub type Schema = IndexMap<String, SchemaEntry>;

/// Values after interpolation, ternary expansion and default injection.
pub type ResolvedEnv = IndexMap<String, EnvValue>;

/// Values coerced to their declared types.
pub type ValidatedEnv = IndexMap<String, EnvValue>;

/// Parses a string as a finite number after trimming.
///
/// Blank input converts to `0`. Non-finite results (`NaN`, `inf`) are
/// rejected.
///
/// # Examples
///
/// ```
/// use envx_core::parse_number;
///
/// assert_eq!(parse_number(" 42 "), Some(42.0));
/// assert_eq!(parse_number("1e3"), Some(1000.0));
/// assert_eq!(parse_number(""), Some(0.0));
/// assert_eq!(parse_number("  "), Some(0.0));
/// assert_eq!(parse_number("NaN"), None);
/// assert_eq!(parse_number("abc"), None);
/// ```
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
