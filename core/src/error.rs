//! Error family for the envx pipeline.
//!
//! Every stage fails fast with a single [`EnvxError`]. Variants carry
//! structured fields so callers (CLI, editors) can branch on
//! [`EnvxError::kind`] instead of matching on message text.

use thiserror::Error;

use crate::EnvType;

/// Pipeline errors.
///
/// `Syntax` and `SchemaDefinition` carry the 1-based source line.
///
/// # Examples
///
/// ```
/// use envx_core::{EnvxError, ErrorKind};
///
/// let err = EnvxError::CircularDependency { key: "X".into() };
/// assert_eq!(err.kind(), ErrorKind::CircularDependency);
/// assert_eq!(err.line(), None);
/// assert!(err.to_string().contains("\"X\""));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvxError {
    /// Malformed line: missing `=`, empty names, unknown schema properties.
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    /// A schema block violates its own contract.
    #[error("line {line}: {message}")]
    SchemaDefinition { line: usize, message: String },
    /// A variable references itself, directly or through others.
    #[error("circular dependency detected while resolving \"{key}\"")]
    CircularDependency { key: String },
    /// `${name}` points at a variable with no value.
    #[error("failed to resolve variable \"{key}\": no value found for interpolation")]
    MissingInterpolationTarget { key: String },
    /// A required variable is unset and has no default.
    #[error("required environment variable \"{key}\" is not set and has no default value")]
    MissingRequired { key: String },
    /// A value cannot be coerced to its declared type.
    #[error("invalid value for \"{key}\": expected {expected} but received \"{value}\"")]
    TypeMismatch {
        key: String,
        expected: EnvType,
        value: String,
    },
    /// An enum value outside the allowed set.
    #[error(
        "invalid enum value for \"{key}\": expected one of [{}] but received \"{value}\"",
        .allowed.join(", ")
    )]
    EnumViolation {
        key: String,
        value: String,
        allowed: Vec<String>,
    },
    /// An enum declared without `values`.
    #[error("enum values are not defined for \"{key}\"")]
    MissingEnumValues { key: String },
    /// A schema entry without a usable type.
    #[error("unsupported or missing type for \"{key}\"")]
    UnsupportedType { key: String },
}

/// Discriminator for [`EnvxError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    SchemaDefinition,
    CircularDependency,
    MissingInterpolationTarget,
    MissingRequired,
    TypeMismatch,
    EnumViolation,
    MissingEnumValues,
    UnsupportedType,
}

impl EnvxError {
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    pub fn schema_definition(line: usize, message: impl Into<String>) -> Self {
        Self::SchemaDefinition {
            line,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax { .. } => ErrorKind::Syntax,
            Self::SchemaDefinition { .. } => ErrorKind::SchemaDefinition,
            Self::CircularDependency { .. } => ErrorKind::CircularDependency,
            Self::MissingInterpolationTarget { .. } => ErrorKind::MissingInterpolationTarget,
            Self::MissingRequired { .. } => ErrorKind::MissingRequired,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::EnumViolation { .. } => ErrorKind::EnumViolation,
            Self::MissingEnumValues { .. } => ErrorKind::MissingEnumValues,
            Self::UnsupportedType { .. } => ErrorKind::UnsupportedType,
        }
    }

    /// Source line for syntax and schema-definition errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Syntax { line, .. } | Self::SchemaDefinition { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Variable key the error is about, when there is one.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Syntax { .. } | Self::SchemaDefinition { .. } => None,
            Self::CircularDependency { key }
            | Self::MissingInterpolationTarget { key }
            | Self::MissingRequired { key }
            | Self::TypeMismatch { key, .. }
            | Self::EnumViolation { key, .. }
            | Self::MissingEnumValues { key }
            | Self::UnsupportedType { key } => Some(key),
        }
    }
}

/// Convenience alias for results with [`EnvxError`].
pub type Result<T> = std::result::Result<T, EnvxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_is_only_reported_for_source_errors() {
        assert_eq!(EnvxError::syntax(4, "x").line(), Some(4));
        assert_eq!(EnvxError::schema_definition(2, "x").line(), Some(2));
        assert_eq!(EnvxError::MissingRequired { key: "A".into() }.line(), None);
    }

    #[test]
    fn test_enum_violation_lists_allowed_values() {
        let err = EnvxError::EnumViolation {
            key: "MODE".into(),
            value: "staging".into(),
            allowed: vec!["dev".into(), "prod".into()],
        };
        assert_eq!(
            err.to_string(),
            "invalid enum value for \"MODE\": expected one of [dev, prod] but received \"staging\""
        );
        assert_eq!(err.key(), Some("MODE"));
    }
}
