//! Core types, schema completion and typed validation for `.envx` files.
//!
//! This crate defines the data model shared by every stage of the envx
//! pipeline:
//!
//! - [`EnvValue`]: a string, number or boolean scalar.
//! - [`RawEntry`]: a parsed `KEY=value` assignment in file order.
//! - [`SchemaEntry`] / [`Schema`]: per-variable contracts (type, required,
//!   default, enum values, deprecation, description).
//! - [`EnvxError`]: the single fail-fast error family with an
//!   [`ErrorKind`] discriminator.
//!
//! Completion ([`complete_schema`]) gives every parsed key a contract,
//! inferring types where no `[KEY]` block exists. Validation ([`validate`])
//! coerces resolved values to their declared types.
//!
//! Parsing and resolution live in the `envx-engine` crate.
//!
//! # Example
//!
//! ```
//! use envx_core::*;
//!
//! let entries = vec![
//!     RawEntry::new("PORT", "8080"),
//!     RawEntry::new("DEBUG", "true"),
//! ];
//! let mut parsed = Schema::new();
//! parsed.insert("DEBUG".into(), SchemaEntry::typed(EnvType::Boolean));
//!
//! let schema = complete_schema(&entries, &parsed);
//! let pairs: Vec<(String, String)> = entries
//!     .iter()
//!     .map(|entry| (entry.key.clone(), entry.value.to_string()))
//!     .collect();
//!
//! let env = validate(&pairs, Some(&schema)).unwrap();
//! assert_eq!(env["PORT"], EnvValue::Number(8080.0));
//! assert_eq!(env["DEBUG"], EnvValue::Bool(true));
//! ```

mod complete;
mod error;
mod types;
mod validate;

pub use complete::{
    builtin_schema, complete_schema, infer_type, install_builtin_schema, merge_into,
    with_builtin_schema,
};
pub use error::{EnvxError, ErrorKind, Result};
pub use types::*;
pub use validate::{coerce_value, validate};
