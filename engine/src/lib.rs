//! Parsing, resolution and loading for `.envx` environment files.
//!
//! An `.envx` file is a `.env` file extended with `[KEY]` schema blocks,
//! `${VAR}` interpolation, ternary conditionals and `"""` multiline values.
//! This crate drives the full pipeline:
//!
//! 1. [`parse`] splits the text into ordered entries and declared schema.
//! 2. [`envx_core::complete_schema`] fills in the builtin and inferred
//!    contracts.
//! 3. [`resolve`] injects defaults and expands interpolation and ternaries.
//! 4. [`envx_core::validate`] coerces every value to its declared type.
//!
//! [`load_from_string`] and [`load_from_path`] run all four stages. The
//! [`output`] helpers render the result as `.env`, JSON, YAML or TypeScript
//! declarations.
//!
//! # Quick start
//!
//! ```
//! use envx_core::EnvValue;
//! use envx_engine::{load_from_string, render_dotenv};
//!
//! let outcome = load_from_string("HOST=localhost\nURL=http://${HOST}:3000", None).unwrap();
//! assert_eq!(outcome.result["URL"], EnvValue::from("http://localhost:3000"));
//! assert_eq!(
//!     render_dotenv(&outcome.result),
//!     "HOST=\"localhost\"\nURL=\"http://localhost:3000\""
//! );
//! ```
//!
//! # Feature flags
//!
//! - **`clap`** (default): derives `clap::ValueEnum` for [`OutputFormat`].

pub mod config;
mod error;
mod load;
pub mod output;
pub mod parser;
pub mod resolver;

pub use config::{CONFIG_FILE_NAME, EnvxConfig, OutputPaths};
pub use error::{Error, Result};
pub use load::{LoadOutcome, load_from_path, load_from_string};
pub use output::{OutputFormat, format_env, generate_type_declarations, render_dotenv};
pub use parser::{ParsedEnvx, parse};
pub use resolver::resolve;
