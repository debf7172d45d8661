//! Project configuration for the `envx` command line.
//!
//! Read from `envx.config.yaml` in the working directory. Every field is
//! optional; command line flags take precedence over configured values.
//!
//! # Example YAML
//!
//! ```yaml
//! input: config/.envx
//! overwrite: false
//! output:
//!   env: .env
//!   types: src/envx.ts
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// File name looked up by [`EnvxConfig::load_or_default`].
pub const CONFIG_FILE_NAME: &str = "envx.config.yaml";

const DEFAULT_INPUT: &str = ".envx";
const DEFAULT_ENV_OUTPUT: &str = ".env";
const DEFAULT_TYPES_OUTPUT: &str = "envx.ts";

/// Output destinations for generated files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    /// Destination of the rendered `.env` file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<PathBuf>,
    /// Destination of the generated type declarations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<PathBuf>,
}

/// Top-level `envx.config.yaml` contents.
///
/// # Examples
///
/// ```
/// use envx_engine::EnvxConfig;
/// use std::path::Path;
///
/// let config: EnvxConfig = serde_yaml::from_str("output:\n  env: out/.env\n").unwrap();
/// assert_eq!(config.input_path(), Path::new(".envx"));
/// assert_eq!(config.env_output_path(), Path::new("out/.env"));
/// assert!(!config.overwrite());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvxConfig {
    /// Path of the `.envx` source file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    /// Overwrite existing output files without prompting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,
    pub output: OutputPaths,
}

impl EnvxConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::Error::IoError) if the file cannot be read,
    /// or [`YamlError`](crate::Error::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Loads `envx.config.yaml` from `dir`, or the default configuration if
    /// no such file exists.
    ///
    /// An empty file yields the default configuration.
    pub fn load_or_default(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if !path.is_file() {
            debug!(path = %path.display(), "no envx config found; using defaults");
            return Ok(Self::default());
        }

        if std::fs::metadata(&path)?.len() == 0 {
            return Ok(Self::default());
        }

        debug!(path = %path.display(), "loading envx config");
        Self::load(path)
    }

    pub fn input_path(&self) -> &Path {
        self.input.as_deref().unwrap_or(Path::new(DEFAULT_INPUT))
    }

    pub fn env_output_path(&self) -> &Path {
        self.output
            .env
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_ENV_OUTPUT))
    }

    pub fn types_output_path(&self) -> &Path {
        self.output
            .types
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_TYPES_OUTPUT))
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite.unwrap_or(false)
    }
}
