//! Line-oriented `.envx` parser.
//!
//! The parser makes a single pass over the input in one of three modes:
//!
//! - **normal**: `KEY=value` assignments, comments and blank lines;
//! - **schema block**: entered by a `[KEY]` header, every following line is
//!   a `property = value` pair for that key until the next header or EOF;
//! - **multiline**: entered by a value starting with `"""`, raw lines are
//!   captured verbatim until a line ending in `"""`.
//!
//! The parser knows nothing about interpolation or types beyond checking
//! that schema defaults fit their declared type. Every failure is reported
//! with the 1-based line it occurred on.
//!
//! The primary entry point is [`parse`]; most consumers should go through
//! [`load_from_string`](crate::load_from_string) instead.

mod line;
mod schema;

use envx_core::{EnvValue, EnvxError, RawEntry, Schema};
use serde::Serialize;
use tracing::debug;

use self::line::{TRIPLE_QUOTE, split_key_value, strip_quotes};
use self::schema::{apply_schema_property, is_schema_header, open_schema_block};

type Result<T> = std::result::Result<T, EnvxError>;

/// Output of [`parse`]: assignments in file order plus declared schema blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedEnvx {
    pub entries: Vec<RawEntry>,
    pub schema: Schema,
}

/// Parses `.envx` content into raw entries and a schema.
///
/// # Examples
///
/// ```
/// use envx_core::{EnvType, EnvValue};
/// use envx_engine::parse;
///
/// let parsed = parse("API_KEY=\"abc123\"\n\n[API_KEY]\ntype = string\nrequired = true\n").unwrap();
/// assert_eq!(parsed.entries[0].key, "API_KEY");
/// assert_eq!(parsed.entries[0].value, EnvValue::from("abc123"));
/// assert_eq!(parsed.schema["API_KEY"].env_type, Some(EnvType::String));
/// assert!(parsed.schema["API_KEY"].required);
/// ```
pub fn parse(content: &str) -> Result<ParsedEnvx> {
    let mut parser = EnvxParser::default();
    for (idx, raw_line) in content.lines().enumerate() {
        parser.feed(idx + 1, raw_line)?;
    }
    parser.finish()
}

#[derive(Debug, Default)]
enum Mode {
    #[default]
    Normal,
    SchemaBlock(String),
    Multiline(MultilineCapture),
}

#[derive(Debug)]
struct MultilineCapture {
    key: String,
    line: usize,
    buffer: Vec<String>,
}

impl MultilineCapture {
    /// Starts a capture; `rest` is whatever followed the opening `"""`.
    fn open(key: String, line: usize, rest: &str) -> (Self, bool) {
        let mut capture = Self {
            key,
            line,
            buffer: Vec::new(),
        };
        let closed = !rest.is_empty() && capture.feed(rest);
        (capture, closed)
    }

    /// Appends one raw line; returns `true` once the closing `"""` is seen.
    fn feed(&mut self, raw_line: &str) -> bool {
        if let Some(prefix) = raw_line.trim().strip_suffix(TRIPLE_QUOTE) {
            if !prefix.trim().is_empty() {
                self.buffer.push(prefix.to_string());
            }
            return true;
        }
        self.buffer.push(raw_line.to_string());
        false
    }

    fn into_entry(self) -> RawEntry {
        RawEntry::new(self.key, self.buffer.join("\n"))
    }
}

#[derive(Debug, Default)]
struct EnvxParser {
    entries: Vec<RawEntry>,
    schema: Schema,
    mode: Mode,
}

impl EnvxParser {
    fn feed(&mut self, line_no: usize, raw_line: &str) -> Result<()> {
        if let Mode::Multiline(capture) = &mut self.mode {
            if capture.feed(raw_line) {
                if let Mode::Multiline(capture) = std::mem::take(&mut self.mode) {
                    self.entries.push(capture.into_entry());
                }
            }
            return Ok(());
        }

        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        if is_schema_header(line) {
            let key = open_schema_block(line, line_no, &mut self.schema)?;
            debug!(key = %key, line = line_no, "opened schema block");
            self.mode = Mode::SchemaBlock(key);
            return Ok(());
        }

        if let Mode::SchemaBlock(key) = &self.mode {
            let target = self.schema.entry(key.clone()).or_default();
            return apply_schema_property(line, line_no, target);
        }

        self.parse_assignment(line_no, line)
    }

    fn parse_assignment(&mut self, line_no: usize, line: &str) -> Result<()> {
        let (raw_key, raw_value) = split_key_value(line, line_no)?;
        let key = raw_key.trim();
        if key.is_empty() {
            return Err(EnvxError::syntax(line_no, "variable name cannot be empty"));
        }

        let value = raw_value.trim();
        if let Some(rest) = value.strip_prefix(TRIPLE_QUOTE) {
            let (capture, closed) = MultilineCapture::open(key.to_string(), line_no, rest);
            if closed {
                self.entries.push(capture.into_entry());
            } else {
                self.mode = Mode::Multiline(capture);
            }
            return Ok(());
        }

        self.entries
            .push(RawEntry::new(key, EnvValue::from(strip_quotes(value))));
        Ok(())
    }

    fn finish(self) -> Result<ParsedEnvx> {
        if let Mode::Multiline(capture) = self.mode {
            return Err(EnvxError::syntax(
                capture.line,
                format!("unterminated multiline value for \"{}\"", capture.key),
            ));
        }

        debug!(
            entries = self.entries.len(),
            schema_blocks = self.schema.len(),
            "parsed envx content"
        );

        Ok(ParsedEnvx {
            entries: self.entries,
            schema: self.schema,
        })
    }
}
