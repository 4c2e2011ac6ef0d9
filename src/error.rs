use crate::rules::Encoding;
use std::path::PathBuf;

/// Library-level structured errors for pairrule.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum PairRuleError {
	#[error("Failed to read settings file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse settings file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid settings in {path}:{}", format_field_errors(.errors))]
	InvalidSettings { path: PathBuf, errors: Vec<FieldError> },

	#[error("Failed to read paired text file: {path}")]
	PairedFileReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Cannot decode {path} as {encoding}")]
	DecodeError { path: PathBuf, encoding: Encoding },

	#[error("Failed to resolve user config directory")]
	ConfigDirNotFound,
}

/// A single offending field found while validating settings.
///
/// Rule numbers are 1-based in declaration order. Lines are 1-based and
/// omitted when the parser could not attribute the value to a position.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
	#[error("{key}{}: not a number: {value}", at_line(.line))]
	InvalidNumber {
		key: String,
		value: String,
		line: Option<usize>,
	},

	#[error("rule {rule}{}: invalid wildcard in `file`: {pattern}", at_line(.line))]
	InvalidWildcard {
		rule: usize,
		line: Option<usize>,
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("rule {rule}{}: invalid regex in `text`: {pattern}", at_line(.line))]
	InvalidRegex {
		rule: usize,
		line: Option<usize>,
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error(
		"rule {rule}{}: unknown encoding {value:?} (expected utf8, sjis, utf16le or utf16be)",
		at_line(.line)
	)]
	UnknownEncoding {
		rule: usize,
		line: Option<usize>,
		value: String,
	},
}

fn at_line(line: &Option<usize>) -> String {
	match line {
		Some(line) => format!(" (line {line})"),
		None => String::new(),
	}
}

fn format_field_errors(errors: &[FieldError]) -> String {
	errors.iter().map(|e| format!("\n  {e}")).collect()
}

/// Result type alias using PairRuleError.
pub type Result<T> = std::result::Result<T, PairRuleError>;
