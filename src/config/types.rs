use serde::Deserialize;
use toml::Spanned;

/// Top-level settings from a `setting.toml` file, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSettings {
	/// Substituted for `%BASEDIR%` in every rule's `dir`.
	#[serde(default)]
	pub basedir: String,

	/// Maximum gap in seconds between an audio file and its text file.
	pub delta: Option<Spanned<RawNumber>>,

	/// How recent in seconds a pair must be to be considered.
	pub freshness: Option<Spanned<RawNumber>>,

	/// Rules in declaration order. First matching rule wins.
	#[serde(default)]
	pub rule: Vec<Spanned<RawRule>>,
}

/// A numeric setting as written: a TOML number or a string holding one.
/// Any other value is kept so validation can report it with its line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
	Number(f64),
	Text(String),
	Other(toml::Value),
}

/// A rule for matching an audio file and its paired text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRule {
	/// Directory containing the audio file. May embed `%BASEDIR%`.
	#[serde(default)]
	pub dir: String,

	/// Wildcard pattern for the audio filename.
	#[serde(default)]
	pub file: String,

	/// Regex searched in the paired text. Empty disables the text filter.
	#[serde(default)]
	pub text: String,

	/// Encoding of the paired text: `utf8`, `sjis`, `utf16le` or `utf16be`.
	#[serde(default)]
	pub encoding: String,

	/// Layer handed back to the caller on match.
	#[serde(default)]
	pub layer: i64,

	/// Any other keys, handed back to the caller untouched.
	#[serde(flatten)]
	pub extra: toml::Table,
}
