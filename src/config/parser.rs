use crate::config::types::{RawNumber, RawSettings};
use crate::config::Settings;
use crate::error::{FieldError, PairRuleError, Result};
use crate::rules::CompiledRule;
use crate::rules::encoding::strip_utf8_bom;
use std::path::Path;
use toml::Spanned;
use tracing::debug;

/// Default for `delta` when the key is absent.
pub const DEFAULT_DELTA: f64 = 15.0;

/// Default for `freshness` when the key is absent.
pub const DEFAULT_FRESHNESS: f64 = 5.0;

/// Load and compile a settings file from the given path.
pub fn parse_settings_file(path: &Path) -> Result<Settings> {
	let bytes = std::fs::read(path).map_err(|source| PairRuleError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})?;
	let content = String::from_utf8(strip_utf8_bom(&bytes).to_vec()).map_err(|e| {
		PairRuleError::ConfigReadError {
			path: path.to_path_buf(),
			source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
		}
	})?;

	parse_settings_str(&content, path)
}

/// Load and compile settings from a string (useful for testing).
///
/// All invalid fields are collected before failing, so one error lists
/// everything that needs fixing. No partial rule set is ever returned.
pub fn parse_settings_str(content: &str, path: &Path) -> Result<Settings> {
	let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
	let raw: RawSettings =
		toml::from_str(content).map_err(|source| PairRuleError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		})?;

	let mut errors = Vec::new();

	let delta = resolve_number(content, "delta", raw.delta.as_ref(), DEFAULT_DELTA)
		.unwrap_or_else(|e| {
			errors.push(e);
			DEFAULT_DELTA
		});
	let freshness = resolve_number(content, "freshness", raw.freshness.as_ref(), DEFAULT_FRESHNESS)
		.unwrap_or_else(|e| {
			errors.push(e);
			DEFAULT_FRESHNESS
		});

	let mut rules = Vec::with_capacity(raw.rule.len());
	for (i, spanned) in raw.rule.iter().enumerate() {
		let line = line_of(content, spanned.span().start);
		match CompiledRule::compile(spanned.get_ref(), &raw.basedir, i + 1, Some(line)) {
			Ok(rule) => rules.push(rule),
			Err(rule_errors) => errors.extend(rule_errors),
		}
	}

	if !errors.is_empty() {
		return Err(PairRuleError::InvalidSettings {
			path: path.to_path_buf(),
			errors,
		});
	}

	debug!(path = %path.display(), rules = rules.len(), "settings loaded");

	Ok(Settings {
		base_dir: raw.basedir,
		delta,
		freshness,
		rules,
	})
}

fn resolve_number(
	content: &str,
	key: &str,
	value: Option<&Spanned<RawNumber>>,
	default: f64,
) -> std::result::Result<f64, FieldError> {
	let Some(value) = value else {
		return Ok(default);
	};
	let invalid = |rendered: String| FieldError::InvalidNumber {
		key: key.to_string(),
		value: rendered,
		line: Some(line_of(content, value.span().start)),
	};
	match value.get_ref() {
		RawNumber::Number(n) => Ok(*n),
		RawNumber::Text(s) => s.trim().parse().map_err(|_| invalid(s.clone())),
		RawNumber::Other(other) => Err(invalid(other.to_string())),
	}
}

/// 1-based line number of a byte offset.
fn line_of(content: &str, offset: usize) -> usize {
	let offset = offset.min(content.len());
	content.as_bytes()[..offset]
		.iter()
		.filter(|&&b| b == b'\n')
		.count()
		+ 1
}
