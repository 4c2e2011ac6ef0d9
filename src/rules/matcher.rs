use crate::error::{PairRuleError, Result};
use crate::rules::compiler::CompiledRule;
use crate::rules::encoding::{DecodedText, Encoding};
use std::path::{Path, PathBuf};
use tracing::info;

/// Extension of the text file paired with each audio file.
pub const PAIRED_TEXT_EXTENSION: &str = "txt";

/// The rule selected for a candidate, with its paired text decoded in the
/// rule's encoding.
#[derive(Debug)]
pub struct RuleMatch<'a> {
	/// Position of the rule in the rule list (0-based).
	pub index: usize,

	/// The winning rule.
	pub rule: &'a CompiledRule,

	/// Paired text decoded under `rule.encoding`.
	pub text: String,
}

impl RuleMatch<'_> {
	pub fn file(&self) -> &str {
		&self.rule.file
	}

	pub fn encoding(&self) -> Encoding {
		self.rule.encoding
	}

	pub fn layer(&self) -> i64 {
		self.rule.layer
	}

	pub fn text(&self) -> &str {
		&self.text
	}
}

/// The candidate path split the way rules look at it.
#[derive(Debug)]
pub struct Candidate<'a> {
	/// Containing directory, compared verbatim against rule directories.
	pub dir: &'a str,

	/// Base filename, tested against rule wildcards.
	pub file_name: &'a str,
}

/// Path of the text file paired with `audio_path`.
///
/// Only a real extension is replaced. A dot-file such as `.wav` has no
/// extension, so it pairs with `.wav.txt`.
pub fn paired_text_path(audio_path: &Path) -> PathBuf {
	audio_path.with_extension(PAIRED_TEXT_EXTENSION)
}

/// Find the first rule that applies to `audio_path`.
///
/// The paired text file is read once before any rule is tried; failure to
/// read it is an error regardless of the rules. Returns `Ok(None)` when no
/// rule applies.
pub fn find_matching_rule<'a>(
	rules: &'a [CompiledRule],
	audio_path: &Path,
	verbose: bool,
) -> Result<Option<RuleMatch<'a>>> {
	let text_path = paired_text_path(audio_path);
	let raw = std::fs::read(&text_path).map_err(|source| PairRuleError::PairedFileReadError {
		path: text_path.clone(),
		source,
	})?;

	let dir = match audio_path.parent().map(|p| p.to_string_lossy()) {
		Some(dir) if !dir.is_empty() => dir,
		_ => ".".into(),
	};
	let file_name = audio_path
		.file_name()
		.map(|name| name.to_string_lossy())
		.unwrap_or_default();
	let candidate = Candidate {
		dir: &dir,
		file_name: &file_name,
	};

	let mut text = DecodedText::new(&raw);
	select_rule(rules, &candidate, &mut text, verbose).map_err(|encoding| {
		PairRuleError::DecodeError {
			path: text_path,
			encoding,
		}
	})
}

/// Scan `rules` in order and return the first that passes every filter.
///
/// A decode failure while testing a rule's text filter just skips that rule.
/// Once a rule has won, its encoding must decode; otherwise the encoding is
/// returned as the error.
pub fn select_rule<'a>(
	rules: &'a [CompiledRule],
	candidate: &Candidate<'_>,
	text: &mut DecodedText<'_>,
	verbose: bool,
) -> std::result::Result<Option<RuleMatch<'a>>, Encoding> {
	for (index, rule) in rules.iter().enumerate() {
		if verbose {
			info!(rule = index, "checking rule");
		}

		if candidate.dir != rule.dir {
			if verbose {
				info!(want = %rule.dir, got = %candidate.dir, "directory does not match");
			}
			continue;
		}

		if !rule.file_regex.is_match(candidate.file_name) {
			if verbose {
				info!(
					filename = %candidate.file_name,
					regex = %rule.file_regex,
					"filename does not match wildcard"
				);
			}
			continue;
		}

		if let Some(ref text_regex) = rule.text_regex {
			let Some(decoded) = text.get(rule.encoding) else {
				if verbose {
					info!(encoding = %rule.encoding, "paired text cannot be decoded");
				}
				continue;
			};
			if !text_regex.is_match(decoded) {
				if verbose {
					info!(regex = %text_regex, "paired text does not match regex");
				}
				continue;
			}
		}

		if verbose {
			info!(rule = index, "rule matched");
		}
		return match text.take(rule.encoding) {
			Some(text) => Ok(Some(RuleMatch { index, rule, text })),
			None => Err(rule.encoding),
		};
	}

	Ok(None)
}
