use crate::config::types::RawRule;
use crate::error::FieldError;
use crate::rules::encoding::Encoding;
use crate::rules::wildcard::compile_wildcard;
use regex::Regex;

/// Placeholder in a rule's `dir` replaced by the settings' base directory.
pub const BASEDIR_PLACEHOLDER: &str = "%BASEDIR%";

/// A compiled rule ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledRule {
	/// Directory with the base-directory placeholder expanded.
	pub dir: String,

	/// The wildcard pattern as written.
	pub file: String,

	/// Anchored matcher built from `file`.
	pub file_regex: Regex,

	/// Matcher for the paired text, present iff `text` was non-empty.
	pub text_regex: Option<Regex>,

	/// Encoding of the paired text file.
	pub encoding: Encoding,

	/// Layer forwarded to the caller on match.
	pub layer: i64,

	/// Remaining settings keys, forwarded untouched.
	pub extra: toml::Table,
}

impl CompiledRule {
	/// Compile a raw rule. `index` is 1-based and `line` is the rule's
	/// position in the settings source, both for error reporting.
	///
	/// Every invalid field is reported, not just the first.
	pub fn compile(
		raw: &RawRule,
		base_dir: &str,
		index: usize,
		line: Option<usize>,
	) -> Result<Self, Vec<FieldError>> {
		let mut errors = Vec::new();

		let file_regex = compile_wildcard(&raw.file)
			.map_err(|source| {
				errors.push(FieldError::InvalidWildcard {
					rule: index,
					line,
					pattern: raw.file.clone(),
					source,
				})
			})
			.ok();

		let text_regex = if raw.text.is_empty() {
			None
		} else {
			Regex::new(&raw.text)
				.map_err(|source| {
					errors.push(FieldError::InvalidRegex {
						rule: index,
						line,
						pattern: raw.text.clone(),
						source,
					})
				})
				.ok()
		};

		let encoding = raw
			.encoding
			.parse::<Encoding>()
			.map_err(|unknown| {
				errors.push(FieldError::UnknownEncoding {
					rule: index,
					line,
					value: unknown.0,
				})
			})
			.ok();

		match (file_regex, encoding) {
			(Some(file_regex), Some(encoding)) if errors.is_empty() => Ok(CompiledRule {
				dir: raw.dir.replace(BASEDIR_PLACEHOLDER, base_dir),
				file: raw.file.clone(),
				file_regex,
				text_regex,
				encoding,
				layer: raw.layer,
				extra: raw.extra.clone(),
			}),
			_ => Err(errors),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn raw_rule(dir: &str, file: &str, text: &str, encoding: &str) -> RawRule {
		RawRule {
			dir: dir.to_string(),
			file: file.to_string(),
			text: text.to_string(),
			encoding: encoding.to_string(),
			..Default::default()
		}
	}

	#[test]
	fn test_compile_expands_basedir() {
		let raw = raw_rule("%BASEDIR%/voices", "*.wav", "", "utf8");
		let rule = CompiledRule::compile(&raw, "/home/user", 1, None).unwrap();

		assert_eq!(rule.dir, "/home/user/voices");
		assert!(rule.file_regex.is_match("a.wav"));
		assert!(rule.text_regex.is_none());
		assert_eq!(rule.encoding, Encoding::Utf8);
	}

	#[test]
	fn test_compile_text_regex_when_present() {
		let raw = raw_rule("/d", "*.wav", "^Alice", "sjis");
		let rule = CompiledRule::compile(&raw, "", 1, None).unwrap();

		assert!(rule.text_regex.unwrap().is_match("Alice says hi"));
		assert_eq!(rule.encoding, Encoding::ShiftJis);
	}

	#[test]
	fn test_compile_keeps_payload() {
		let mut raw = raw_rule("/d", "*.wav", "", "utf16be");
		raw.layer = 7;
		raw.extra
			.insert("modifier".to_string(), toml::Value::String("pitch".to_string()));
		let rule = CompiledRule::compile(&raw, "", 1, None).unwrap();

		assert_eq!(rule.layer, 7);
		assert_eq!(
			rule.extra.get("modifier").and_then(|v| v.as_str()),
			Some("pitch")
		);
	}

	#[test]
	fn test_unknown_encoding_is_a_compile_error() {
		let raw = raw_rule("/d", "*.wav", "", "latin1");
		let errors = CompiledRule::compile(&raw, "", 4, Some(12)).unwrap_err();

		assert_eq!(errors.len(), 1);
		match &errors[0] {
			FieldError::UnknownEncoding { rule, line, value } => {
				assert_eq!(*rule, 4);
				assert_eq!(*line, Some(12));
				assert_eq!(value, "latin1");
			}
			other => panic!("Expected UnknownEncoding error, got {other:?}"),
		}
	}

	#[test]
	fn test_oversized_wildcard_is_a_compile_error() {
		let pattern = format!("{}?.wav", "あ".repeat(500_000));
		let raw = raw_rule("/d", &pattern, "", "utf8");
		let errors = CompiledRule::compile(&raw, "", 2, Some(9)).unwrap_err();

		assert_eq!(errors.len(), 1);
		match &errors[0] {
			FieldError::InvalidWildcard {
				rule,
				line,
				pattern: reported,
				..
			} => {
				assert_eq!(*rule, 2);
				assert_eq!(*line, Some(9));
				assert_eq!(reported, &pattern);
			}
			other => panic!("Expected InvalidWildcard error, got {other:?}"),
		}
	}

	#[test]
	fn test_every_bad_field_is_reported() {
		let raw = raw_rule("/d", "*.wav", "[unclosed", "");
		let errors = CompiledRule::compile(&raw, "", 1, None).unwrap_err();

		assert_eq!(errors.len(), 2);
		assert!(matches!(errors[0], FieldError::InvalidRegex { .. }));
		assert!(matches!(errors[1], FieldError::UnknownEncoding { .. }));
	}
}
