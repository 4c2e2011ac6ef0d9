use regex::Regex;

/// Translate a wildcard pattern into an anchored regex source string.
///
/// `*` matches any run of characters except path separators (non-greedy),
/// `?` matches exactly one such character. Everything else is literal.
pub fn wildcard_to_regex(pattern: &str) -> String {
	let mut out = String::with_capacity(pattern.len() + 16);
	out.push('^');

	let mut literal_start = 0;
	for (i, c) in pattern.char_indices() {
		let replacement = match c {
			'*' => r"[^/\\]*?",
			'?' => r"[^/\\]",
			_ => continue,
		};
		out.push_str(&regex::escape(&pattern[literal_start..i]));
		out.push_str(replacement);
		literal_start = i + c.len_utf8();
	}
	out.push_str(&regex::escape(&pattern[literal_start..]));

	out.push('$');
	out
}

/// Compile a wildcard pattern into a full-string matcher.
pub fn compile_wildcard(pattern: &str) -> Result<Regex, regex::Error> {
	Regex::new(&wildcard_to_regex(pattern))
}
