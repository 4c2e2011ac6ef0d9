//! Rule compilation and matching for pairrule.
//!
//! This module handles:
//! - Translating filename wildcards into anchored regexes
//! - Compiling rule records into immutable matchers
//! - Decoding paired text on demand in four encodings
//! - Selecting the first rule that fits an audio file and its text

pub mod compiler;
pub mod encoding;
pub mod matcher;
pub mod wildcard;

pub use compiler::{BASEDIR_PLACEHOLDER, CompiledRule};
pub use encoding::{DecodedText, Encoding, decode};
pub use matcher::{
	Candidate, PAIRED_TEXT_EXTENSION, RuleMatch, find_matching_rule, paired_text_path, select_rule,
};
pub use wildcard::{compile_wildcard, wildcard_to_regex};
