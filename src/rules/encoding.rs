use std::fmt;
use std::str::FromStr;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text encodings a rule can declare for its paired text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
	Utf8,
	ShiftJis,
	Utf16Le,
	Utf16Be,
}

impl Encoding {
	/// All supported encodings, in slot order.
	pub const ALL: [Encoding; 4] = [
		Encoding::Utf8,
		Encoding::ShiftJis,
		Encoding::Utf16Le,
		Encoding::Utf16Be,
	];

	/// The name used for this encoding in settings files.
	pub fn as_str(&self) -> &'static str {
		match self {
			Encoding::Utf8 => "utf8",
			Encoding::ShiftJis => "sjis",
			Encoding::Utf16Le => "utf16le",
			Encoding::Utf16Be => "utf16be",
		}
	}

	fn slot(self) -> usize {
		match self {
			Encoding::Utf8 => 0,
			Encoding::ShiftJis => 1,
			Encoding::Utf16Le => 2,
			Encoding::Utf16Be => 3,
		}
	}
}

impl fmt::Display for Encoding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Returned when a settings value names no supported encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEncoding(pub String);

impl FromStr for Encoding {
	type Err = UnknownEncoding;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Encoding::ALL
			.into_iter()
			.find(|e| e.as_str() == s)
			.ok_or_else(|| UnknownEncoding(s.to_string()))
	}
}

/// Strip a leading UTF-8 byte-order mark, if present.
pub fn strip_utf8_bom(raw: &[u8]) -> &[u8] {
	raw.strip_prefix(UTF8_BOM).unwrap_or(raw)
}

/// Decode `raw` under `encoding`. Returns `None` on malformed input.
///
/// UTF-8 is never rejected: invalid sequences become U+FFFD. The UTF-16
/// variants honour a leading BOM of either byte order and fall back to
/// their own order otherwise.
pub fn decode(raw: &[u8], encoding: Encoding) -> Option<String> {
	match encoding {
		Encoding::Utf8 => Some(String::from_utf8_lossy(strip_utf8_bom(raw)).into_owned()),
		Encoding::ShiftJis => decode_strict(encoding_rs::SHIFT_JIS, raw),
		Encoding::Utf16Le => decode_utf16(raw, encoding_rs::UTF_16LE),
		Encoding::Utf16Be => decode_utf16(raw, encoding_rs::UTF_16BE),
	}
}

fn decode_utf16(raw: &[u8], default: &'static encoding_rs::Encoding) -> Option<String> {
	match encoding_rs::Encoding::for_bom(raw) {
		Some((sniffed, bom_len))
			if sniffed == encoding_rs::UTF_16LE || sniffed == encoding_rs::UTF_16BE =>
		{
			decode_strict(sniffed, &raw[bom_len..])
		}
		_ => decode_strict(default, raw),
	}
}

fn decode_strict(encoding: &'static encoding_rs::Encoding, raw: &[u8]) -> Option<String> {
	encoding
		.decode_without_bom_handling_and_without_replacement(raw)
		.map(|text| text.into_owned())
}

#[derive(Debug, Default)]
enum Slot {
	#[default]
	Pending,
	Decoded(String),
	Failed,
}

/// Lazily decoded views of one paired text file.
///
/// Each encoding is decoded at most once; failures are remembered so they
/// are not retried. One instance serves a single matching call.
#[derive(Debug)]
pub struct DecodedText<'a> {
	raw: &'a [u8],
	slots: [Slot; 4],
	decodes: usize,
}

impl<'a> DecodedText<'a> {
	pub fn new(raw: &'a [u8]) -> Self {
		DecodedText {
			raw,
			slots: Default::default(),
			decodes: 0,
		}
	}

	/// The text under `encoding`, decoding on first request.
	pub fn get(&mut self, encoding: Encoding) -> Option<&str> {
		let slot = &mut self.slots[encoding.slot()];
		if let Slot::Pending = slot {
			self.decodes += 1;
			*slot = match decode(self.raw, encoding) {
				Some(text) => Slot::Decoded(text),
				None => Slot::Failed,
			};
		}
		match slot {
			Slot::Decoded(text) => Some(text.as_str()),
			_ => None,
		}
	}

	/// Take ownership of the text under `encoding`, decoding if needed.
	///
	/// The slot is left pending, so a later request decodes again.
	pub fn take(&mut self, encoding: Encoding) -> Option<String> {
		self.get(encoding)?;
		match std::mem::take(&mut self.slots[encoding.slot()]) {
			Slot::Decoded(text) => Some(text),
			_ => None,
		}
	}

	/// Number of decode attempts made so far.
	pub fn decode_count(&self) -> usize {
		self.decodes
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_encoding_names_round_trip() {
		for encoding in Encoding::ALL {
			assert_eq!(encoding.as_str().parse::<Encoding>(), Ok(encoding));
		}
		assert_eq!(
			"shift_jis".parse::<Encoding>(),
			Err(UnknownEncoding("shift_jis".to_string()))
		);
		assert!("".parse::<Encoding>().is_err());
	}

	#[test]
	fn test_utf8_bom_is_stripped() {
		let with_bom = b"\xEF\xBB\xBFhello";
		assert_eq!(decode(with_bom, Encoding::Utf8), decode(b"hello", Encoding::Utf8));
		assert_eq!(decode(with_bom, Encoding::Utf8).as_deref(), Some("hello"));
	}

	#[test]
	fn test_utf8_never_fails() {
		assert_eq!(decode(b"a\xFFb", Encoding::Utf8).as_deref(), Some("a\u{FFFD}b"));
	}

	#[test]
	fn test_shift_jis() {
		// "あいう" in Shift_JIS
		let raw = b"\x82\xA0\x82\xA2\x82\xA4";
		assert_eq!(decode(raw, Encoding::ShiftJis).as_deref(), Some("あいう"));
		assert_eq!(decode(b"\xFF", Encoding::ShiftJis), None);
		assert_eq!(decode(b"abc\x82", Encoding::ShiftJis), None);
	}

	#[test]
	fn test_utf16_default_byte_order() {
		assert_eq!(decode(b"h\0i\0", Encoding::Utf16Le).as_deref(), Some("hi"));
		assert_eq!(decode(b"\0h\0i", Encoding::Utf16Be).as_deref(), Some("hi"));
	}

	#[test]
	fn test_utf16_bom_is_optional_and_selects_order() {
		assert_eq!(decode(b"\xFF\xFEh\0i\0", Encoding::Utf16Le).as_deref(), Some("hi"));
		assert_eq!(decode(b"\xFE\xFF\0h\0i", Encoding::Utf16Be).as_deref(), Some("hi"));
		// A BOM overrides the variant's default order.
		assert_eq!(decode(b"\xFE\xFF\0h\0i", Encoding::Utf16Le).as_deref(), Some("hi"));
	}

	#[test]
	fn test_utf16_malformed() {
		assert_eq!(decode(b"h\0i", Encoding::Utf16Le), None);
		// Unpaired high surrogate
		assert_eq!(decode(b"\x00\xD8", Encoding::Utf16Le), None);
	}

	#[test]
	fn test_decoded_text_memoizes_success_and_failure() {
		let raw = b"\xFF";
		let mut text = DecodedText::new(raw);

		assert!(text.get(Encoding::ShiftJis).is_none());
		assert!(text.get(Encoding::ShiftJis).is_none());
		assert_eq!(text.decode_count(), 1);

		assert_eq!(text.get(Encoding::Utf8), Some("\u{FFFD}"));
		assert_eq!(text.get(Encoding::Utf8), Some("\u{FFFD}"));
		assert_eq!(text.decode_count(), 2);
	}

	#[test]
	fn test_take_returns_owned_text() {
		let mut text = DecodedText::new(b"abc");
		assert_eq!(text.take(Encoding::Utf8), Some("abc".to_string()));
		assert_eq!(text.decode_count(), 1);

		let mut text = DecodedText::new(b"\xFF");
		assert_eq!(text.take(Encoding::ShiftJis), None);
	}
}
