//! pairrule - rule matching engine for paired audio/text artifacts.
//!
//! A recorder drops `name.wav` next to `name.txt`. Given the audio path,
//! pairrule picks the first rule from an ordered settings file whose
//! directory, filename wildcard and optional text regex all fit, and hands
//! back the rule together with the paired text decoded in the rule's
//! encoding.
//!
//! This library provides:
//! - Settings file parsing with positional error reporting
//! - Wildcard and regex compilation for rules
//! - Memoized decoding of the paired text (UTF-8, Shift_JIS, UTF-16LE/BE)
//! - First-match-wins rule selection
//!
//! # Example
//!
//! ```no_run
//! use pairrule::config::load_settings;
//! use std::path::Path;
//!
//! let settings = load_settings(Path::new("setting.toml")).unwrap();
//!
//! if let Some(found) = settings.find(Path::new("/voices/001_Alice_happy.wav"), false).unwrap() {
//!     println!("layer {} ({}): {}", found.layer(), found.encoding(), found.text());
//! }
//! ```

pub mod config;
pub mod error;
pub mod rules;

pub use error::{FieldError, PairRuleError, Result};
