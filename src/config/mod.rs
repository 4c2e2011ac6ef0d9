//! Settings loading for pairrule.
//!
//! This module handles:
//! - TOML settings file parsing (BOM tolerant)
//! - Numeric defaults and base-directory expansion
//! - Compiling every rule up front, failing on any invalid field
//! - Swapping in a freshly loaded rule set on reload

pub mod parser;
pub mod types;

pub use parser::{DEFAULT_DELTA, DEFAULT_FRESHNESS, parse_settings_file, parse_settings_str};
pub use types::{RawNumber, RawRule, RawSettings};

use crate::error::{PairRuleError, Result};
use crate::rules::{CompiledRule, RuleMatch, find_matching_rule};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Settings file name inside the per-user config directory.
pub const SETTINGS_FILE_NAME: &str = "setting.toml";

/// Validated settings with every rule compiled. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Settings {
	/// Expanded into each rule's `dir` at load time.
	pub base_dir: String,

	/// Pairing window in seconds, for the file watcher.
	pub delta: f64,

	/// Freshness window in seconds, for the file watcher.
	pub freshness: f64,

	/// Compiled rules in declaration order.
	pub rules: Vec<CompiledRule>,
}

impl Settings {
	/// Find the first rule that applies to `audio_path`.
	pub fn find(&self, audio_path: &Path, verbose: bool) -> Result<Option<RuleMatch<'_>>> {
		find_matching_rule(&self.rules, audio_path, verbose)
	}

	/// Distinct rule directories, sorted. These are the directories to watch.
	pub fn dirs(&self) -> Vec<&str> {
		let mut dirs: Vec<&str> = self.rules.iter().map(|r| r.dir.as_str()).collect();
		dirs.sort_unstable();
		dirs.dedup();
		dirs
	}
}

/// Load settings from `path`.
pub fn load_settings(path: &Path) -> Result<Settings> {
	parse_settings_file(path)
}

/// Get the default settings path in the user's config directory.
pub fn default_settings_path() -> Result<PathBuf> {
	let config_dir = dirs::config_dir().ok_or(PairRuleError::ConfigDirNotFound)?;
	Ok(config_dir.join("pairrule").join(SETTINGS_FILE_NAME))
}

/// Shared handle to the current settings.
///
/// Readers take an `Arc` snapshot and match against it; `reload` builds a
/// complete new set first and only then replaces the old one, so a reader
/// never sees a half-loaded rule list.
#[derive(Debug, Clone)]
pub struct SettingsHandle {
	path: PathBuf,
	current: Arc<RwLock<Arc<Settings>>>,
}

impl SettingsHandle {
	/// Load settings from `path` and wrap them in a handle.
	pub fn open(path: &Path) -> Result<Self> {
		let settings = load_settings(path)?;
		Ok(SettingsHandle {
			path: path.to_path_buf(),
			current: Arc::new(RwLock::new(Arc::new(settings))),
		})
	}

	/// The settings file this handle reloads from.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Snapshot of the current settings.
	pub fn current(&self) -> Arc<Settings> {
		self.current
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	/// Reload from disk. On error the previous settings stay in place.
	pub fn reload(&self) -> Result<Arc<Settings>> {
		let fresh = Arc::new(load_settings(&self.path)?);
		*self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&fresh);
		Ok(fresh)
	}
}
