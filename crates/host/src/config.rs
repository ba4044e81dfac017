//! Startup configuration, read once from TOML.

use std::path::{Path, PathBuf};

use lookahead_ops::{DEFAULT_MAX_CANDIDATES, engine, scorer};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The configuration file could not be read.
	#[error("I/O error reading {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The configuration file is not valid TOML or has unexpected keys.
	#[error("invalid config {}: {source}", path.display())]
	Parse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	/// The worker pool needs at least one thread.
	#[error("workers must be at least 1")]
	NoWorkers,

	/// A default regex engine name is not registered.
	#[error("unknown regex engine '{0}'")]
	UnknownEngine(String),

	/// The default scorer name is not registered.
	#[error("unknown scorer '{0}'")]
	UnknownScorer(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Size of the worker pool.
	pub workers: usize,
	pub search: SearchConfig,
	pub filter: FilterConfig,
	pub fuzzy: FuzzyConfig,
	pub users: UsersConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
	pub engine: String,
	/// 0 disables the cap.
	pub max_candidates: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
	pub engine: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FuzzyConfig {
	pub scorer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UsersConfig {
	/// passwd-format file to read instead of the system account database.
	pub passwd: Option<PathBuf>,
}

impl Default for Config {
	fn default() -> Self {
		let workers = std::thread::available_parallelism().map_or(4, |n| n.get()).clamp(1, 8);
		Self {
			workers,
			search: SearchConfig::default(),
			filter: FilterConfig::default(),
			fuzzy: FuzzyConfig::default(),
			users: UsersConfig::default(),
		}
	}
}

impl Default for SearchConfig {
	fn default() -> Self {
		Self {
			engine: engine::DEFAULT_ENGINE.to_string(),
			max_candidates: DEFAULT_MAX_CANDIDATES,
		}
	}
}

impl Default for FilterConfig {
	fn default() -> Self {
		Self {
			engine: engine::DEFAULT_ENGINE.to_string(),
		}
	}
}

impl Default for FuzzyConfig {
	fn default() -> Self {
		Self {
			scorer: scorer::DEFAULT_SCORER.to_string(),
		}
	}
}

impl Config {
	/// `<config_dir>/lookahead/config.toml`, if a config dir exists.
	pub fn default_path() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join("lookahead").join("config.toml"))
	}

	/// Loads `path`, or the default location when `None`.
	///
	/// An explicit path must exist; a missing default file yields defaults.
	/// Not validated, so command line overrides can still apply.
	pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
		Ok(match path {
			Some(path) => Self::from_file(path)?,
			None => match Self::default_path() {
				Some(path) if path.exists() => Self::from_file(&path)?,
				_ => Self::default(),
			},
		})
	}

	pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let config = Self::parse(&text).map_err(|source| ConfigError::Parse {
			path: path.to_path_buf(),
			source,
		})?;
		tracing::debug!(path = %path.display(), "config.loaded");
		Ok(config)
	}

	pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
		toml::from_str(text)
	}

	/// Checks values that TOML types alone cannot express.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.workers == 0 {
			return Err(ConfigError::NoWorkers);
		}
		for name in [&self.search.engine, &self.filter.engine] {
			if engine::lookup(Some(name)).is_err() {
				return Err(ConfigError::UnknownEngine(name.clone()));
			}
		}
		if scorer::lookup(Some(&self.fuzzy.scorer)).is_err() {
			return Err(ConfigError::UnknownScorer(self.fuzzy.scorer.clone()));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn empty_file_is_all_defaults() {
		assert_eq!(Config::parse("").expect("valid toml"), Config::default());
	}

	#[test]
	fn partial_sections_keep_remaining_defaults() {
		let config = Config::parse(
			r#"
workers = 3

[search]
max_candidates = 50

[fuzzy]
scorer = "jaro_winkler"
"#,
		)
		.expect("valid toml");

		assert_eq!(config.workers, 3);
		assert_eq!(config.search.max_candidates, 50);
		assert_eq!(config.search.engine, "re");
		assert_eq!(config.fuzzy.scorer, "jaro_winkler");
		config.validate().expect("valid config");
	}

	#[test]
	fn unknown_keys_are_rejected() {
		assert!(Config::parse("wokers = 2").is_err());
	}

	#[test]
	fn zero_workers_fails_validation() {
		let config = Config::parse("workers = 0").expect("valid toml");
		assert!(matches!(config.validate(), Err(ConfigError::NoWorkers)));
	}

	#[test]
	fn unknown_engine_fails_validation() {
		let config = Config::parse("[filter]\nengine = \"pcre\"").expect("valid toml");
		assert!(matches!(config.validate(), Err(ConfigError::UnknownEngine(name)) if name == "pcre"));
	}

	#[test]
	fn explicit_missing_file_is_an_error() {
		let dir = tempfile::tempdir().expect("tempdir");
		let missing = dir.path().join("nope.toml");
		assert!(matches!(Config::load(Some(&missing)), Err(ConfigError::Io { .. })));
	}

	#[test]
	fn loads_from_file() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("config.toml");
		std::fs::write(&path, "workers = 2\n[users]\npasswd = \"/tmp/passwd\"\n").expect("write");

		let config = Config::load(Some(&path)).expect("loads");
		assert_eq!(config.workers, 2);
		assert_eq!(config.users.passwd, Some(PathBuf::from("/tmp/passwd")));
	}

	#[test]
	fn zero_workers_in_file_can_be_overridden() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("config.toml");
		std::fs::write(&path, "workers = 0\n").expect("write");

		let mut config = Config::load(Some(&path)).expect("loads without validating");
		assert!(matches!(config.validate(), Err(ConfigError::NoWorkers)));

		config.workers = 4;
		config.validate().expect("override fixes the pool size");
	}

	#[test]
	fn accounts_default_to_the_system_database() {
		assert_eq!(Config::default().users.passwd, None);
	}
}
