//! Named regex engines.
//!
//! Hosts pick an engine per request. `re` (the default) and `fancy_regex`
//! support backreferences and lookaround; `regex` is the linear-time engine.

use std::ops::Range;

use crate::error::OpError;

/// Engine used when a request names none.
pub const DEFAULT_ENGINE: &str = "re";

/// A regex implementation that can compile patterns.
pub trait RegexEngine: Send + Sync {
	fn compile(&self, pattern: &str) -> Result<Box<dyn Pattern>, OpError>;
}

/// A compiled pattern.
pub trait Pattern: Send + Sync {
	/// Non-overlapping matches in `text`, left to right.
	fn find_iter<'t>(&'t self, text: &'t str) -> Box<dyn Iterator<Item = Result<&'t str, OpError>> + 't>;

	/// True if the pattern matches anywhere in `text`.
	fn is_match(&self, text: &str) -> Result<bool, OpError>;

	/// Byte ranges of capture groups 1.. of the leftmost match, `None` for
	/// groups that did not participate. `None` overall when nothing matches.
	fn first_captures(&self, text: &str) -> Result<Option<Vec<Option<Range<usize>>>>, OpError>;
}

struct FancyEngine;
struct LinearEngine;

static ENGINES: &[(&str, &dyn RegexEngine)] = &[("re", &FancyEngine), ("fancy_regex", &FancyEngine), ("regex", &LinearEngine)];

/// Resolves `name`, or the default engine when `None`.
pub fn lookup(name: Option<&str>) -> Result<&'static dyn RegexEngine, OpError> {
	let name = name.unwrap_or(DEFAULT_ENGINE);
	ENGINES
		.iter()
		.find(|(registered, _)| *registered == name)
		.map(|(_, engine)| *engine)
		.ok_or_else(|| OpError::UnknownEngine(name.to_string()))
}

/// Names accepted by [`lookup`].
pub fn names() -> impl Iterator<Item = &'static str> {
	ENGINES.iter().map(|(name, _)| *name)
}

impl RegexEngine for FancyEngine {
	fn compile(&self, pattern: &str) -> Result<Box<dyn Pattern>, OpError> {
		Ok(Box::new(fancy_regex::Regex::new(pattern)?))
	}
}

impl Pattern for fancy_regex::Regex {
	fn find_iter<'t>(&'t self, text: &'t str) -> Box<dyn Iterator<Item = Result<&'t str, OpError>> + 't> {
		Box::new(fancy_regex::Regex::find_iter(self, text).map(|found| found.map(|m| m.as_str()).map_err(OpError::from)))
	}

	fn is_match(&self, text: &str) -> Result<bool, OpError> {
		Ok(fancy_regex::Regex::is_match(self, text)?)
	}

	fn first_captures(&self, text: &str) -> Result<Option<Vec<Option<Range<usize>>>>, OpError> {
		let Some(caps) = self.captures(text)? else {
			return Ok(None);
		};
		Ok(Some((1..caps.len()).map(|i| caps.get(i).map(|m| m.range())).collect()))
	}
}

impl RegexEngine for LinearEngine {
	fn compile(&self, pattern: &str) -> Result<Box<dyn Pattern>, OpError> {
		Ok(Box::new(regex::Regex::new(pattern)?))
	}
}

impl Pattern for regex::Regex {
	fn find_iter<'t>(&'t self, text: &'t str) -> Box<dyn Iterator<Item = Result<&'t str, OpError>> + 't> {
		Box::new(regex::Regex::find_iter(self, text).map(|m| Ok(m.as_str())))
	}

	fn is_match(&self, text: &str) -> Result<bool, OpError> {
		Ok(regex::Regex::is_match(self, text))
	}

	fn first_captures(&self, text: &str) -> Result<Option<Vec<Option<Range<usize>>>>, OpError> {
		let Some(caps) = self.captures(text) else {
			return Ok(None);
		};
		Ok(Some((1..caps.len()).map(|i| caps.get(i).map(|m| m.range())).collect()))
	}
}
