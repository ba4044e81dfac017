use std::collections::HashSet;

use lookahead_scheduler::{CancelToken, Candidates, Interrupt, Operation};

use crate::engine;

/// Candidate cap applied when a request does not set one.
pub const DEFAULT_MAX_CANDIDATES: usize = 300;

/// Collects distinct regex matches from a buffer, starting at the cursor line.
#[derive(Debug, Clone)]
pub struct Search {
	pub pattern: String,
	pub engine: Option<String>,
	/// Stop after this many distinct matches; 0 means unlimited.
	pub max_candidates: usize,
	pub lines: Vec<String>,
	/// Zero-based line the scan starts from; wraps around to the top.
	pub cursor_line: usize,
}

impl Operation for Search {
	fn name(&self) -> &'static str {
		"search"
	}

	fn run(self, token: &CancelToken) -> Result<Candidates, Interrupt> {
		let pattern = engine::lookup(self.engine.as_deref())?.compile(&self.pattern)?;
		let start = self.cursor_line.min(self.lines.len());
		let (above, below) = self.lines.split_at(start);

		let mut seen = HashSet::new();
		let mut candidates = Vec::new();
		for line in below.iter().chain(above) {
			token.checkpoint()?;
			for found in pattern.find_iter(line) {
				token.checkpoint()?;
				let found = found?;
				if found.is_empty() || !seen.insert(found) {
					continue;
				}
				candidates.push(found.to_string());
				if self.max_candidates > 0 && candidates.len() >= self.max_candidates {
					return Ok(candidates);
				}
			}
		}
		Ok(candidates)
	}
}
