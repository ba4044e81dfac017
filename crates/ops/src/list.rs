use std::collections::HashSet;

use lookahead_scheduler::{CancelToken, Candidates, Interrupt, Operation};

/// Keeps the first occurrence of every candidate, in input order.
#[derive(Debug, Clone)]
pub struct Uniq {
	pub candidates: Candidates,
}

impl Operation for Uniq {
	fn name(&self) -> &'static str {
		"uniq"
	}

	fn run(self, token: &CancelToken) -> Result<Candidates, Interrupt> {
		let mut candidates = self.candidates;
		let mut keep = Vec::with_capacity(candidates.len());
		let mut seen = HashSet::with_capacity(candidates.len());
		for candidate in &candidates {
			token.checkpoint()?;
			keep.push(seen.insert(candidate.as_str()));
		}
		drop(seen);

		let mut keep = keep.into_iter();
		candidates.retain(|_| keep.next().unwrap_or(false));
		Ok(candidates)
	}
}

/// Sorts candidates ascending by byte order (stable).
#[derive(Debug, Clone)]
pub struct Sort {
	pub candidates: Candidates,
}

impl Operation for Sort {
	fn name(&self) -> &'static str {
		"sort"
	}

	fn run(self, token: &CancelToken) -> Result<Candidates, Interrupt> {
		token.checkpoint()?;
		let mut candidates = self.candidates;
		candidates.sort();
		token.checkpoint()?;
		Ok(candidates)
	}
}
