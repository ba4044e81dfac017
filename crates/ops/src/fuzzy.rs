use std::cmp::Reverse;

use lookahead_scheduler::{CancelToken, Candidates, Interrupt, Operation};

use crate::scorer;

/// Orders candidates by similarity to a query, most similar first.
///
/// Ties keep their input order.
#[derive(Debug, Clone)]
pub struct FuzzyMatch {
	pub candidates: Candidates,
	pub query: String,
	/// Score substrings of the longer side rather than whole strings.
	pub partial: bool,
	pub scorer: Option<String>,
}

impl Operation for FuzzyMatch {
	fn name(&self) -> &'static str {
		"fuzzy_match"
	}

	fn run(self, token: &CancelToken) -> Result<Candidates, Interrupt> {
		let scorer = scorer::lookup(self.scorer.as_deref())?;
		let mut scored = Vec::with_capacity(self.candidates.len());
		for candidate in self.candidates {
			token.checkpoint()?;
			let score = if self.partial {
				scorer.partial_ratio(&candidate, &self.query)
			} else {
				scorer.ratio(&candidate, &self.query)
			};
			scored.push((score, candidate));
		}

		token.checkpoint()?;
		scored.sort_by_key(|(score, _)| Reverse(*score));
		Ok(scored.into_iter().map(|(_, candidate)| candidate).collect())
	}
}
