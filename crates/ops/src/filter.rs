use lookahead_scheduler::{CancelToken, Candidates, Interrupt, Operation};

use crate::engine;

/// Keeps candidates matched by a regex, in input order.
#[derive(Debug, Clone)]
pub struct Filter {
	pub pattern: String,
	pub candidates: Candidates,
	pub engine: Option<String>,
	/// Match against the last path component instead of the whole candidate.
	pub compare_basename: bool,
}

impl Operation for Filter {
	fn name(&self) -> &'static str {
		"filter"
	}

	fn run(self, token: &CancelToken) -> Result<Candidates, Interrupt> {
		let pattern = engine::lookup(self.engine.as_deref())?.compile(&self.pattern)?;
		let mut kept = Vec::new();
		for candidate in self.candidates {
			token.checkpoint()?;
			let subject = if self.compare_basename { basename(&candidate) } else { &candidate };
			if pattern.is_match(subject)? {
				kept.push(candidate);
			}
		}
		Ok(kept)
	}
}

/// Final path component, ignoring one trailing separator (`"src/bin/"` → `"bin"`).
pub(crate) fn basename(path: &str) -> &str {
	let trimmed = path.strip_suffix(['/', std::path::MAIN_SEPARATOR]).unwrap_or(path);
	trimmed.rsplit(['/', std::path::MAIN_SEPARATOR]).next().unwrap_or(trimmed)
}
