//! Named similarity scorers for fuzzy ordering.
//!
//! Scores range over `0..=100`; higher is more similar.

use crate::error::OpError;

/// Scorer used when a request names none.
pub const DEFAULT_SCORER: &str = "fuzzywuzzy";

pub trait Scorer: Send + Sync {
	/// Whole-string similarity.
	fn ratio(&self, a: &str, b: &str) -> u32;

	/// Best [`Scorer::ratio`] of the shorter string against every equally
	/// long window of the longer one.
	fn partial_ratio(&self, a: &str, b: &str) -> u32 {
		let (short, long) = if a.chars().count() <= b.chars().count() { (a, b) } else { (b, a) };
		let width = short.chars().count();
		if width == 0 {
			return 0;
		}

		let bounds: Vec<usize> = long.char_indices().map(|(i, _)| i).chain(std::iter::once(long.len())).collect();
		let mut best = 0;
		for start in 0..bounds.len() - width {
			let window = &long[bounds[start]..bounds[start + width]];
			best = best.max(self.ratio(short, window));
			if best == 100 {
				break;
			}
		}
		best
	}
}

/// Edit-distance similarity, as popularized by fuzzywuzzy.
struct Levenshtein;

/// Prefix-weighted similarity.
struct JaroWinkler;

static SCORERS: &[(&str, &dyn Scorer)] = &[("fuzzywuzzy", &Levenshtein), ("levenshtein", &Levenshtein), ("jaro_winkler", &JaroWinkler)];

/// Resolves `name`, or the default scorer when `None`.
pub fn lookup(name: Option<&str>) -> Result<&'static dyn Scorer, OpError> {
	let name = name.unwrap_or(DEFAULT_SCORER);
	SCORERS
		.iter()
		.find(|(registered, _)| *registered == name)
		.map(|(_, scorer)| *scorer)
		.ok_or_else(|| OpError::UnknownScorer(name.to_string()))
}

fn percent(similarity: f64) -> u32 {
	(similarity * 100.0).round().clamp(0.0, 100.0) as u32
}

impl Scorer for Levenshtein {
	fn ratio(&self, a: &str, b: &str) -> u32 {
		if a.is_empty() && b.is_empty() {
			return 0;
		}
		percent(strsim::normalized_levenshtein(a, b))
	}
}

impl Scorer for JaroWinkler {
	fn ratio(&self, a: &str, b: &str) -> u32 {
		percent(strsim::jaro_winkler(a, b))
	}
}
