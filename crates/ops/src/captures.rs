use crate::engine;
use crate::error::OpError;

/// Byte spans of the capture groups in the first match of `pattern`.
///
/// Each span is `[start, end]` with `end` inclusive, in UTF-8 bytes. Groups
/// that did not participate or matched empty are skipped. No match, or a
/// pattern without groups, yields an empty list.
pub fn extract_captures(pattern: &str, text: &str, engine: Option<&str>) -> Result<Vec<[usize; 2]>, OpError> {
	let pattern = engine::lookup(engine)?.compile(pattern)?;
	let Some(groups) = pattern.first_captures(text)? else {
		return Ok(Vec::new());
	};
	Ok(groups
		.into_iter()
		.flatten()
		.filter(|span| !span.is_empty())
		.map(|span| [span.start, span.end - 1])
		.collect())
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case::two_groups("(ab)(cd)", "xxabcdyy", vec![[2, 3], [4, 5]])]
	#[case::no_match("(zz)", "xxabcdyy", vec![])]
	#[case::no_groups("ab", "xxabcdyy", vec![])]
	#[case::empty_group_skipped("(a)(b*)(c)", "ac", vec![[0, 0], [1, 1]])]
	#[case::optional_group_skipped("(a)(x)?(c)", "ac", vec![[0, 0], [1, 1]])]
	#[case::multibyte("(é)(b)", "aéb", vec![[1, 2], [3, 3]])]
	fn spans(#[case] pattern: &str, #[case] text: &str, #[case] expected: Vec<[usize; 2]>) {
		assert_eq!(extract_captures(pattern, text, None).expect("valid pattern"), expected);
	}

	#[test]
	fn linear_engine_agrees() {
		assert_eq!(extract_captures("(ab)(cd)", "xxabcdyy", Some("regex")).expect("valid pattern"), vec![[2, 3], [4, 5]]);
	}

	#[test]
	fn invalid_pattern_is_an_error() {
		assert!(extract_captures("(ab", "ab", None).is_err());
	}
}
