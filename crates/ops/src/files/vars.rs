use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$(\w+|\{[^}]*\})").expect("valid variable pattern"));

/// Expands `$NAME` and `${NAME}` from the process environment.
///
/// Unset variables are left as written.
pub fn expand_vars(input: &str) -> Cow<'_, str> {
	expand_vars_with(input, |name| std::env::var(name).ok())
}

pub fn expand_vars_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> Cow<'_, str> {
	if !input.contains('$') {
		return Cow::Borrowed(input);
	}
	VAR.replace_all(input, |caps: &Captures<'_>| {
		let raw = &caps[1];
		let name = raw.strip_prefix('{').and_then(|n| n.strip_suffix('}')).unwrap_or(raw);
		lookup(name).unwrap_or_else(|| caps[0].to_string())
	})
}
