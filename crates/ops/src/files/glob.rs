use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use ignore::{Walk, WalkBuilder};

use crate::error::OpError;

/// Lazily expands a shell glob (`*`, `?`, `[...]`, `**`) into existing paths.
///
/// The literal leading directories of the pattern become the walk root;
/// reported paths keep that root as written. Hidden entries are only walked
/// when `show_hidden` is set.
pub struct GlobWalk {
	root: PathBuf,
	source: Source,
}

enum Source {
	Literal(Option<PathBuf>),
	Walk { walk: Walk, matcher: GlobMatcher },
}

fn has_magic(component: &str) -> bool {
	component.contains(['*', '?', '['])
}

impl GlobWalk {
	pub fn new(pattern: &Path, show_hidden: bool) -> Result<Self, OpError> {
		let mut root = PathBuf::new();
		let mut rest: Vec<String> = Vec::new();
		for component in pattern.components() {
			let text = component.as_os_str().to_string_lossy();
			let literal = rest.is_empty() && (!matches!(component, Component::Normal(_)) || !has_magic(&text));
			if literal {
				root.push(component);
			} else {
				rest.push(text.into_owned());
			}
		}

		if rest.is_empty() {
			let exists = root.symlink_metadata().is_ok();
			return Ok(Self {
				root: PathBuf::new(),
				source: Source::Literal(exists.then_some(root)),
			});
		}

		let glob = rest.join("/");
		let matcher = GlobBuilder::new(&glob).literal_separator(true).build()?.compile_matcher();
		let depth = if rest.iter().any(|c| c.contains("**")) { None } else { Some(rest.len()) };
		let walk_root = if root.as_os_str().is_empty() { PathBuf::from(".") } else { root.clone() };
		let walk = WalkBuilder::new(&walk_root)
			.standard_filters(false)
			.hidden(!show_hidden)
			.max_depth(depth)
			.build();
		Ok(Self {
			root: walk_root,
			source: Source::Walk { walk, matcher },
		})
	}
}

impl Iterator for GlobWalk {
	type Item = PathBuf;

	fn next(&mut self) -> Option<PathBuf> {
		match &mut self.source {
			Source::Literal(path) => path.take(),
			Source::Walk { walk, matcher } => {
				for entry in walk.by_ref() {
					// Unreadable entries are skipped like any other per-entry OS error.
					let Ok(entry) = entry else { continue };
					if entry.depth() == 0 {
						continue;
					}
					let Ok(relative) = entry.path().strip_prefix(&self.root) else { continue };
					if matcher.is_match(relative) {
						return Some(entry.into_path());
					}
				}
				None
			}
		}
	}
}
