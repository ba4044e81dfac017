//! Path completion for the command line.

mod glob;
mod vars;

use std::ffi::OsStr;
use std::fs::{self, Metadata};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use lookahead_scheduler::{CancelToken, Candidates, Interrupt, Operation};

pub use self::glob::GlobWalk;
pub use self::vars::{expand_vars, expand_vars_with};
use crate::error::OpError;

/// What kind of path the command line expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpandType {
	#[default]
	File,
	/// Directories only.
	Dir,
	/// Files searched along the editor's `path` option.
	FileInPath,
	/// Executables searched along `$PATH`.
	Shellcmd,
}

impl ExpandType {
	/// Maps a host expand-type name; unknown names complete like files.
	pub fn from_name(name: &str) -> Self {
		match name {
			"dir" => Self::Dir,
			"file_in_path" => Self::FileInPath,
			"shellcmd" => Self::Shellcmd,
			_ => Self::File,
		}
	}
}

/// Host-side description of a file completion request.
#[derive(Debug, Clone, Default)]
pub struct FileRequest {
	pub working_directory: PathBuf,
	/// The typed argument, e.g. `src/ma` or `**/*.rs`.
	pub expand_arg: String,
	pub expand_type: ExpandType,
	pub has_wildcard: bool,
	/// Wildcard results equal to this path are dropped.
	pub path_prefix: String,
	/// Comma-separated globs matched against entry names.
	pub wildignore: String,
	/// Comma-separated directories for [`ExpandType::FileInPath`].
	pub path_option: String,
}

/// Directories a request enumerates, resolved once at submission.
pub fn search_directories(request: &FileRequest, path_env: Option<&OsStr>) -> Vec<PathBuf> {
	match request.expand_type {
		ExpandType::FileInPath => request
			.path_option
			.split(',')
			.filter(|dir| !dir.is_empty())
			.map(|dir| request.working_directory.join(dir))
			.collect(),
		ExpandType::Shellcmd => path_env.map(|paths| std::env::split_paths(paths).collect()).unwrap_or_default(),
		ExpandType::File | ExpandType::Dir => vec![request.working_directory.clone()],
	}
}

/// Completes a partially typed path against one or more base directories.
#[derive(Debug, Clone)]
pub struct ListFiles {
	directories: Vec<PathBuf>,
	expand_arg: String,
	expand_type: ExpandType,
	has_wildcard: bool,
	path_prefix: PathBuf,
	wildignore: String,
}

impl ListFiles {
	/// Builds the operation, reading `$PATH` for shell command completion.
	pub fn new(request: FileRequest) -> Self {
		let path_env = std::env::var_os("PATH");
		let directories = search_directories(&request, path_env.as_deref());
		Self::with_directories(request, directories)
	}

	pub fn with_directories(request: FileRequest, directories: Vec<PathBuf>) -> Self {
		Self {
			directories,
			expand_arg: request.expand_arg,
			expand_type: request.expand_type,
			has_wildcard: request.has_wildcard,
			path_prefix: PathBuf::from(request.path_prefix),
			wildignore: request.wildignore,
		}
	}

	pub fn directories(&self) -> &[PathBuf] {
		&self.directories
	}

	fn keep(&self, name: &str, path: &Path, show_hidden: bool, ignore: &GlobSet) -> Option<Metadata> {
		if name.starts_with('.') && !show_hidden {
			return None;
		}
		// A dangling symlink is listed as a plain entry.
		let meta = fs::metadata(path).or_else(|_| fs::symlink_metadata(path)).ok()?;
		if self.expand_type == ExpandType::Dir && !meta.is_dir() {
			return None;
		}
		if ignore.is_match(name) {
			return None;
		}
		if self.expand_type == ExpandType::Shellcmd && !(meta.is_file() && is_executable(path)) {
			return None;
		}
		Some(meta)
	}

	fn list_directory(&self, directory: &Path, ignore: &GlobSet, token: &CancelToken, found: &mut Candidates) -> Result<(), Interrupt> {
		let (head, tail) = match self.expand_arg.as_str() {
			"." => ("", ""),
			arg => split_last(arg),
		};
		let listed = directory.join(head);
		let show_hidden = tail.starts_with('.');

		let entries = match fs::read_dir(&listed) {
			Ok(entries) => entries,
			Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => return Ok(()),
			Err(err) => return Err(OpError::io(listed, err).into()),
		};
		for entry in entries {
			token.checkpoint()?;
			let Ok(entry) = entry else { continue };
			let Ok(name) = entry.file_name().into_string() else { continue };
			if !name.starts_with(tail) {
				continue;
			}
			let Some(meta) = self.keep(&name, &entry.path(), show_hidden, ignore) else { continue };
			found.push(if meta.is_dir() { name + "/" } else { name });
		}
		Ok(())
	}

	fn list_wildcard(&self, directory: &Path, ignore: &GlobSet, token: &CancelToken, found: &mut Candidates) -> Result<(), Interrupt> {
		let show_hidden = split_last(&self.expand_arg).1.starts_with('.');
		let joined = directory.join(&self.expand_arg);
		let pattern = expand_vars(&joined.to_string_lossy()).into_owned();

		for path in GlobWalk::new(Path::new(&pattern), show_hidden)? {
			token.checkpoint()?;
			let Some(name) = path.file_name().and_then(OsStr::to_str) else { continue };
			let Some(meta) = self.keep(name, &path, show_hidden, ignore) else { continue };
			let shown = path.strip_prefix(directory).unwrap_or(&path);
			if shown == self.path_prefix {
				continue;
			}
			let shown = shown.to_string_lossy();
			found.push(if meta.is_dir() { format!("{shown}/") } else { shown.into_owned() });
		}
		Ok(())
	}
}

impl Operation for ListFiles {
	fn name(&self) -> &'static str {
		"list_files"
	}

	fn run(self, token: &CancelToken) -> Result<Candidates, Interrupt> {
		let ignore = wildignore(&self.wildignore);
		let mut found = Vec::new();
		for directory in &self.directories {
			token.checkpoint()?;
			if directory.as_os_str().is_empty() {
				continue;
			}
			if self.has_wildcard {
				self.list_wildcard(directory, &ignore, token, &mut found)?;
			} else {
				self.list_directory(directory, &ignore, token, &mut found)?;
			}
		}
		found.sort();

		if !self.has_wildcard {
			let head = dirname(&self.expand_arg);
			if !head.is_empty() {
				for entry in &mut found {
					*entry = join(head, entry);
				}
			}
		}

		match self.expand_arg.as_str() {
			"." => {
				found.insert(0, "../".to_string());
				found.insert(0, "./".to_string());
			}
			".." => found.insert(0, "../".to_string()),
			_ => {}
		}
		Ok(found)
	}
}

/// Compiles the comma-separated ignore list; unparsable globs are skipped.
fn wildignore(option: &str) -> GlobSet {
	let mut builder = GlobSetBuilder::new();
	for raw in option.split(',').filter(|p| !p.is_empty()) {
		match GlobBuilder::new(raw).build() {
			Ok(glob) => {
				builder.add(glob);
			}
			Err(err) => tracing::debug!(pattern = raw, %err, "files.wildignore.skip"),
		}
	}
	builder.build().unwrap_or_else(|err| {
		tracing::debug!(%err, "files.wildignore.invalid");
		GlobSet::empty()
	})
}

/// Splits at the last `/`: `"src/ma"` → `("src/", "ma")`.
fn split_last(arg: &str) -> (&str, &str) {
	match arg.rfind('/') {
		Some(i) => arg.split_at(i + 1),
		None => ("", arg),
	}
}

/// Directory part of a typed argument, without trailing separators unless it is the root.
fn dirname(arg: &str) -> &str {
	let (head, _) = split_last(arg);
	let trimmed = head.trim_end_matches('/');
	if trimmed.is_empty() { head } else { trimmed }
}

fn join(head: &str, name: &str) -> String {
	if head.ends_with('/') { format!("{head}{name}") } else { format!("{head}/{name}") }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
	nix::unistd::access(path, nix::unistd::AccessFlags::X_OK).is_ok()
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
	true
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("src/ma", ("src/", "ma"))]
	#[case("ma", ("", "ma"))]
	#[case("/usr", ("/", "usr"))]
	#[case("src/", ("src/", ""))]
	fn split_last_cases(#[case] arg: &str, #[case] expected: (&str, &str)) {
		assert_eq!(split_last(arg), expected);
	}

	#[rstest]
	#[case("src/ma", "src")]
	#[case("a//b", "a")]
	#[case("/usr", "/")]
	#[case("plain", "")]
	fn dirname_cases(#[case] arg: &str, #[case] expected: &str) {
		assert_eq!(dirname(arg), expected);
	}

	#[test]
	fn join_avoids_double_separator() {
		assert_eq!(join("/", "usr/"), "/usr/");
		assert_eq!(join("src", "main.rs"), "src/main.rs");
	}

	#[test]
	fn expand_type_names() {
		assert_eq!(ExpandType::from_name("dir"), ExpandType::Dir);
		assert_eq!(ExpandType::from_name("file_in_path"), ExpandType::FileInPath);
		assert_eq!(ExpandType::from_name("shellcmd"), ExpandType::Shellcmd);
		assert_eq!(ExpandType::from_name("help"), ExpandType::File);
	}

	#[test]
	fn wildignore_matches_names() {
		let set = wildignore("*.o,,*.pyc,[");
		assert!(set.is_match("main.o"));
		assert!(set.is_match("x.pyc"));
		assert!(!set.is_match("main.rs"));
	}

	#[test]
	fn directories_follow_expand_type() {
		let mut request = FileRequest {
			working_directory: PathBuf::from("/work"),
			path_option: "src,,/usr/include".into(),
			..FileRequest::default()
		};
		assert_eq!(search_directories(&request, None), vec![PathBuf::from("/work")]);

		request.expand_type = ExpandType::FileInPath;
		assert_eq!(search_directories(&request, None), vec![PathBuf::from("/work/src"), PathBuf::from("/usr/include")]);

		request.expand_type = ExpandType::Shellcmd;
		let path_env = std::env::join_paths(["/bin", "/usr/bin"]).expect("joinable");
		assert_eq!(search_directories(&request, Some(&path_env)), vec![PathBuf::from("/bin"), PathBuf::from("/usr/bin")]);
		assert!(search_directories(&request, None).is_empty());
	}
}
