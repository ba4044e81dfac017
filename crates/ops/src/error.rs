use std::path::PathBuf;

use lookahead_scheduler::Interrupt;
use thiserror::Error;

/// Failure inside a completion operation.
#[derive(Debug, Error)]
pub enum OpError {
	/// No regex engine registered under this name.
	#[error("unknown regex engine '{0}'")]
	UnknownEngine(String),

	/// No similarity scorer registered under this name.
	#[error("unknown scorer '{0}'")]
	UnknownScorer(String),

	/// Pattern rejected by the `regex` engine.
	#[error(transparent)]
	Regex(#[from] regex::Error),

	/// Pattern rejected, or matching aborted, by the `fancy_regex` engine.
	#[error(transparent)]
	FancyRegex(#[from] fancy_regex::Error),

	/// Glob pattern could not be compiled.
	#[error("invalid glob: {0}")]
	Glob(#[from] globset::Error),

	/// Filesystem or account database access failed.
	#[error("{}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// Request argument out of range.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),
}

impl OpError {
	pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io { path: path.into(), source }
	}
}

impl From<OpError> for Interrupt {
	fn from(err: OpError) -> Self {
		Self::Failed(err.to_string())
	}
}
