//! Line-delimited JSON wire format.

use std::path::PathBuf;

use lookahead_scheduler::RequestContext;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Protocol violations on the inbound stream.
#[derive(Debug, Error)]
pub enum ProtocolError {
	/// The line is not a JSON request object.
	#[error("malformed message: {0}")]
	Malformed(#[from] serde_json::Error),

	#[error("unknown method '{0}'")]
	UnknownMethod(String),

	#[error("invalid params for '{method}': {source}")]
	InvalidParams {
		method: String,
		#[source]
		source: serde_json::Error,
	},

	/// A synchronous call arrived without an id to answer to.
	#[error("'{0}' requires an id")]
	MissingId(String),
}

/// One inbound line before method dispatch.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
	#[serde(default)]
	pub id: Option<u64>,
	pub method: String,
	#[serde(default)]
	pub params: Value,
}

impl Message {
	pub fn parse(line: &str) -> Result<Self, ProtocolError> {
		Ok(serde_json::from_str(line)?)
	}

	/// Decodes `params` into the method's argument struct.
	pub fn params<T: DeserializeOwned>(&self) -> Result<T, ProtocolError> {
		serde_json::from_value(self.params.clone()).map_err(|source| ProtocolError::InvalidParams {
			method: self.method.clone(),
			source,
		})
	}
}

/// Everything written to the host, one object per line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
	/// Successful scheduled result.
	Resolve { ctx: RequestContext, result: Vec<String> },
	/// Failed scheduled result.
	Reject { ctx: RequestContext, result: String },
	/// Answer to a synchronous call.
	Response { id: u64, result: Value },
	/// Failure of a call that carried an id.
	Error { id: u64, message: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
	pub ctx: RequestContext,
	pub pattern: String,
	pub engine: Option<String>,
	pub max_candidates: Option<usize>,
	#[serde(default)]
	pub lines: Vec<String>,
	/// Zero-based.
	#[serde(default)]
	pub cursor_line: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidatesParams {
	pub ctx: RequestContext,
	pub candidates: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterParams {
	pub ctx: RequestContext,
	pub pattern: String,
	pub candidates: Vec<String>,
	pub engine: Option<String>,
	#[serde(default)]
	pub compare_basename: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FuzzyParams {
	pub ctx: RequestContext,
	pub candidates: Vec<String>,
	pub query: String,
	#[serde(default = "default_partial")]
	pub partial: bool,
	pub scorer: Option<String>,
}

fn default_partial() -> bool {
	true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListFilesParams {
	pub ctx: RequestContext,
	pub working_directory: PathBuf,
	pub expand_arg: String,
	#[serde(default)]
	pub expand_type: String,
	#[serde(default)]
	pub has_wildcard: bool,
	#[serde(default)]
	pub path_prefix: String,
	/// The editor's `wildignore` option.
	#[serde(default)]
	pub wildignore: String,
	/// The editor's `path` option.
	#[serde(default)]
	pub path_option: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListUsersParams {
	pub ctx: RequestContext,
	#[serde(default)]
	pub prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DelayParams {
	pub ctx: RequestContext,
	pub seconds: f64,
	#[serde(default)]
	pub value: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CapturesParams {
	pub pattern: String,
	pub string: String,
	pub engine: Option<String>,
}
