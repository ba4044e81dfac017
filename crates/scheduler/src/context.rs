use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity of one pipeline step within one run.
///
/// `run_id` grows with every user edit and `step` with every stage inside a
/// run. Any further fields the host attaches are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
	run_id: i64,
	step: i64,
	#[serde(flatten)]
	extra: Map<String, Value>,
}

impl RequestContext {
	pub fn new(run_id: i64, step: i64) -> Self {
		Self {
			run_id,
			step,
			extra: Map::new(),
		}
	}

	/// Attaches an opaque host field.
	#[must_use]
	pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
		self.extra.insert(key.into(), value);
		self
	}

	pub const fn run_id(&self) -> i64 {
		self.run_id
	}

	pub const fn step(&self) -> i64 {
		self.step
	}

	/// Opaque host fields.
	pub fn extra(&self) -> &Map<String, Value> {
		&self.extra
	}

	/// Ordering key, compared lexicographically.
	pub const fn key(&self) -> (i64, i64) {
		(self.run_id, self.step)
	}

	/// Compares two contexts by `(run_id, step)`, ignoring opaque fields.
	pub fn recency(&self, other: &Self) -> Ordering {
		self.key().cmp(&other.key())
	}

	/// True when `self` is strictly newer than `other`.
	pub fn is_newer_than(&self, other: &Self) -> bool {
		self.recency(other) == Ordering::Greater
	}
}
