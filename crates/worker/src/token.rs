use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Monotonic id source for cancellation tokens.
#[derive(Debug, Default, Clone)]
pub struct TokenClock {
	next: Arc<AtomicU64>,
}

impl TokenClock {
	/// Creates a new clock; the first issued id is 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Issues a fresh, not-yet-cancelled token.
	pub fn issue(&self) -> CancelToken {
		let id = self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
		CancelToken::new(id, CancellationToken::new())
	}
}

/// Marker returned by [`CancelToken::checkpoint`] once cancellation was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cancelled")]
pub struct Cancelled;

/// Shared cancellation flag polled by cooperative work.
///
/// Clones observe the same flag. The id identifies the token inside a pending
/// set; two tokens compare equal only when they share an id.
#[derive(Debug, Clone)]
pub struct CancelToken {
	id: u64,
	cancel: CancellationToken,
}

impl CancelToken {
	/// Wraps an existing cancellation token under `id`.
	pub fn new(id: u64, cancel: CancellationToken) -> Self {
		Self { id, cancel }
	}

	/// Returns the token id.
	pub const fn id(&self) -> u64 {
		self.id
	}

	/// Returns true when cancellation is requested.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Requests cancellation. Idempotent.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Poll point for loops: `Err(Cancelled)` once cancellation was requested.
	pub fn checkpoint(&self) -> Result<(), Cancelled> {
		if self.is_cancelled() { Err(Cancelled) } else { Ok(()) }
	}
}

impl PartialEq for CancelToken {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for CancelToken {}
