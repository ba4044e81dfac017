use lookahead_worker::{CancelToken, TokenClock};
use parking_lot::Mutex;

use crate::context::RequestContext;

#[derive(Debug, Default)]
struct Admission {
	last_run_id: Option<i64>,
	pending: Vec<CancelToken>,
}

/// Single choke point for admitting new work.
///
/// Tracks the highest admitted `run_id` and every token still in flight. All
/// state sits behind one mutex that is only held for flag flips, never I/O.
#[derive(Debug, Default)]
pub struct RunTracker {
	clock: TokenClock,
	state: Mutex<Admission>,
}

impl RunTracker {
	pub fn new() -> Self {
		Self::default()
	}

	/// Admits `context` unless an older run than the last admitted one.
	///
	/// On admission every outstanding token is cancelled before this returns,
	/// and a fresh token becomes the only live entry of the pending set.
	/// Equal `run_id`s are admitted regardless of step.
	pub fn admit(&self, context: &RequestContext) -> Option<CancelToken> {
		let mut state = self.state.lock();
		if let Some(last) = state.last_run_id
			&& context.run_id() < last
		{
			tracing::trace!(run_id = context.run_id(), step = context.step(), last, "tracker.admit.stale");
			return None;
		}
		state.last_run_id = Some(context.run_id());

		let superseded = state.pending.len();
		for token in state.pending.drain(..) {
			token.cancel();
		}

		let token = self.clock.issue();
		state.pending.push(token.clone());
		drop(state);

		if superseded > 0 {
			tracing::debug!(run_id = context.run_id(), step = context.step(), superseded, "tracker.cancel_wave");
		}
		tracing::trace!(run_id = context.run_id(), step = context.step(), token = token.id(), "tracker.admit");
		Some(token)
	}

	/// Drops `token` from the pending set. No-op if a later admission already cleared it.
	pub fn release(&self, token: &CancelToken) {
		self.state.lock().pending.retain(|pending| pending != token);
	}

	/// Cancels every outstanding token without admitting anything.
	pub fn cancel_all(&self) {
		let mut state = self.state.lock();
		for token in state.pending.drain(..) {
			token.cancel();
		}
	}

	/// Number of tokens still in flight.
	pub fn pending(&self) -> usize {
		self.state.lock().pending.len()
	}

	pub fn last_run_id(&self) -> Option<i64> {
		self.state.lock().last_run_id
	}
}
