use std::thread::JoinHandle;

use lookahead_worker::spawn_named_thread;

use crate::context::RequestContext;
use crate::queue::{Delivery, QueueEntry, ResultReceiver};

/// Receiver of coalesced results, i.e. the editor side of the boundary.
pub trait Host: Send + Sync + 'static {
	fn deliver(&self, context: RequestContext, delivery: Delivery);
}

impl<F> Host for F
where
	F: Fn(RequestContext, Delivery) + Send + Sync + 'static,
{
	fn deliver(&self, context: RequestContext, delivery: Delivery) {
		self(context, delivery)
	}
}

/// Single-consumer drain loop between the result queue and the host.
///
/// Each cycle blocks for one entry, sweeps whatever else is already queued,
/// and delivers only the newest by `(run_id, step)`. Entries older than the
/// last delivery are dropped so the host never sees results go backwards.
pub struct DeliveryConsumer<H> {
	results: ResultReceiver,
	host: H,
	delivered: Option<(i64, i64)>,
}

impl<H: Host> DeliveryConsumer<H> {
	pub fn new(results: ResultReceiver, host: H) -> Self {
		Self {
			results,
			host,
			delivered: None,
		}
	}

	/// Runs one drain cycle. Returns false once the queue is closed and empty.
	pub fn run_cycle(&mut self) -> bool {
		let Some(first) = self.results.recv_blocking() else {
			return false;
		};
		let best = self.coalesce(first);

		if let Some(last) = self.delivered
			&& best.context.key() < last
		{
			tracing::debug!(run_id = best.context.run_id(), step = best.context.step(), ?last, "delivery.drop_stale");
			return true;
		}

		self.delivered = Some(best.context.key());
		tracing::debug!(
			run_id = best.context.run_id(),
			step = best.context.step(),
			kind = best.delivery.kind().as_str(),
			"delivery.deliver"
		);
		self.host.deliver(best.context, best.delivery);
		true
	}

	/// Drains until every producer is gone.
	pub fn run(mut self) {
		while self.run_cycle() {}
		tracing::debug!("delivery.closed");
	}

	/// Moves the loop onto its own named thread.
	pub fn spawn(self) -> std::io::Result<JoinHandle<()>> {
		spawn_named_thread("lookahead-delivery", move || self.run())
	}

	/// Sweeps the immediately available backlog, keeping the newest entry.
	fn coalesce(&mut self, first: QueueEntry) -> QueueEntry {
		let mut best = first;
		let mut discarded = 0usize;
		while let Some(next) = self.results.try_recv() {
			if next.context.is_newer_than(&best.context) {
				best = next;
			}
			discarded += 1;
		}
		if discarded > 0 {
			tracing::trace!(discarded, run_id = best.context.run_id(), step = best.context.step(), "delivery.coalesce");
		}
		best
	}
}
