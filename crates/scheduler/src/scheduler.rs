use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread::JoinHandle;

use lookahead_worker::{CancelToken, WorkerPool, panic_message};

use crate::context::RequestContext;
use crate::delivery::{DeliveryConsumer, Host};
use crate::error::StartError;
use crate::operation::{Interrupt, Operation};
use crate::queue::{Delivery, QueueEntry, ResultSender, result_queue};
use crate::tracker::RunTracker;

/// Outcome of [`Scheduler::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
	/// Admitted and queued on the worker pool.
	Admitted,
	/// Older than the latest admitted run; dropped without running.
	Stale,
}

/// Process-lifetime scheduler instance.
///
/// Owns the run tracker, the worker pool, the producer half of the result
/// queue and the delivery thread. Submitting never waits for work to finish.
pub struct Scheduler {
	tracker: Arc<RunTracker>,
	pool: WorkerPool,
	results: ResultSender,
	delivery: Option<JoinHandle<()>>,
}

impl Scheduler {
	/// Builds the pool, starts the delivery thread and wires both to `host`.
	pub fn start<H: Host>(workers: usize, host: H) -> Result<Self, StartError> {
		let pool = WorkerPool::new(workers)?;
		let (results, receiver) = result_queue();
		let delivery = DeliveryConsumer::new(receiver, host).spawn().map_err(StartError::DeliveryThread)?;
		tracing::info!(workers, "scheduler.start");
		Ok(Self {
			tracker: Arc::new(RunTracker::new()),
			pool,
			results,
			delivery: Some(delivery),
		})
	}

	/// Admits `context` and, if current, runs `operation` on the pool.
	pub fn submit<O: Operation>(&self, context: RequestContext, operation: O) -> Submission {
		let Some(token) = self.tracker.admit(&context) else {
			return Submission::Stale;
		};
		let tracker = Arc::clone(&self.tracker);
		let results = self.results.clone();
		drop(self.pool.submit(move || execute(operation, context, token, &tracker, &results)));
		Submission::Admitted
	}

	/// Tokens still registered as in flight.
	pub fn pending(&self) -> usize {
		self.tracker.pending()
	}

	/// Cancels in-flight work, closes the queue and joins the delivery thread.
	pub fn shutdown(mut self) {
		self.tracker.cancel_all();
		let delivery = self.delivery.take();
		let Self { pool, results, .. } = self;
		drop(results);
		drop(pool);
		if let Some(handle) = delivery
			&& handle.join().is_err()
		{
			tracing::warn!("scheduler.delivery_panicked");
		}
		tracing::info!("scheduler.shutdown");
	}
}

/// Removes the token from the pending set on every exit path.
struct Release<'a> {
	tracker: &'a RunTracker,
	token: &'a CancelToken,
}

impl Drop for Release<'_> {
	fn drop(&mut self) {
		self.tracker.release(self.token);
	}
}

fn execute<O: Operation>(operation: O, context: RequestContext, token: CancelToken, tracker: &RunTracker, results: &ResultSender) {
	let release = Release { tracker, token: &token };
	let name = operation.name();
	if token.is_cancelled() {
		tracing::trace!(op = name, run_id = context.run_id(), step = context.step(), "operation.skip_cancelled");
		return;
	}

	let outcome = catch_unwind(AssertUnwindSafe(|| operation.run(&token))).unwrap_or_else(|payload| {
		let message = match panic_message(payload.as_ref()) {
			Some(msg) => format!("panicked: {msg}"),
			None => "panicked".to_string(),
		};
		Err(Interrupt::Failed(message))
	});

	let delivery = match outcome {
		Ok(candidates) => Delivery::Resolve(candidates),
		Err(Interrupt::Failed(message)) => Delivery::Reject(format!("{name}: {message}")),
		Err(Interrupt::Cancelled) => {
			tracing::trace!(op = name, run_id = context.run_id(), step = context.step(), "operation.cancelled");
			return;
		}
	};
	// Superseded while finishing up: still silent.
	if token.is_cancelled() {
		tracing::trace!(op = name, run_id = context.run_id(), step = context.step(), "operation.cancelled");
		return;
	}
	drop(release);
	results.emit(QueueEntry::new(context, delivery));
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::operation::FnOperation;
	use crate::queue::result_queue;

	fn run_direct<O: Operation>(operation: O, token: CancelToken, tracker: &RunTracker) -> Option<QueueEntry> {
		let (tx, mut rx) = result_queue();
		execute(operation, RequestContext::new(1, 0), token, tracker, &tx);
		rx.try_recv()
	}

	#[test]
	fn cancelled_token_skips_the_operation_body() {
		let tracker = RunTracker::new();
		let token = tracker.admit(&RequestContext::new(1, 0)).expect("admitted");
		token.cancel();

		let entry = run_direct(
			FnOperation::new("search", |_| panic!("body must not run")),
			token,
			&tracker,
		);
		assert!(entry.is_none());
		assert_eq!(tracker.pending(), 0);
	}

	#[test]
	fn failure_is_prefixed_with_the_operation_name() {
		let tracker = RunTracker::new();
		let token = tracker.admit(&RequestContext::new(1, 0)).expect("admitted");

		let entry = run_direct(
			FnOperation::new("filter", |_| Err(Interrupt::Failed("unclosed group".into()))),
			token,
			&tracker,
		)
		.expect("reject emitted");
		assert_eq!(entry.delivery, Delivery::Reject("filter: unclosed group".into()));
		assert_eq!(tracker.pending(), 0);
	}

	#[test]
	fn panic_becomes_a_reject() {
		let tracker = RunTracker::new();
		let token = tracker.admit(&RequestContext::new(1, 0)).expect("admitted");

		let entry = run_direct(FnOperation::new("sort", |_| panic!("kaboom")), token, &tracker).expect("reject emitted");
		assert_eq!(entry.delivery, Delivery::Reject("sort: panicked: kaboom".into()));
		assert_eq!(tracker.pending(), 0);
	}

	#[test]
	fn cancellation_during_run_suppresses_the_result() {
		let tracker = RunTracker::new();
		let token = tracker.admit(&RequestContext::new(1, 0)).expect("admitted");

		let entry = run_direct(
			FnOperation::new("uniq", |token: &CancelToken| {
				token.cancel();
				Ok(vec!["finished anyway".into()])
			}),
			token,
			&tracker,
		);
		assert!(entry.is_none());
	}
}
