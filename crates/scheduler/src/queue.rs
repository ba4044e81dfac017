use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::context::RequestContext;
use crate::operation::Candidates;

/// How the host should treat a delivered payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryKind {
	Resolve,
	Reject,
}

impl DeliveryKind {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Resolve => "resolve",
			Self::Reject => "reject",
		}
	}
}

/// Payload handed to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
	/// Successful candidate list.
	Resolve(Candidates),
	/// Human-readable failure, prefixed with the operation name.
	Reject(String),
}

impl Delivery {
	pub const fn kind(&self) -> DeliveryKind {
		match self {
			Self::Resolve(_) => DeliveryKind::Resolve,
			Self::Reject(_) => DeliveryKind::Reject,
		}
	}
}

/// One finished operation waiting for delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueEntry {
	pub context: RequestContext,
	pub delivery: Delivery,
}

impl QueueEntry {
	pub fn new(context: RequestContext, delivery: Delivery) -> Self {
		Self { context, delivery }
	}

	pub fn resolve(context: RequestContext, candidates: Candidates) -> Self {
		Self::new(context, Delivery::Resolve(candidates))
	}

	pub fn reject(context: RequestContext, message: impl Into<String>) -> Self {
		Self::new(context, Delivery::Reject(message.into()))
	}
}

/// Creates the unbounded multi-producer, single-consumer result queue.
pub fn result_queue() -> (ResultSender, ResultReceiver) {
	let (tx, rx) = unbounded_channel();
	(ResultSender { tx }, ResultReceiver { rx })
}

/// Producer half, cloned into every running operation.
#[derive(Debug, Clone)]
pub struct ResultSender {
	tx: UnboundedSender<QueueEntry>,
}

impl ResultSender {
	/// Pushes a finished entry. Returns false once the consumer is gone.
	pub fn emit(&self, entry: QueueEntry) -> bool {
		let key = entry.context.key();
		match self.tx.send(entry) {
			Ok(()) => {
				tracing::trace!(run_id = key.0, step = key.1, "queue.emit");
				true
			}
			Err(_) => {
				tracing::debug!(run_id = key.0, step = key.1, "queue.emit.closed");
				false
			}
		}
	}
}

/// Consumer half, owned by the delivery loop.
#[derive(Debug)]
pub struct ResultReceiver {
	rx: UnboundedReceiver<QueueEntry>,
}

impl ResultReceiver {
	/// Blocks the calling thread until an entry arrives.
	///
	/// Returns `None` once every sender is dropped and the queue is drained.
	/// Must not be called from inside an async runtime.
	pub fn recv_blocking(&mut self) -> Option<QueueEntry> {
		self.rx.blocking_recv()
	}

	/// Takes an entry only if one is available right now.
	pub fn try_recv(&mut self) -> Option<QueueEntry> {
		match self.rx.try_recv() {
			Ok(entry) => Some(entry),
			Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
		}
	}
}
