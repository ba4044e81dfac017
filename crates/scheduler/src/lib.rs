//! Cancellation-aware task scheduler for incremental completion pipelines.
//!
//! A host submits one request per pipeline step. Each request is admitted by
//! the [`RunTracker`], which cancels everything still in flight, and then runs
//! on the worker pool. Finished work lands on the result queue, where a single
//! [`DeliveryConsumer`] collapses any backlog to the newest `(run_id, step)` and
//! hands exactly that entry to the [`Host`].
//!
//! Both queues are unbounded. Admission-time cancellation is the only flow
//! control: superseded work stops at its next poll point instead of being
//! dequeued, so producers never wait on the consumer.

mod context;
mod delivery;
mod error;
mod operation;
mod queue;
mod scheduler;
mod tracker;

pub use context::RequestContext;
pub use delivery::{DeliveryConsumer, Host};
pub use error::StartError;
pub use lookahead_worker::{CancelToken, Cancelled};
pub use operation::{Candidates, FnOperation, Interrupt, Operation};
pub use queue::{Delivery, DeliveryKind, QueueEntry, ResultReceiver, ResultSender, result_queue};
pub use scheduler::{Scheduler, Submission};
pub use tracker::RunTracker;
