//! Domain-free concurrency primitives for the completion scheduler.
//!
//! * [`CancelToken`]: a cloneable, polled cancellation flag with a process-unique id.
//! * [`WorkerPool`]: a fixed-size pool running blocking closures, queueing without bound.
//! * [`spawn_named_thread`]: dedicated OS threads for long-lived loops.

mod panic;
mod pool;
mod spawn;
mod token;

pub use panic::panic_message;
pub use pool::{PoolError, WorkerPool};
pub use spawn::spawn_named_thread;
pub use token::{CancelToken, Cancelled, TokenClock};
