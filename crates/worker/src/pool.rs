use std::num::NonZeroUsize;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

/// Worker pool construction error.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
	/// Pool size must be at least one thread.
	#[error("worker pool size must be > 0")]
	ZeroWorkers,
	/// The backing runtime could not be built.
	#[error("failed to build worker runtime: {0}")]
	Runtime(#[from] std::io::Error),
}

/// Fixed-size pool executing blocking closures.
///
/// Closures run on at most `size` threads of a private Tokio blocking pool.
/// Submissions beyond that queue without bound and never block the caller.
/// The pool knows nothing about what it runs; cancellation is up to the closure.
#[derive(Debug)]
pub struct WorkerPool {
	size: NonZeroUsize,
	runtime: Option<Runtime>,
	handle: Handle,
}

impl WorkerPool {
	/// Builds a pool with `size` worker threads.
	pub fn new(size: usize) -> Result<Self, PoolError> {
		let size = NonZeroUsize::new(size).ok_or(PoolError::ZeroWorkers)?;
		let runtime = Builder::new_multi_thread()
			.worker_threads(1)
			.max_blocking_threads(size.get())
			.thread_name("lookahead-worker")
			.build()?;
		let handle = runtime.handle().clone();
		tracing::debug!(workers = size.get(), "worker.pool.start");
		Ok(Self {
			size,
			runtime: Some(runtime),
			handle,
		})
	}

	/// Returns the configured thread count.
	pub fn size(&self) -> usize {
		self.size.get()
	}

	/// Queues `f` for execution on one of the pool threads.
	pub fn submit<F, R>(&self, f: F) -> JoinHandle<R>
	where
		F: FnOnce() -> R + Send + 'static,
		R: Send + 'static,
	{
		tracing::trace!(workers = self.size.get(), "worker.pool.submit");
		self.handle.spawn_blocking(f)
	}
}

impl Drop for WorkerPool {
	fn drop(&mut self) {
		// Running closures are left to finish on their own; they poll their tokens.
		if let Some(runtime) = self.runtime.take() {
			runtime.shutdown_background();
		}
	}
}
