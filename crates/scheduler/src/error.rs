use lookahead_worker::PoolError;
use thiserror::Error;

/// Failure to bring the scheduler up.
#[derive(Debug, Error)]
pub enum StartError {
	/// The worker pool could not be built.
	#[error(transparent)]
	Pool(#[from] PoolError),
	/// The delivery thread could not be spawned.
	#[error("failed to spawn delivery thread: {0}")]
	DeliveryThread(#[source] std::io::Error),
}
