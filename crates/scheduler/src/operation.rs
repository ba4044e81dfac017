use lookahead_worker::{CancelToken, Cancelled};

/// Result list produced by every operation kind.
pub type Candidates = Vec<String>;

/// Why an operation stopped without a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interrupt {
	/// The token was observed set; nothing is emitted.
	Cancelled,
	/// The operation failed; emitted as a reject prefixed with the operation name.
	Failed(String),
}

impl From<Cancelled> for Interrupt {
	fn from(_: Cancelled) -> Self {
		Self::Cancelled
	}
}

/// One unit of schedulable work.
///
/// Implementations poll `token` at their natural loop granularity and bail
/// out with [`Interrupt::Cancelled`] (usually via `token.checkpoint()?`) once
/// it is set.
pub trait Operation: Send + 'static {
	/// Name used to prefix failure messages, e.g. `"search"`.
	fn name(&self) -> &'static str;

	/// Runs the operation to completion, failure, or cancellation.
	fn run(self, token: &CancelToken) -> Result<Candidates, Interrupt>;
}

/// Adapts a closure into an [`Operation`].
pub struct FnOperation<F> {
	name: &'static str,
	f: F,
}

impl<F> FnOperation<F>
where
	F: FnOnce(&CancelToken) -> Result<Candidates, Interrupt> + Send + 'static,
{
	pub fn new(name: &'static str, f: F) -> Self {
		Self { name, f }
	}
}

impl<F> Operation for FnOperation<F>
where
	F: FnOnce(&CancelToken) -> Result<Candidates, Interrupt> + Send + 'static,
{
	fn name(&self) -> &'static str {
		self.name
	}

	fn run(self, token: &CancelToken) -> Result<Candidates, Interrupt> {
		(self.f)(token)
	}
}
