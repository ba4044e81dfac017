use std::time::{Duration, Instant};

use lookahead_scheduler::{CancelToken, Candidates, Interrupt, Operation};

use crate::error::OpError;

const SLICE: Duration = Duration::from_millis(10);

/// Waits, then resolves with a fixed value. Lets hosts exercise supersession.
#[derive(Debug, Clone)]
pub struct Delay {
	pub seconds: f64,
	pub value: Candidates,
}

impl Operation for Delay {
	fn name(&self) -> &'static str {
		"delay"
	}

	fn run(self, token: &CancelToken) -> Result<Candidates, Interrupt> {
		let wait = Duration::try_from_secs_f64(self.seconds).map_err(|_| OpError::InvalidArgument(format!("delay of {} seconds", self.seconds)))?;
		let deadline = Instant::now()
			.checked_add(wait)
			.ok_or_else(|| OpError::InvalidArgument(format!("delay of {} seconds", self.seconds)))?;
		loop {
			token.checkpoint()?;
			let remaining = deadline.saturating_duration_since(Instant::now());
			if remaining.is_zero() {
				return Ok(self.value);
			}
			std::thread::sleep(remaining.min(SLICE));
		}
	}
}
