use std::io::Write;
use std::sync::Arc;

use lookahead_scheduler::{Delivery, Host, RequestContext};
use parking_lot::Mutex;

use crate::protocol::Outbound;

/// Writes outbound messages as JSON lines to a shared writer.
///
/// Deliveries from the scheduler and synchronous responses from the
/// dispatcher share the writer; each line is written and flushed whole.
pub struct LineHost<W> {
	out: Arc<Mutex<W>>,
}

impl<W> Clone for LineHost<W> {
	fn clone(&self) -> Self {
		Self {
			out: Arc::clone(&self.out),
		}
	}
}

impl<W: Write + Send + 'static> LineHost<W> {
	pub fn new(out: W) -> Self {
		Self {
			out: Arc::new(Mutex::new(out)),
		}
	}

	/// Writes one message. Failures are logged; the host may have gone away.
	pub fn send(&self, message: &Outbound) {
		let line = match serde_json::to_string(message) {
			Ok(line) => line,
			Err(err) => {
				tracing::warn!(%err, "host.encode_failed");
				return;
			}
		};
		let mut out = self.out.lock();
		if let Err(err) = writeln!(out, "{line}").and_then(|()| out.flush()) {
			tracing::warn!(%err, "host.write_failed");
		}
	}
}

impl<W: Write + Send + 'static> Host for LineHost<W> {
	fn deliver(&self, ctx: RequestContext, delivery: Delivery) {
		let message = match delivery {
			Delivery::Resolve(result) => Outbound::Resolve { ctx, result },
			Delivery::Reject(result) => Outbound::Reject { ctx, result },
		};
		self.send(&message);
	}
}
