//! Tracing setup for the stdio binary.
//!
//! Stdout carries the protocol, so logs go to stderr or, when
//! `LOOKAHEAD_LOG_DIR` is set, to a per-process file in that directory.

use std::fs::OpenOptions;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;

/// Environment variable naming the log directory.
pub const LOG_DIR_ENV: &str = "LOOKAHEAD_LOG_DIR";

fn filter(verbose: bool) -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("lookahead=debug")
		} else {
			EnvFilter::new("lookahead=info")
		}
	})
}

/// Installs the global subscriber. A second call is a no-op.
pub fn setup_tracing(verbose: bool) {
	if let Some(log_dir) = std::env::var_os(LOG_DIR_ENV).map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("lookahead.{}.log", std::process::id()));

		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_span_events(FmtSpan::CLOSE)
				.with_target(true);

			if tracing_subscriber::registry().with(filter(verbose)).with(file_layer).try_init().is_ok() {
				tracing::info!(path = ?log_path, "tracing initialized");
			}
			return;
		}
	}

	let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(true);
	let _ = tracing_subscriber::registry().with(filter(verbose)).with(stderr_layer).try_init();
}
