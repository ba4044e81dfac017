//! Lookahead completion host.
//!
//! Reads JSON requests from stdin, one per line, and writes deliveries and
//! responses to stdout until stdin closes.

use std::io::BufRead;
use std::path::PathBuf;

use clap::Parser;
use lookahead_host::logging::setup_tracing;
use lookahead_host::{Config, Dispatcher, LineHost};
use tracing::{info, warn};

/// Host command line arguments.
#[derive(Parser, Debug)]
#[command(name = "lookahead")]
#[command(about = "Cancellation-aware completion scheduler over stdio")]
struct Args {
	/// Configuration file
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Worker pool size, overriding the config file
	#[arg(short, long)]
	workers: Option<usize>,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	setup_tracing(args.verbose);

	let mut config = Config::load(args.config.as_deref())?;
	if let Some(workers) = args.workers {
		config.workers = workers;
	}
	config.validate()?;

	info!(workers = config.workers, "starting lookahead");

	let dispatcher = Dispatcher::start(config, LineHost::new(std::io::stdout()))?;

	for line in std::io::stdin().lock().lines() {
		let line = line?;
		if line.trim().is_empty() {
			continue;
		}
		if let Err(err) = dispatcher.handle_line(&line) {
			warn!(%err, "request rejected");
		}
	}

	info!("stdin closed, shutting down");
	dispatcher.shutdown();
	Ok(())
}
