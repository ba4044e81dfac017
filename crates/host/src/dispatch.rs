use std::io::Write;
use std::sync::Arc;

use lookahead_ops::{AccountSource, Delay, ExpandType, FileRequest, Filter, FuzzyMatch, ListFiles, ListUsers, PasswdFile, Search, Sort, SystemAccounts, Uniq, extract_captures};
use lookahead_scheduler::{Delivery, Host, Operation, RequestContext, Scheduler, StartError, Submission};
use serde_json::json;

use crate::config::Config;
use crate::host::LineHost;
use crate::protocol::{
	CandidatesParams, CapturesParams, DelayParams, FilterParams, FuzzyParams, ListFilesParams, ListUsersParams, Message, Outbound, ProtocolError,
	SearchParams,
};

/// Routes inbound messages to the scheduler or answers them inline.
pub struct Dispatcher<W> {
	scheduler: Scheduler,
	host: LineHost<W>,
	config: Config,
	accounts: Arc<dyn AccountSource>,
}

impl<W: Write + Send + 'static> Dispatcher<W> {
	/// Starts the scheduler with the configured pool size.
	pub fn start(config: Config, host: LineHost<W>) -> Result<Self, StartError> {
		let accounts: Arc<dyn AccountSource> = match &config.users.passwd {
			Some(path) => Arc::new(PasswdFile::new(path)),
			None => Arc::new(SystemAccounts),
		};
		Self::with_accounts(config, host, accounts)
	}

	pub fn with_accounts(config: Config, host: LineHost<W>, accounts: Arc<dyn AccountSource>) -> Result<Self, StartError> {
		let scheduler = Scheduler::start(config.workers, host.clone())?;
		Ok(Self {
			scheduler,
			host,
			config,
			accounts,
		})
	}

	/// Handles one inbound line.
	///
	/// Protocol errors are returned for logging and, when the line carried an
	/// id, also answered with an `error` message.
	pub fn handle_line(&self, line: &str) -> Result<(), ProtocolError> {
		let message = Message::parse(line)?;
		let id = message.id;
		self.dispatch(message).inspect_err(|err| {
			if let Some(id) = id {
				self.host.send(&Outbound::Error { id, message: err.to_string() });
			}
		})
	}

	fn dispatch(&self, message: Message) -> Result<(), ProtocolError> {
		match message.method.as_str() {
			"search" => {
				let p: SearchParams = message.params()?;
				if p.pattern.is_empty() {
					self.host.deliver(p.ctx, Delivery::Resolve(Vec::new()));
					return Ok(());
				}
				let op = Search {
					pattern: p.pattern,
					engine: Some(p.engine.unwrap_or_else(|| self.config.search.engine.clone())),
					max_candidates: p.max_candidates.unwrap_or(self.config.search.max_candidates),
					lines: p.lines,
					cursor_line: p.cursor_line,
				};
				self.submit(p.ctx, op);
			}
			"sort" => {
				let p: CandidatesParams = message.params()?;
				self.submit(p.ctx, Sort { candidates: p.candidates });
			}
			"uniq" => {
				let p: CandidatesParams = message.params()?;
				self.submit(p.ctx, Uniq { candidates: p.candidates });
			}
			"filter" => {
				let p: FilterParams = message.params()?;
				let op = Filter {
					pattern: p.pattern,
					candidates: p.candidates,
					engine: Some(p.engine.unwrap_or_else(|| self.config.filter.engine.clone())),
					compare_basename: p.compare_basename,
				};
				self.submit(p.ctx, op);
			}
			"fuzzy_match" => {
				let p: FuzzyParams = message.params()?;
				let op = FuzzyMatch {
					candidates: p.candidates,
					query: p.query,
					partial: p.partial,
					scorer: Some(p.scorer.unwrap_or_else(|| self.config.fuzzy.scorer.clone())),
				};
				self.submit(p.ctx, op);
			}
			"list_files" => {
				let p: ListFilesParams = message.params()?;
				let request = FileRequest {
					working_directory: p.working_directory,
					expand_arg: p.expand_arg,
					expand_type: ExpandType::from_name(&p.expand_type),
					has_wildcard: p.has_wildcard,
					path_prefix: p.path_prefix,
					wildignore: p.wildignore,
					path_option: p.path_option,
				};
				self.submit(p.ctx, ListFiles::new(request));
			}
			"list_users" => {
				let p: ListUsersParams = message.params()?;
				let op = ListUsers {
					prefix: p.prefix,
					source: Arc::clone(&self.accounts),
				};
				self.submit(p.ctx, op);
			}
			"delay" => {
				let p: DelayParams = message.params()?;
				self.submit(
					p.ctx,
					Delay {
						seconds: p.seconds,
						value: p.value,
					},
				);
			}
			"extract_captures" => {
				let id = message.id.ok_or_else(|| ProtocolError::MissingId(message.method.clone()))?;
				let p: CapturesParams = message.params()?;
				let reply = match extract_captures(&p.pattern, &p.string, p.engine.as_deref()) {
					Ok(spans) => Outbound::Response {
						id,
						result: json!(spans),
					},
					Err(err) => Outbound::Error {
						id,
						message: format!("extract_captures: {err}"),
					},
				};
				self.host.send(&reply);
			}
			other => return Err(ProtocolError::UnknownMethod(other.to_string())),
		}
		Ok(())
	}

	fn submit<O: Operation>(&self, ctx: RequestContext, op: O) {
		let name = op.name();
		let (run_id, step) = ctx.key();
		if self.scheduler.submit(ctx, op) == Submission::Stale {
			tracing::trace!(op = name, run_id, step, "dispatch.stale");
		}
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Stops accepting work and waits for the delivery thread to drain.
	pub fn shutdown(self) {
		self.scheduler.shutdown();
	}
}
