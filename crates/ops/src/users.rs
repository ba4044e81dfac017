//! User-name completion (`~user`).

use std::path::PathBuf;
use std::sync::Arc;

use lookahead_scheduler::{CancelToken, Candidates, Interrupt, Operation};
#[cfg(all(unix, not(target_os = "macos"), not(target_os = "android")))]
use parking_lot::Mutex;

use crate::error::OpError;

/// Where account names come from.
pub trait AccountSource: Send + Sync {
	fn account_names(&self) -> Result<Vec<String>, OpError>;
}

/// The system account database, read through NSS (`getpwent`).
///
/// Sees every account the C library resolves, including directory-service
/// and `systemd-homed` users.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAccounts;

// getpwent walks process-global state.
#[cfg(all(unix, not(target_os = "macos"), not(target_os = "android")))]
static PWENT: Mutex<()> = Mutex::new(());

impl AccountSource for SystemAccounts {
	#[cfg(all(unix, not(target_os = "macos"), not(target_os = "android")))]
	fn account_names(&self) -> Result<Vec<String>, OpError> {
		let _guard = PWENT.lock();
		Ok(pwd::Passwd::iter().map(|entry| entry.name).collect())
	}

	#[cfg(not(all(unix, not(target_os = "macos"), not(target_os = "android"))))]
	fn account_names(&self) -> Result<Vec<String>, OpError> {
		Ok(Vec::new())
	}
}

/// Reads names from a passwd-format file (`name:x:uid:gid:...`).
#[derive(Debug, Clone)]
pub struct PasswdFile {
	path: PathBuf,
}

impl PasswdFile {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl AccountSource for PasswdFile {
	fn account_names(&self) -> Result<Vec<String>, OpError> {
		let contents = std::fs::read_to_string(&self.path).map_err(|err| OpError::io(&self.path, err))?;
		Ok(parse_passwd(&contents).map(str::to_string).collect())
	}
}

fn parse_passwd(contents: &str) -> impl Iterator<Item = &str> {
	contents
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty() && !line.starts_with('#'))
		.filter_map(|line| line.split(':').next())
		.filter(|name| !name.is_empty())
}

/// Account names starting with `prefix`, sorted ascending.
#[derive(Clone)]
pub struct ListUsers {
	pub prefix: String,
	pub source: Arc<dyn AccountSource>,
}

impl Operation for ListUsers {
	fn name(&self) -> &'static str {
		"list_users"
	}

	fn run(self, token: &CancelToken) -> Result<Candidates, Interrupt> {
		token.checkpoint()?;
		let mut names = Vec::new();
		for name in self.source.account_names()? {
			token.checkpoint()?;
			if name.starts_with(&self.prefix) {
				names.push(name);
			}
		}
		names.sort();
		Ok(names)
	}
}
