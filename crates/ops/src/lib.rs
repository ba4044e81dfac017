//! Completion operations for the lookahead scheduler.
//!
//! Every operation implements [`lookahead_scheduler::Operation`]: it polls its
//! cancellation token at loop granularity and reports failures as [`OpError`]s,
//! which the scheduler turns into rejects prefixed with the operation name.
//!
//! Regex engines and similarity scorers are looked up by name at run time, see
//! [`engine`] and [`scorer`].

mod captures;
mod delay;
pub mod engine;
mod error;
pub mod files;
mod filter;
mod fuzzy;
mod list;
pub mod scorer;
mod search;
pub mod users;

pub use captures::extract_captures;
pub use delay::Delay;
pub use error::OpError;
pub use files::{ExpandType, FileRequest, ListFiles};
pub use filter::Filter;
pub use fuzzy::FuzzyMatch;
pub use list::{Sort, Uniq};
pub use search::{DEFAULT_MAX_CANDIDATES, Search};
pub use users::{AccountSource, ListUsers, PasswdFile, SystemAccounts};
