//! Stdio front end for the lookahead completion scheduler.
//!
//! The editor writes one JSON request per line to stdin and reads deliveries
//! and synchronous responses, one JSON object per line, from stdout:
//!
//! ```text
//! → {"method":"sort","params":{"ctx":{"run_id":3,"step":1},"candidates":["b","a"]}}
//! ← {"type":"resolve","ctx":{"run_id":3,"step":1},"result":["a","b"]}
//! → {"id":7,"method":"extract_captures","params":{"pattern":"(ab)","string":"xab"}}
//! ← {"type":"response","id":7,"result":[[1,2]]}
//! ```

pub mod config;
pub mod dispatch;
pub mod host;
pub mod logging;
pub mod protocol;

pub use config::{Config, ConfigError};
pub use dispatch::Dispatcher;
pub use host::LineHost;
pub use protocol::{Message, Outbound, ProtocolError};
