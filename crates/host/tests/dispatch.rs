use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lookahead_host::{Config, Dispatcher, LineHost, ProtocolError};
use lookahead_ops::{AccountSource, SystemAccounts};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

const WAIT: Duration = Duration::from_secs(5);
const QUIET: Duration = Duration::from_millis(150);

#[derive(Clone, Default)]
struct Output(Arc<Mutex<Vec<u8>>>);

impl Write for Output {
	fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
		self.0.lock().extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> std::io::Result<()> {
		Ok(())
	}
}

impl Output {
	fn lines(&self) -> Vec<Value> {
		let bytes = self.0.lock().clone();
		String::from_utf8(bytes)
			.expect("utf-8")
			.lines()
			.map(|line| serde_json::from_str(line).expect("json line"))
			.collect()
	}

	/// Polls until at least `count` lines are written.
	fn wait_for(&self, count: usize) -> Vec<Value> {
		let deadline = Instant::now() + WAIT;
		loop {
			let lines = self.lines();
			if lines.len() >= count || Instant::now() > deadline {
				return lines;
			}
			std::thread::sleep(Duration::from_millis(5));
		}
	}
}

fn start() -> (Dispatcher<Output>, Output) {
	let output = Output::default();
	let config = Config {
		workers: 2,
		..Config::default()
	};
	let dispatcher = Dispatcher::start(config, LineHost::new(output.clone())).expect("dispatcher starts");
	(dispatcher, output)
}

#[test]
fn empty_search_resolves_without_scheduling() {
	let (dispatcher, output) = start();
	dispatcher
		.handle_line(r#"{"method":"search","params":{"ctx":{"run_id":1,"step":0},"pattern":"","lines":["foo"]}}"#)
		.expect("handled");

	assert_eq!(output.lines(), vec![json!({ "type": "resolve", "ctx": { "run_id": 1, "step": 0 }, "result": [] })]);
	dispatcher.shutdown();
}

#[test]
fn search_resolves_matches_from_buffer_lines() {
	let (dispatcher, output) = start();
	dispatcher
		.handle_line(r#"{"method":"search","params":{"ctx":{"run_id":1,"step":0,"buffer":4},"pattern":"\\w+","lines":["alpha beta","gamma alpha"]}}"#)
		.expect("handled");

	let lines = output.wait_for(1);
	assert_eq!(
		lines,
		vec![json!({
			"type": "resolve",
			"ctx": { "run_id": 1, "step": 0, "buffer": 4 },
			"result": ["alpha", "beta", "gamma"]
		})]
	);
	dispatcher.shutdown();
}

#[rstest]
#[case::groups("(ab)(cd)", "xxabcdyy", json!([[2, 3], [4, 5]]))]
#[case::no_match("(z)", "abc", json!([]))]
fn captures_answer_synchronously(#[case] pattern: &str, #[case] string: &str, #[case] expected: Value) {
	let (dispatcher, output) = start();
	let line = json!({ "id": 7, "method": "extract_captures", "params": { "pattern": pattern, "string": string } }).to_string();
	dispatcher.handle_line(&line).expect("handled");

	assert_eq!(output.lines(), vec![json!({ "type": "response", "id": 7, "result": expected })]);
	dispatcher.shutdown();
}

#[test]
fn captures_without_id_are_refused() {
	let (dispatcher, output) = start();
	let err = dispatcher
		.handle_line(r#"{"method":"extract_captures","params":{"pattern":"(a)","string":"a"}}"#)
		.expect_err("needs an id");

	assert!(matches!(err, ProtocolError::MissingId(_)), "{err}");
	assert!(output.lines().is_empty());
	dispatcher.shutdown();
}

#[test]
fn captures_report_bad_patterns() {
	let (dispatcher, output) = start();
	dispatcher
		.handle_line(r#"{"id":3,"method":"extract_captures","params":{"pattern":"(","string":"a"}}"#)
		.expect("handled");

	let lines = output.lines();
	assert_eq!(lines.len(), 1);
	assert_eq!(lines[0]["type"], "error");
	assert_eq!(lines[0]["id"], 3);
	assert!(lines[0]["message"].as_str().expect("message").starts_with("extract_captures: "));
	dispatcher.shutdown();
}

#[test]
fn unknown_method_with_id_gets_an_error() {
	let (dispatcher, output) = start();
	let err = dispatcher.handle_line(r#"{"id":9,"method":"teleport","params":{}}"#).expect_err("unknown");

	assert!(matches!(err, ProtocolError::UnknownMethod(ref name) if name == "teleport"));
	assert_eq!(output.lines(), vec![json!({ "type": "error", "id": 9, "message": "unknown method 'teleport'" })]);
	dispatcher.shutdown();
}

#[test]
fn malformed_lines_are_errors() {
	let (dispatcher, output) = start();
	let err = dispatcher.handle_line("{not json").expect_err("malformed");

	assert!(matches!(err, ProtocolError::Malformed(_)));
	assert!(output.lines().is_empty());
	dispatcher.shutdown();
}

#[test]
fn newer_run_supersedes_a_pending_delay() {
	let (dispatcher, output) = start();
	dispatcher
		.handle_line(r#"{"method":"delay","params":{"ctx":{"run_id":1,"step":0},"seconds":2.0,"value":["slow"]}}"#)
		.expect("handled");
	dispatcher
		.handle_line(r#"{"method":"sort","params":{"ctx":{"run_id":2,"step":0},"candidates":["b","a"]}}"#)
		.expect("handled");

	let lines = output.wait_for(1);
	assert_eq!(lines, vec![json!({ "type": "resolve", "ctx": { "run_id": 2, "step": 0 }, "result": ["a", "b"] })]);

	std::thread::sleep(QUIET);
	assert_eq!(output.lines().len(), 1);
	dispatcher.shutdown();
}

#[test]
fn stale_requests_are_dropped_silently() {
	let (dispatcher, output) = start();
	dispatcher
		.handle_line(r#"{"method":"uniq","params":{"ctx":{"run_id":5,"step":0},"candidates":["a","a"]}}"#)
		.expect("handled");
	assert_eq!(output.wait_for(1).len(), 1);

	dispatcher
		.handle_line(r#"{"method":"uniq","params":{"ctx":{"run_id":4,"step":0},"candidates":["b"]}}"#)
		.expect("stale is not a protocol error");
	std::thread::sleep(QUIET);

	assert_eq!(output.lines(), vec![json!({ "type": "resolve", "ctx": { "run_id": 5, "step": 0 }, "result": ["a"] })]);
	dispatcher.shutdown();
}

#[test]
fn failing_operation_rejects_with_its_name() {
	let (dispatcher, output) = start();
	dispatcher
		.handle_line(r#"{"method":"filter","params":{"ctx":{"run_id":1,"step":0},"pattern":"(","candidates":["a"]}}"#)
		.expect("handled");

	let lines = output.wait_for(1);
	assert_eq!(lines.len(), 1);
	assert_eq!(lines[0]["type"], "reject");
	assert!(lines[0]["result"].as_str().expect("reason").starts_with("filter: "), "{}", lines[0]);
	dispatcher.shutdown();
}

#[test]
fn fuzzy_match_uses_the_configured_scorer() {
	let (dispatcher, output) = start();
	dispatcher
		.handle_line(r#"{"method":"fuzzy_match","params":{"ctx":{"run_id":1,"step":0},"candidates":["zzz","edit","editor"],"query":"edit","partial":false}}"#)
		.expect("handled");

	let lines = output.wait_for(1);
	assert_eq!(lines[0]["type"], "resolve");
	assert_eq!(lines[0]["result"][0], "edit");
	dispatcher.shutdown();
}

#[test]
fn list_files_over_the_protocol() {
	let dir = tempfile::tempdir().expect("tempdir");
	std::fs::write(dir.path().join("b.txt"), "").expect("write");
	std::fs::write(dir.path().join("a.txt"), "").expect("write");
	std::fs::create_dir(dir.path().join("sub")).expect("mkdir");

	let (dispatcher, output) = start();
	let line = json!({
		"method": "list_files",
		"params": {
			"ctx": { "run_id": 1, "step": 0 },
			"working_directory": dir.path(),
			"expand_arg": "",
			"expand_type": "file"
		}
	})
	.to_string();
	dispatcher.handle_line(&line).expect("handled");

	let lines = output.wait_for(1);
	assert_eq!(lines, vec![json!({ "type": "resolve", "ctx": { "run_id": 1, "step": 0 }, "result": ["a.txt", "b.txt", "sub/"] })]);
	dispatcher.shutdown();
}

#[test]
fn list_users_reads_the_configured_database() {
	let dir = tempfile::tempdir().expect("tempdir");
	let passwd = dir.path().join("passwd");
	std::fs::write(&passwd, "root:x:0:0::/root:/bin/sh\nrita:x:1000:1000::/home/rita:/bin/sh\nbob:x:1001:1001::/home/bob:/bin/sh\n").expect("write");

	let output = Output::default();
	let mut config = Config { workers: 1, ..Config::default() };
	config.users.passwd = Some(passwd);
	let dispatcher = Dispatcher::start(config, LineHost::new(output.clone())).expect("dispatcher starts");
	dispatcher
		.handle_line(r#"{"method":"list_users","params":{"ctx":{"run_id":1,"step":0},"prefix":"r"}}"#)
		.expect("handled");

	let lines = output.wait_for(1);
	assert_eq!(lines, vec![json!({ "type": "resolve", "ctx": { "run_id": 1, "step": 0 }, "result": ["rita", "root"] })]);
	dispatcher.shutdown();
}

#[test]
fn list_users_defaults_to_the_system_accounts() {
	let expected: Vec<String> = {
		let mut names: Vec<String> = SystemAccounts.account_names().expect("account database readable").into_iter().filter(|n| n.starts_with("ro")).collect();
		names.sort();
		names
	};

	let (dispatcher, output) = start();
	dispatcher
		.handle_line(r#"{"method":"list_users","params":{"ctx":{"run_id":1,"step":0},"prefix":"ro"}}"#)
		.expect("handled");

	let lines = output.wait_for(1);
	assert_eq!(lines, vec![json!({ "type": "resolve", "ctx": { "run_id": 1, "step": 0 }, "result": expected })]);
	dispatcher.shutdown();
}
