//! End-to-end tests for the rentdesk-mcp binary over stdin/stdout.
//!
//! Requests are piped in one per line; the server exits on EOF and every
//! line it wrote to stdout must be a JSON-RPC response.

use assert_cmd::Command;
use serde_json::{json, Value};

fn run_session(data_dir: &std::path::Path, requests: &[Value]) -> Vec<Value> {
    let input: String = requests.iter().map(|r| format!("{r}\n")).collect();

    let output = Command::cargo_bin("rentdesk-mcp")
        .expect("binary built")
        .arg("--data-dir")
        .arg(data_dir)
        .env("RUST_LOG", "info")
        .write_stdin(input)
        .output()
        .expect("run rentdesk-mcp");

    assert!(output.status.success(), "server exited with {:?}", output.status);

    String::from_utf8(output.stdout)
        .expect("stdout is utf-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line is JSON"))
        .collect()
}

#[test]
fn test_initialize_and_list_tools_over_stdio() {
    let dir = tempfile::tempdir().unwrap();
    let responses = run_session(
        dir.path(),
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list", "params": {}}),
        ],
    );

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "rentdesk");
    let names: Vec<_> = responses[1]["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["query_order", "query_stores"]);
}

#[test]
fn test_query_order_against_fixture_fallback() {
    // Empty data directory: both datasets come from the built-in fixtures.
    let dir = tempfile::tempdir().unwrap();
    let responses = run_session(
        dir.path(),
        &[json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {"name": "query_order", "arguments": {"phone": "17798762697"}}
        })],
    );

    let text = responses[0]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("PO202508281731220218"));
    assert!(text.contains("已暂停"));
}

#[test]
fn test_unknown_method_over_stdio() {
    let dir = tempfile::tempdir().unwrap();
    let responses = run_session(
        dir.path(),
        &[json!({"jsonrpc": "2.0", "id": 9, "method": "prompts/list"})],
    );
    assert_eq!(responses[0]["id"], 9);
    assert_eq!(responses[0]["error"]["code"], -32601);
}
