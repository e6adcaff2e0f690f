//! Integration tests for the CLI commands.
//!
//! These run the built binary against `docs/fixtures` (or an empty temporary
//! directory to force the built-in fixtures) and check stdout, stderr and exit
//! codes.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Directory holding the CSV fixtures.
fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("rentdesk-cli").expect("binary exists");
    cmd.env_remove("RENTDESK_DATA_DIR").env_remove("RUST_LOG");
    cmd.arg("--data-dir").arg(fixture_dir());
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("run cli");
    assert!(output.status.success(), "cli failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn orders_lists_matches() {
    cli()
        .args(["orders", "--phone", "17796025359"])
        .assert()
        .success()
        .stdout(predicate::str::contains("找到 2 个订单"))
        .stdout(predicate::str::contains("PO202508281731220067"))
        .stdout(predicate::str::contains("银联支付"));
}

#[test]
fn orders_no_match() {
    cli()
        .args(["orders", "--phone", "13900000000"])
        .assert()
        .success()
        .stdout("未找到手机号 13900000000 对应的订单信息。\n");
}

#[test]
fn orders_rejects_malformed_phone() {
    cli()
        .args(["orders", "--phone", "12345"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("手机号格式不正确"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn orders_json_output() {
    let value = json_stdout(cli().args(["--format", "json", "orders", "--phone", "17798762697"]));
    assert_eq!(value["phone"], "17798762697");
    assert_eq!(value["count"], 1);
    assert_eq!(value["orders"][0]["status"], "已暂停");
}

#[test]
fn stores_ranked_nearest_first() {
    let value = json_stdout(cli().args([
        "stores", "--lat", "31.24", "--lon", "121.49", "--limit", "2", "--format", "json",
    ]));
    assert_eq!(value["count"], 2);
    assert_eq!(value["stores"][0]["name"], "上海外滩-150分店");
    assert_eq!(value["stores"][1]["name"], "上海外滩-171分店");
}

#[test]
fn stores_default_limit_returns_everything_in_small_dataset() {
    let value = json_stdout(cli().args([
        "--format", "json", "stores", "--lat", "22.5", "--lon", "114.1",
    ]));
    assert_eq!(value["limit"], 10);
    assert_eq!(value["count"], 6);
    assert_eq!(value["stores"][0]["name"], "深圳华强北店");
}

#[test]
fn stores_accepts_negative_coordinates() {
    cli()
        .args(["stores", "--lat", "-33.86", "--lon", "151.2", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("最近的 1 个网点"));
}

#[test]
fn stores_rejects_out_of_range_input() {
    cli()
        .args(["stores", "--lat", "91", "--lon", "116"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("纬度必须在-90到90之间"));

    cli()
        .args(["stores", "--lat", "39.9", "--lon", "116.4", "--limit", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("返回数量必须在1到50之间"));
}

#[test]
fn check_reports_csv_datasets() {
    cli()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("stores: 6 records from"))
        .stdout(predicate::str::contains("orders: 5 records from"))
        .stdout(predicate::str::contains("distinct phones: 4"))
        .stdout(predicate::str::contains("stores: 1 records missing 经纬度"));
}

#[test]
fn check_strict_fails_on_problems() {
    cli()
        .args(["check", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("data check failed"));
}

#[test]
fn check_falls_back_to_fixtures_for_empty_dir() {
    let temp = TempDir::new().expect("create temp dir");
    let value = json_stdout(
        Command::cargo_bin("rentdesk-cli")
            .expect("binary exists")
            .env_remove("RENTDESK_DATA_DIR")
            .arg("--data-dir")
            .arg(temp.path())
            .args(["--format", "json", "check"]),
    );

    assert_eq!(value["stores"]["source"]["source"], "fixture");
    assert_eq!(value["orders"]["source"]["reason"]["kind"], "missing");
    assert!(value["stores"]["records"].as_u64().unwrap() > 0);
}

#[test]
fn check_reports_unreadable_file() {
    let temp = TempDir::new().expect("create temp dir");
    fs::copy(
        fixture_dir().join("stores.csv"),
        temp.path().join("stores.csv"),
    )
    .expect("copy stores");
    fs::write(temp.path().join("orders.csv"), "foo,bar\n1,2\n").expect("write orders");

    let value = json_stdout(
        Command::cargo_bin("rentdesk-cli")
            .expect("binary exists")
            .env_remove("RENTDESK_DATA_DIR")
            .arg("--data-dir")
            .arg(temp.path())
            .args(["--format", "json", "check"]),
    );

    assert_eq!(value["stores"]["source"]["source"], "file");
    assert_eq!(value["orders"]["source"]["source"], "fixture");
    assert_eq!(value["orders"]["source"]["reason"]["kind"], "unreadable");
}

#[test]
fn mcp_subcommand_serves_stdio() {
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"query_order","arguments":{"phone":"17798762697"}}}"#,
        "\n",
    );

    let output = cli().arg("mcp").write_stdin(input).output().expect("run mcp");
    assert!(output.status.success());

    let responses: Vec<Value> = String::from_utf8(output.stdout)
        .expect("utf8 stdout")
        .lines()
        .map(|line| serde_json::from_str(line).expect("JSON line"))
        .collect();

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(responses[1]["id"], 2);
    let text = responses[1]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("找到 1 个订单："));
}
