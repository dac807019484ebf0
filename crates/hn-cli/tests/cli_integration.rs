#[path = "../../hn-client/tests/common/mod.rs"]
mod common;

use std::ffi::OsStr;
use std::process::{Command, Output};

use common::{MockResponse, MockServer};
use serde_json::Value;

fn run_hn<I, S>(api: &MockServer, args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_hn"))
        .arg("--base-url")
        .arg(api.base_url())
        .args(args)
        .env_remove("HN_BASE_URL")
        .env_remove("HN_MAX_WORKERS")
        .env("RUST_LOG", "off")
        .output()
        .unwrap_or_else(|err| panic!("failed to execute hn binary: {err}"))
}

fn run_json<I, S>(api: &MockServer, args: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = run_hn(api, args);
    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "hn command failed (status={}):\nstdout:\n{}\nstderr:\n{}",
            output.status, stdout, stderr
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    serde_json::from_str(&stdout)
        .unwrap_or_else(|err| panic!("stdout is not valid JSON: {err}\nstdout:\n{stdout}"))
}

fn ids(value: &Value) -> Vec<u64> {
    value
        .as_array()
        .unwrap_or_else(|| panic!("expected JSON array, got {value}"))
        .iter()
        .map(|item| {
            item.get("id").and_then(Value::as_u64).unwrap_or_else(|| panic!("item without id: {item}"))
        })
        .collect()
}

const STORY_1: &str = r#"{"by":"pg","id":1,"score":57,"time":1160418111,"title":"Y Combinator","type":"story","url":"http://ycombinator.com"}"#;
const STORY_2: &str = r#"{"by":"phyllis","id":2,"score":16,"time":1160418628,"title":"A Student&#x27;s Guide","type":"story"}"#;
const COMMENT_3: &str = r#"{"by":"pg","id":3,"parent":1,"text":"&quot;quoted&quot;","time":1160419233,"type":"comment"}"#;
const JOB_4: &str = r#"{"by":"justin","id":4,"score":6,"time":1210981217,"title":"Hiring &amp; more","type":"job"}"#;

fn api() -> MockServer {
    MockServer::start(
        [
            ("/item/1", STORY_1),
            ("/item/2", STORY_2),
            ("/item/3", COMMENT_3),
            ("/item/4", JOB_4),
            ("/user/pg", r#"{"id":"pg","karma":155111,"created":1160418092,"submitted":[3,1]}"#),
            ("/topstories", "[2,1,3,4]"),
            ("/jobstories", "[4]"),
            ("/maxitem", "4"),
            ("/updates", r#"{"items":[3,9],"profiles":["pg"]}"#),
        ]
        .into_iter()
        .map(|(path, body)| (path, MockResponse::json(body)))
        .collect(),
    )
}

#[test]
fn item_prints_unescaped_json() {
    let api = api();
    let item = run_json(&api, ["item", "2"]);
    assert_eq!(item.get("title").and_then(Value::as_str), Some("A Student's Guide"));
    assert_eq!(item.get("type").and_then(Value::as_str), Some("story"));
    assert!(item.get("parent").is_none(), "zero fields must be omitted: {item}");
}

#[test]
fn item_with_wrong_kind_fails() {
    let api = api();
    let output = run_hn(&api, ["item", "3", "--kind", "story"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("type mismatch"), "stderr was: {stderr}");
}

#[test]
fn missing_item_fails() {
    let api = api();
    let output = run_hn(&api, ["item", "99"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}

#[test]
fn items_keep_order_and_drop_missing() {
    let api = api();
    let items = run_json(&api, ["items", "4", "99", "1", "3", "--max-workers", "2"]);
    assert_eq!(ids(&items), vec![4, 1, 3]);

    let stories = run_json(&api, ["items", "4", "1", "3", "2", "--kind", "story"]);
    assert_eq!(ids(&stories), vec![1, 2]);
}

#[test]
fn top_sorts_by_score() {
    let api = api();
    let top = run_json(&api, ["top", "--limit", "3", "--sort", "score", "--order", "desc"]);
    assert_eq!(ids(&top), vec![1, 2, 3]);

    let ranked = run_json(&api, ["top", "--ids-only", "--limit", "0"]);
    assert_eq!(ranked, serde_json::json!([2, 1, 3, 4]));
}

#[test]
fn invalid_order_is_rejected() {
    let api = api();
    let output = run_hn(&api, ["top", "--order", "sideways"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("sideways"));
}

#[test]
fn job_list_is_projected() {
    let api = api();
    let jobs = run_json(&api, ["job"]);
    assert_eq!(ids(&jobs), vec![4]);
    assert_eq!(jobs[0].get("title").and_then(Value::as_str), Some("Hiring & more"));
}

#[test]
fn user_and_submissions() {
    let api = api();
    let user = run_json(&api, ["user", "pg"]);
    assert_eq!(user.get("karma").and_then(Value::as_i64), Some(155_111));

    let all = run_json(&api, ["submissions", "pg", "--sort", "id"]);
    assert_eq!(ids(&all), vec![1, 3]);

    let comments = run_json(&api, ["submissions", "pg", "--kind", "comment"]);
    assert_eq!(ids(&comments), vec![3]);
    assert_eq!(comments[0].get("text").and_then(Value::as_str), Some("\"quoted\""));
}

#[test]
fn live_commands() {
    let api = api();
    assert_eq!(run_json(&api, ["max-id"]), serde_json::json!(4));

    let recent = run_json(&api, ["recent", "2", "--sort", "time", "--order", "desc"]);
    assert_eq!(ids(&recent), vec![4, 3, 2]);

    let updates = run_json(&api, ["updates"]);
    assert_eq!(updates.get("profiles"), Some(&serde_json::json!(["pg"])));

    let updated = run_json(&api, ["updates", "--items"]);
    assert_eq!(ids(&updated), vec![3]);
}
