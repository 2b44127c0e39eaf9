use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time")
        .as_nanos();
    std::env::temp_dir().join(format!("scorecard-mcp-{nanos}-{name}"))
}

fn send_and_receive(messages: &[&str], expected_responses: usize) -> Vec<serde_json::Value> {
    let global_config = unique_temp_path("absent-global.toml");
    let project_config = unique_temp_path("absent-project.toml");

    let mut child = Command::new(env!("CARGO_BIN_EXE_scorecard-mcp"))
        .args(["serve", "--mcp"])
        .env("SCORECARD_MCP_CONFIG_PATH", &global_config)
        .env("SCORECARD_MCP_PROJECT_CONFIG_PATH", &project_config)
        // Nothing in this file should reach the network.
        .env("SCORECARD_MCP_API_BASE_URL", "http://127.0.0.1:9")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start scorecard-mcp");

    let stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();

    let owned_messages: Vec<String> = messages.iter().map(|s| s.to_string()).collect();
    let writer = std::thread::spawn(move || {
        let mut stdin = stdin;
        for msg in &owned_messages {
            writeln!(stdin, "{msg}").unwrap();
            stdin.flush().unwrap();
        }
        std::thread::sleep(std::time::Duration::from_secs(2));
        drop(stdin);
    });

    let reader = BufReader::new(stdout);
    let mut responses = Vec::new();
    for line in reader.lines() {
        let line = line.unwrap();
        if line.trim().is_empty() {
            continue;
        }
        if let Ok(val) = serde_json::from_str::<serde_json::Value>(&line) {
            responses.push(val);
            if responses.len() >= expected_responses {
                break;
            }
        }
    }

    writer.join().unwrap();
    let _ = child.kill();
    let _ = child.wait();
    responses
}

const INIT: &str = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test","version":"0.1.0"}}}"#;
const INITIALIZED: &str = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;
const LIST_TOOLS: &str = r#"{"jsonrpc":"2.0","id":2,"method":"tools/list","params":{}}"#;
const LIST_PROMPTS: &str = r#"{"jsonrpc":"2.0","id":3,"method":"prompts/list","params":{}}"#;

#[test]
fn initialize_returns_tools_and_prompts_capabilities() {
    let responses = send_and_receive(&[INIT], 1);
    let init_resp = &responses[0];
    assert_eq!(init_resp["id"], 1);
    assert!(init_resp["result"]["capabilities"]["tools"].is_object());
    assert!(init_resp["result"]["capabilities"]["prompts"].is_object());
    assert_eq!(
        init_resp["result"]["protocolVersion"].as_str().unwrap(),
        "2024-11-05"
    );
}

#[test]
fn list_tools_contains_scorecard_tool() {
    let responses = send_and_receive(&[INIT, INITIALIZED, LIST_TOOLS], 2);
    let tools_resp = responses.iter().find(|r| r["id"] == 2).unwrap();
    let tools = tools_resp["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "OpenSSF-Scorecard");
    assert!(tools[0]["inputSchema"]["properties"]["package_name"].is_object());
}

#[test]
fn list_prompts_contains_scorecard_prompt() {
    let responses = send_and_receive(&[INIT, INITIALIZED, LIST_PROMPTS], 2);
    let prompts_resp = responses.iter().find(|r| r["id"] == 3).unwrap();
    let prompts = prompts_resp["result"]["prompts"].as_array().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0]["name"], "OpenSSF-Scorecard");
    assert_eq!(prompts[0]["arguments"][0]["name"], "package_name");
    assert_eq!(prompts[0]["arguments"][0]["required"], true);
}

#[test]
fn get_prompt_without_package_name_is_invalid_params() {
    let call = r#"{"jsonrpc":"2.0","id":4,"method":"prompts/get","params":{"name":"OpenSSF-Scorecard","arguments":{}}}"#;
    let responses = send_and_receive(&[INIT, INITIALIZED, call], 2);
    let resp = responses.iter().find(|r| r["id"] == 4).unwrap();
    assert_eq!(resp["error"]["code"], -32602);
    assert!(
        resp["error"]["message"]
            .as_str()
            .unwrap()
            .contains("package_name is required")
    );
}

#[test]
fn call_tool_with_bare_name_reports_expected_form() {
    let call = r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"OpenSSF-Scorecard","arguments":{"package_name":"scorecard"}}}"#;
    let responses = send_and_receive(&[INIT, INITIALIZED, call], 2);
    let resp = responses.iter().find(|r| r["id"] == 5).unwrap();
    assert_eq!(resp["error"]["code"], 400);
    assert!(
        resp["error"]["message"]
            .as_str()
            .unwrap()
            .contains("platform/owner/repository: scorecard")
    );
}
