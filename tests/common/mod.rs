use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

pub fn run_cli(args: &[&str], stdin_json: &str) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_agentlog"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn binary");

    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(stdin_json.as_bytes())
        .unwrap();

    let output = child.wait_with_output().unwrap();
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

pub fn start_input(cwd: &str, session: &str, id: &str, agent: &str) -> String {
    serde_json::json!({
        "hook_event_name": "SubagentStart",
        "session_id": session,
        "cwd": cwd,
        "agent_id": id,
        "agent_type": agent
    })
    .to_string()
}

pub fn stop_input(
    cwd: &str,
    session: &str,
    id: &str,
    agent: Option<&str>,
    transcript: Option<&str>,
) -> String {
    let mut value = serde_json::json!({
        "hook_event_name": "SubagentStop",
        "session_id": session,
        "cwd": cwd,
        "stop_hook_active": false,
        "agent_id": id
    });
    if let Some(agent) = agent {
        value["agent_type"] = serde_json::json!(agent);
    }
    if let Some(path) = transcript {
        value["agent_transcript_path"] = serde_json::json!(path);
    }
    value.to_string()
}

/// Read the event log for a session; empty string if it was never created.
pub fn read_log(cwd: &Path, session: &str) -> String {
    fs::read_to_string(cwd.join(".agentlog").join(format!("events-{session}.jsonl")))
        .unwrap_or_default()
}

pub fn read_summary(cwd: &Path, session: &str) -> String {
    fs::read_to_string(cwd.join(".agentlog").join(format!("summary-{session}.md")))
        .unwrap_or_default()
}

/// Write a minimal subagent transcript: one user instruction plus one
/// assistant turn invoking the named tools.
pub fn write_transcript(path: &Path, instruction: &str, tools: &[&str]) {
    let blocks: Vec<String> = tools
        .iter()
        .map(|n| format!(r#"{{"type":"tool_use","id":"t","name":"{n}","input":{{}}}}"#))
        .collect();
    let contents = format!(
        concat!(
            r#"{{"type":"user","message":{{"role":"user","content":{instr}}}}}"#,
            "\n",
            r#"{{"type":"assistant","message":{{"role":"assistant","content":[{blocks}]}}}}"#,
            "\n",
        ),
        instr = serde_json::to_string(instruction).unwrap(),
        blocks = blocks.join(","),
    );
    fs::write(path, contents).unwrap();
}
