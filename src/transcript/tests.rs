use super::*;
use std::io::Write as _;

fn transcript_file(lines: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn user_text(text: &str) -> String {
    format!(
        r#"{{"type":"user","uuid":"u","isSidechain":false,"message":{{"role":"user","content":{}}}}}"#,
        serde_json::to_string(text).unwrap()
    )
}

fn assistant_tools(names: &[&str]) -> String {
    let blocks: Vec<String> = names
        .iter()
        .map(|n| format!(r#"{{"type":"tool_use","id":"t","name":"{n}","input":{{}}}}"#))
        .collect();
    format!(
        r#"{{"type":"assistant","uuid":"a","message":{{"role":"assistant","content":[{}]}}}}"#,
        blocks.join(",")
    )
}

// =================================================================
// Description extraction
// =================================================================

#[test]
fn description_is_first_plain_text_user_turn() {
    let file = transcript_file(&[
        &user_text("fix the login bug"),
        &assistant_tools(&["Read"]),
        &user_text("a later instruction"),
    ]);
    let facts = extract(file.path());
    assert_eq!(facts.description, "fix the login bug");
}

#[test]
fn structured_user_turns_are_skipped_for_description() {
    // Tool results come back as user turns with block-array content; the
    // first plain-string turn after them is still the instruction.
    let file = transcript_file(&[
        r#"{"type":"user","message":{"role":"user","content":[{"type":"tool_result","tool_use_id":"t","content":"ok"}]}}"#,
        &user_text("the real instruction"),
    ]);
    let facts = extract(file.path());
    assert_eq!(facts.description, "the real instruction");
}

#[test]
fn description_truncated_to_80_chars() {
    let long = "x".repeat(200);
    let file = transcript_file(&[&user_text(&long)]);
    let facts = extract(file.path());
    assert_eq!(facts.description.chars().count(), 80);
}

#[test]
fn no_user_text_means_empty_description() {
    let file = transcript_file(&[&assistant_tools(&["Bash"])]);
    let facts = extract(file.path());
    assert_eq!(facts.description, "");
}

// =================================================================
// Tool extraction
// =================================================================

#[test]
fn tools_deduplicated_but_count_totals_invocations() {
    let file = transcript_file(&[
        &user_text("do things"),
        &assistant_tools(&["Read", "Write"]),
        &assistant_tools(&["Read", "Read"]),
    ]);
    let facts = extract(file.path());
    assert_eq!(facts.tool_count, 4);
    let names: Vec<&str> = facts.tools_used.iter().map(|s| s.as_str()).collect();
    assert_eq!(names, ["Read", "Write"]);
}

#[test]
fn non_tool_blocks_are_ignored() {
    let file = transcript_file(&[
        r#"{"type":"assistant","message":{"role":"assistant","content":[{"type":"text","text":"hi"},{"type":"thinking","thinking":"hmm"}]}}"#,
    ]);
    let facts = extract(file.path());
    assert_eq!(facts.tool_count, 0);
    assert!(facts.tools_used.is_empty());
}

// =================================================================
// Degradation
// =================================================================

#[test]
fn missing_file_yields_empty_facts() {
    let facts = extract(Path::new("/nonexistent/transcript.jsonl"));
    assert_eq!(facts, TranscriptFacts::default());
    assert!(facts.is_empty());
}

#[test]
fn malformed_lines_are_skipped() {
    let file = transcript_file(&[
        "not json at all",
        r#"{"type":"progress","data":{}}"#,
        &user_text("still extracted"),
        r#"{"unexpected":"shape"}"#,
        &assistant_tools(&["Grep"]),
    ]);
    let facts = extract(file.path());
    assert_eq!(facts.description, "still extracted");
    assert_eq!(facts.tool_count, 1);
}
