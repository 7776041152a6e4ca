use serde::Deserialize;

// ===================================================================
// Hook Input Types (received via stdin, snake_case JSON)
// ===================================================================

/// Fields shared by all hook event inputs.
///
/// Every field is optional for this subsystem: the host is expected to
/// supply them, but a notification missing any of them is still recorded
/// with the documented defaults rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommonInput {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub transcript_path: Option<String>,
    #[serde(default)]
    pub cwd: Option<String>,
}

impl CommonInput {
    /// Session identifier, defaulting to `"unknown"` when the host
    /// omitted it.
    pub fn session(&self) -> &str {
        self.session_id.as_deref().unwrap_or("unknown")
    }

    /// Working directory all log/summary paths resolve against.
    /// Falls back to the current directory when absent.
    pub fn working_dir(&self) -> &str {
        self.cwd.as_deref().unwrap_or(".")
    }
}

#[derive(Debug, Deserialize)]
pub struct SubagentStartInput {
    #[serde(flatten)]
    pub common: CommonInput,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub agent_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubagentStopInput {
    #[serde(flatten)]
    pub common: CommonInput,
    #[serde(default)]
    pub stop_hook_active: Option<bool>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub agent_type: Option<String>,
    /// Path to the subagent's own JSONL transcript, mined for the summary.
    #[serde(default)]
    pub agent_transcript_path: Option<String>,
}

/// Top-level hook input, deserialized from stdin JSON.
///
/// Tagged by the `hook_event_name` field. The host emits many event kinds
/// over a session; only the subagent lifecycle pair is acted on, and every
/// other kind lands in `Other` and is ignored.
#[derive(Debug, Deserialize)]
#[serde(tag = "hook_event_name")]
pub enum HookInput {
    SubagentStart(SubagentStartInput),
    SubagentStop(SubagentStopInput),
    #[serde(other)]
    Other,
}

/// Normalize an optional identity field to `"unknown"` when absent or blank.
pub fn or_unknown(value: Option<&str>) -> &str {
    match value {
        Some(s) if !s.trim().is_empty() => s,
        _ => "unknown",
    }
}
