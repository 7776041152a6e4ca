use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Wire format for the UTC `time` field on every log line. One canonical
/// format, one parser; anything else is a parse failure, not a fallback.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Lifecycle phase of a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Start,
    Stop,
}

/// One immutable line in the append-only event log.
/// Stored as `.agentlog/events-{session_id}.jsonl`.
///
/// The Stop-only fields are omitted from Start lines entirely rather than
/// serialized as null, so the log stays greppable by key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleEvent {
    pub kind: EventKind,
    pub agent: String,
    pub id: String,
    pub session: String,
    /// Recorder-side UTC instant, `TIME_FORMAT`, second precision. The
    /// recorder's clock is authoritative; host timestamps are ignored.
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Distinct tool names invoked during the run. A `BTreeSet` so the
    /// serialized order (and later rendering) is stable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_count: Option<u64>,
}
