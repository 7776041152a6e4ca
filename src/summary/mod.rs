use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use minijinja::{Environment, context};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::Path;

use crate::event::{EventKind, LifecycleEvent, TIME_FORMAT};

/// Maximum rendered length of the task description column.
const TASK_LIMIT: usize = 50;

/// Rendered summary document. Whitespace-controlled so the output is
/// byte-stable for a given log content.
const TEMPLATE: &str = "\
# Subagent Activity

# | Agent | Status | Duration | Tools | Task
{% for row in rows -%}
{{ row.seq }} | {{ row.agent }} | {{ row.status }} | {{ row.duration }} | {{ row.tools }} | {{ row.task }}
{% endfor -%}
Total: {{ total }} | Completed: {{ completed }} | Running: {{ running }}
";

// ===================================================================
// Replay state machine
// ===================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
}

/// Replay-time reconstruction of one invocation's lifecycle. Derived from
/// the log on every rebuild, never persisted.
#[derive(Debug)]
pub struct AgentRun {
    pub agent: String,
    pub status: RunStatus,
    pub started_at: String,
    pub stopped_at: Option<String>,
    pub description: String,
    pub tools: BTreeSet<String>,
    pub tool_count: u64,
}

impl AgentRun {
    fn begin(event: &LifecycleEvent) -> Self {
        Self {
            agent: event.agent.clone(),
            status: RunStatus::Running,
            started_at: event.time.clone(),
            stopped_at: None,
            description: String::new(),
            tools: BTreeSet::new(),
            tool_count: 0,
        }
    }

    fn complete(&mut self, event: &LifecycleEvent) {
        self.status = RunStatus::Completed;
        self.stopped_at = Some(event.time.clone());
        self.description = event.description.clone().unwrap_or_default();
        self.tools = event.tools.clone().unwrap_or_default();
        self.tool_count = event.tool_count.unwrap_or(0);
    }

    /// Wall-clock seconds between start and stop. `None` until the run
    /// completes, or when either timestamp fails to parse.
    pub fn duration_secs(&self) -> Option<i64> {
        let stopped = self.stopped_at.as_deref()?;
        let start = NaiveDateTime::parse_from_str(&self.started_at, TIME_FORMAT).ok()?;
        let stop = NaiveDateTime::parse_from_str(stopped, TIME_FORMAT).ok()?;
        Some((stop - start).num_seconds())
    }
}

/// Replay the event log into runs, in first-seen Start order.
///
/// An invocation id maps to exactly one run: the first Start wins and later
/// Starts for the same id are ignored; a Stop with no prior Start is an
/// orphan and dropped. The recorder filters orphans too, but the log may
/// have been hand-edited or truncated, so replay enforces it again.
/// Unparseable lines are skipped.
pub fn replay(log: &str) -> Vec<AgentRun> {
    let mut runs: Vec<AgentRun> = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new(); // id → index into runs

    for line in log.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Ok(event) = serde_json::from_str::<LifecycleEvent>(line) else {
            continue;
        };
        match event.kind {
            EventKind::Start => {
                if !by_id.contains_key(&event.id) {
                    by_id.insert(event.id.clone(), runs.len());
                    runs.push(AgentRun::begin(&event));
                }
            }
            EventKind::Stop => {
                if let Some(&i) = by_id.get(&event.id) {
                    runs[i].complete(&event);
                }
            }
        }
    }
    runs
}

// ===================================================================
// Rendering
// ===================================================================

/// One pre-formatted table row handed to the template.
#[derive(Debug, Serialize)]
struct Row {
    seq: usize,
    agent: String,
    status: &'static str,
    duration: String,
    tools: String,
    task: String,
}

/// `"{s}s"` under a minute, `"{m}m{s}s"` from there up. Negative and zero
/// values render as computed.
pub fn format_duration(secs: i64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else {
        format!("{}m{}s", secs / 60, secs % 60)
    }
}

fn format_tools(run: &AgentRun) -> String {
    if run.tool_count == 0 {
        return "-".to_string();
    }
    let names: Vec<&str> = run.tools.iter().map(|s| s.as_str()).collect();
    format!("{} ({})", names.join(","), run.tool_count)
}

fn format_task(description: &str) -> String {
    if description.is_empty() {
        return "-".to_string();
    }
    match description.char_indices().nth(TASK_LIMIT) {
        None => description.to_string(),
        Some((byte_idx, _)) => format!("{}...", &description[..byte_idx]),
    }
}

fn row(seq: usize, run: &AgentRun) -> Row {
    let (status, duration) = match run.status {
        RunStatus::Running => ("Running", "-".to_string()),
        RunStatus::Completed => (
            "Completed",
            run.duration_secs()
                .map(format_duration)
                .unwrap_or_else(|| "-".to_string()),
        ),
    };
    Row {
        seq,
        agent: run.agent.clone(),
        status,
        duration,
        tools: match run.status {
            RunStatus::Running => "-".to_string(),
            RunStatus::Completed => format_tools(run),
        },
        task: format_task(&run.description),
    }
}

/// Render the summary document for a set of replayed runs.
pub fn render(runs: &[AgentRun]) -> Result<String> {
    let rows: Vec<Row> = runs.iter().enumerate().map(|(i, r)| row(i + 1, r)).collect();
    let completed = runs
        .iter()
        .filter(|r| r.status == RunStatus::Completed)
        .count();
    let running = runs.len() - completed;

    let env = Environment::new();
    let tmpl = env
        .template_from_str(TEMPLATE)
        .context("parsing summary template")?;
    tmpl.render(context! { rows, total => runs.len(), completed, running })
        .context("rendering summary")
}

/// Rebuild the summary document from the full log at `log_path`.
///
/// Pure function of the log content at call time: a missing log is an empty
/// log, and the same content always yields byte-identical output.
pub fn rebuild(log_path: &Path) -> Result<String> {
    let log = match fs::read_to_string(log_path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("reading {}", log_path.display()));
        }
    };
    render(&replay(&log))
}
