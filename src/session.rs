use anyhow::{Context, Result};
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::event::{EventKind, LifecycleEvent, TIME_FORMAT};
use crate::preferences::Preferences;
use crate::summary;
use crate::transcript;
use crate::types::{SubagentStartInput, SubagentStopInput, or_unknown};

const DATA_DIR: &str = ".agentlog";

/// One hook invocation's view of a session: the data directory under the
/// host-supplied working directory, plus loaded preferences.
pub struct Session {
    dir: PathBuf,
    session_id: String,
    pub prefs: Preferences,
}

impl Session {
    /// Resolve `.agentlog/` under `cwd`, creating it if absent, and load
    /// preferences. Failing to create the directory fails this one hook
    /// call; nothing already on disk is touched.
    pub fn open(cwd: &str, session_id: &str) -> Result<Self> {
        let dir = Path::new(cwd).join(DATA_DIR);
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let prefs = Preferences::load(&dir)?;
        Ok(Self {
            dir,
            session_id: session_id.to_string(),
            prefs,
        })
    }

    // ---------------------------------------------------------------
    // Private path helpers
    // ---------------------------------------------------------------

    fn log_path(&self) -> PathBuf {
        self.dir.join(format!("events-{}.jsonl", self.session_id))
    }

    fn summary_path(&self) -> PathBuf {
        self.dir.join(format!("summary-{}.md", self.session_id))
    }

    fn raw_capture_path(&self) -> PathBuf {
        self.dir.join("raw-input.jsonl")
    }

    // ---------------------------------------------------------------
    // Event recording
    // ---------------------------------------------------------------

    /// The recorder's own clock is the authority on when an event was
    /// durably recorded; host-supplied times are never used.
    fn now() -> String {
        Utc::now().format(TIME_FORMAT).to_string()
    }

    /// Append one serialized record to the session's event log.
    /// Append-only: prior lines are never rewritten, and a failure here
    /// fails only this hook call.
    fn append(&self, event: &LifecycleEvent) -> Result<()> {
        let path = self.log_path();
        let line = serde_json::to_string(event).context("serializing event")?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening {}", path.display()))?;
        writeln!(file, "{line}")
            .with_context(|| format!("appending to {}", path.display()))?;
        Ok(())
    }

    /// Record a subagent start.
    pub fn record_start(&self, input: &SubagentStartInput) -> Result<()> {
        let event = LifecycleEvent {
            kind: EventKind::Start,
            agent: or_unknown(input.agent_type.as_deref()).to_string(),
            id: or_unknown(input.agent_id.as_deref()).to_string(),
            session: self.session_id.clone(),
            time: Self::now(),
            description: None,
            tools: None,
            tool_count: None,
        };
        self.append(&event)
    }

    /// Record a subagent stop, enriched with facts mined from its
    /// transcript, then rebuild the session summary.
    ///
    /// A stop with no identifiable originating agent cannot be reconciled
    /// against a start, so it is dropped without touching the log.
    pub fn record_stop(&self, input: &SubagentStopInput) -> Result<()> {
        let agent = or_unknown(input.agent_type.as_deref());
        if agent == "unknown" {
            return Ok(());
        }

        // Extraction degrades silently: a missing or malformed transcript
        // still records the stop, just without facts.
        let facts = input
            .agent_transcript_path
            .as_deref()
            .map(|p| transcript::extract(Path::new(p)))
            .unwrap_or_default();

        let event = LifecycleEvent {
            kind: EventKind::Stop,
            agent: agent.to_string(),
            id: or_unknown(input.agent_id.as_deref()).to_string(),
            session: self.session_id.clone(),
            time: Self::now(),
            description: Some(facts.description),
            tools: Some(facts.tools_used),
            tool_count: Some(facts.tool_count),
        };
        self.append(&event)?;

        if self.prefs.rebuild_summary {
            self.write_summary()?;
        }
        Ok(())
    }

    /// Rebuild the summary document from the full event log, replacing the
    /// previous artifact.
    pub fn write_summary(&self) -> Result<()> {
        let doc = summary::rebuild(&self.log_path())?;
        let path = self.summary_path();
        fs::write(&path, doc).with_context(|| format!("writing {}", path.display()))
    }

    /// Append the raw stdin payload verbatim to the diagnostic capture log.
    /// Pure passthrough; never read back.
    pub fn capture_raw(&self, raw: &str) -> Result<()> {
        let path = self.raw_capture_path();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening {}", path.display()))?;
        writeln!(file, "{}", raw.trim_end())
            .with_context(|| format!("appending to {}", path.display()))?;
        Ok(())
    }
}
