use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

const FILENAME: &str = "agentlog.toml";

/// User-facing preferences stored in `.agentlog/agentlog.toml`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Preferences {
    /// Append every raw hook notification verbatim to `raw-input.jsonl`.
    /// Equivalent to always passing `--debug`.
    #[serde(default)]
    pub capture_raw: bool,

    /// Rebuild the session summary after every recorded stop. Disable to
    /// keep only the raw event log.
    #[serde(default = "default_rebuild_summary")]
    pub rebuild_summary: bool,
}

fn default_rebuild_summary() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            capture_raw: false,
            rebuild_summary: default_rebuild_summary(),
        }
    }
}

impl Preferences {
    /// Load preferences from `.agentlog/agentlog.toml`.
    ///
    /// If the file doesn't exist it is created with defaults. Missing keys
    /// in an existing file are filled in with defaults via serde.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(FILENAME);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let prefs: Preferences = toml::from_str(&contents)
                    .with_context(|| format!("parsing {}", path.display()))?;
                Ok(prefs)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let prefs = Preferences::default();
                let toml_str = toml::to_string_pretty(&prefs)
                    .context("serializing default preferences")?;
                fs::write(&path, &toml_str)
                    .with_context(|| format!("writing default {}", path.display()))?;
                Ok(prefs)
            }
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }
}
