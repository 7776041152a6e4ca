use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

// ===================================================================
// Top-level transcript entry — one per JSONL line
// ===================================================================

/// A single line in a Claude Code `.jsonl` transcript file.
///
/// Discriminated by the `type` field. Only conversation entries matter for
/// fact extraction; every other line type (progress, system,
/// file-history-snapshot, ...) collapses into `Other` and is skipped.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum TranscriptEntry {
    #[serde(rename = "user")]
    User(ConversationEntry),
    #[serde(rename = "assistant")]
    Assistant(ConversationEntry),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct ConversationEntry {
    pub message: Message,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: MessageContent,
}

/// `message.content` is a plain string (typed user text) or an array of
/// content blocks (assistant responses, tool results, multimodal input).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "tool_use")]
    ToolUse(ToolUseBlock),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct ToolUseBlock {
    pub name: String,
}

// ===================================================================
// Fact extraction
// ===================================================================

/// Maximum stored length of the first-instruction description.
const DESCRIPTION_LIMIT: usize = 80;

/// Facts mined from one subagent transcript, attached to its Stop event.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TranscriptFacts {
    /// First user-authored plain-text instruction, truncated to
    /// `DESCRIPTION_LIMIT` chars. Empty when the transcript has none.
    pub description: String,
    /// Distinct tool names across all assistant turns.
    pub tools_used: BTreeSet<String>,
    /// Total tool invocations, duplicates counted.
    pub tool_count: u64,
}

impl TranscriptFacts {
    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.tool_count == 0
    }
}

/// Truncate a string to `max` chars on a char boundary.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

/// Mine a transcript file for the facts that enrich a Stop event.
///
/// Pure function of the file content. A missing, unreadable, or malformed
/// transcript yields empty facts: the caller records the Stop either way,
/// so extraction never signals an error. Individual unparseable lines are
/// skipped, not fatal.
pub fn extract(path: &Path) -> TranscriptFacts {
    let Ok(contents) = fs::read_to_string(path) else {
        return TranscriptFacts::default();
    };

    let mut facts = TranscriptFacts::default();
    let mut description: Option<String> = None;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Ok(entry) = serde_json::from_str::<TranscriptEntry>(line) else {
            continue;
        };
        match entry {
            TranscriptEntry::User(conv) => {
                // Only a plain-string user turn counts as the instruction;
                // tool results and multimodal input arrive as block arrays.
                if description.is_none() && conv.message.role == "user" {
                    if let MessageContent::Text(text) = &conv.message.content {
                        description =
                            Some(truncate_chars(text, DESCRIPTION_LIMIT).to_string());
                    }
                }
            }
            TranscriptEntry::Assistant(conv) if conv.message.role == "assistant" => {
                if let MessageContent::Blocks(blocks) = &conv.message.content {
                    for block in blocks {
                        if let ContentBlock::ToolUse(tu) = block {
                            facts.tools_used.insert(tu.name.clone());
                            facts.tool_count += 1;
                        }
                    }
                }
            }
            _ => {}
        }
    }
    facts.description = description.unwrap_or_default();
    facts
}

#[cfg(test)]
mod tests;
