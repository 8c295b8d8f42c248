//! Parsing of assistant session logs (`.jsonl`, one JSON object per line).
//!
//! Malformed lines are skipped silently — one bad line never aborts the
//! read. Only `user`/`assistant` entries become messages; session metadata
//! is taken from the first message line that carries it.

use crate::error::Result;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// A single message in the conversation.
#[derive(Debug, Clone)]
pub struct Message {
    pub role: String,
    pub content: String,
    pub timestamp: String,
    pub tool_name: Option<String>,
    pub tool_input: Option<Value>,
}

/// One parsed session log.
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub project_path: String,
    pub project_name: String,
    pub git_branch: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLine {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(rename = "sessionId", default)]
    session_id: String,
    #[serde(default)]
    cwd: String,
    #[serde(rename = "gitBranch", default)]
    git_branch: String,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    message: RawMessage,
}

#[derive(Debug, Default, Deserialize)]
struct RawMessage {
    #[serde(default)]
    role: String,
    #[serde(default)]
    content: Value,
}

/// Text content plus tool info from a message's content parts. Content is
/// either a bare string or an array of typed parts.
fn extract_content(content: &Value) -> (String, Option<String>, Option<Value>) {
    if let Some(s) = content.as_str() {
        return (s.to_string(), None, None);
    }

    let mut text_parts = Vec::new();
    let mut tool_name = None;
    let mut tool_input = None;

    if let Some(parts) = content.as_array() {
        for part in parts {
            if let Some(s) = part.as_str() {
                text_parts.push(s.to_string());
                continue;
            }
            match part.get("type").and_then(Value::as_str) {
                Some("text") => {
                    if let Some(t) = part.get("text").and_then(Value::as_str) {
                        text_parts.push(t.to_string());
                    }
                }
                Some("tool_use") => {
                    tool_name = part
                        .get("name")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    tool_input = part.get("input").cloned();
                }
                _ => {}
            }
        }
    }

    (text_parts.join("\n"), tool_name, tool_input)
}

impl Session {
    pub fn parse(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut session_id = String::new();
        let mut project_path = String::new();
        let mut git_branch = String::new();
        let mut messages = Vec::new();

        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Ok(data) = serde_json::from_str::<RawLine>(line) else {
                continue;
            };
            if data.kind != "user" && data.kind != "assistant" {
                continue;
            }

            if session_id.is_empty() {
                session_id = data.session_id;
                project_path = data.cwd;
                git_branch = data.git_branch;
            }

            let (content, tool_name, tool_input) = extract_content(&data.message.content);
            // Skip empty messages (e.g. bare thinking blocks)
            if content.is_empty() && tool_name.is_none() {
                continue;
            }

            let role = if data.message.role.is_empty() {
                data.kind
            } else {
                data.message.role
            };
            messages.push(Message {
                role,
                content,
                timestamp: data.timestamp,
                tool_name,
                tool_input,
            });
        }

        let project_name = Path::new(&project_path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(Self {
            session_id,
            project_path,
            project_name,
            git_branch,
            messages,
        })
    }

    /// Calendar date of the first message, from its ISO timestamp prefix.
    pub fn date(&self) -> Option<NaiveDate> {
        let ts = &self.messages.first()?.timestamp;
        NaiveDate::parse_from_str(ts.get(..10)?, "%Y-%m-%d").ok()
    }

    /// Render the conversation as readable text for the extraction backend.
    /// Over `max_chars`, the front is truncated — the tail holds the most
    /// recent context.
    pub fn conversation_text(&self, max_chars: usize) -> String {
        let mut lines = Vec::new();

        for msg in &self.messages {
            let role = if msg.role == "user" { "User" } else { "Assistant" };

            if let Some(tool) = &msg.tool_name {
                lines.push(format!("[{role} used tool: {tool}]"));
                if let Some(input) = &msg.tool_input {
                    let mut input_str =
                        serde_json::to_string_pretty(input).unwrap_or_default();
                    if input_str.len() > 500 {
                        input_str = char_truncate(&input_str, 500);
                        input_str.push_str("...");
                    }
                    lines.push(format!("  Input: {input_str}"));
                }
            }
            if !msg.content.is_empty() {
                lines.push(format!("{role}: {}", msg.content));
            }
            lines.push(String::new());
        }

        let text = lines.join("\n");
        if text.chars().count() > max_chars {
            let tail: String = text
                .chars()
                .skip(text.chars().count() - max_chars)
                .collect();
            format!("...[earlier conversation truncated]...\n\n{tail}")
        } else {
            text
        }
    }
}

fn char_truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
