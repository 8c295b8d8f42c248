//! Extraction backends.
//!
//! Extraction of an [`ExtractionRecord`] from a transcript is an opaque
//! external call: the backend is one of a closed set of named variants,
//! capability-checked and resolved once at startup. A failed extraction is
//! fatal for the run — partial output is never consumed.

use crate::config::Config;
use crate::error::{Result, VaultError};
use crate::record::ExtractionRecord;
use regex::Regex;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

const EXTRACTION_PROMPT: &str = r##"You are a JSON extraction bot. Output ONLY valid JSON. No explanations. No markdown. No conversation.

Extract the current PROJECT STATE from the coding session below. Focus on deliverables and status, not file paths.

Return this EXACT JSON structure:
{"status":"<one-line current state>","phase":"<current phase/milestone, or empty string if unclear>","summary":"<1-2 sentence session summary>","completed_groups":[{"heading":"<topic name>","items":["<specific deliverable>"]}],"issues":[{"number":"#123","title":"Short title","effort":"1.5d","status":"Pending"}],"next_steps":["<actionable item, prefixed [HIGH]/[MED]/[LOW]>"],"decisions":["<technical choice with reasoning>"],"blockers":["<what is stuck>"],"github_refs":["<issue or PR, e.g. #105, PR #42>"],"notes":["<freeform context worth remembering>"]}

Extraction rules:
- status: What is the project doing RIGHT NOW? One line, present tense
- phase: Current milestone or sprint phase. Empty string if not clear
- summary: Brief overview of what happened this session
- completed_groups: Group related completed items under a descriptive heading. Prefer 2-5 groups over a flat list.
- issues: GitHub issues created or worked on this session. Empty array if none discussed.
- next_steps: Future tasks as actionable items
- decisions: Technical choices with reasoning ("chose X because Y")
- blockers: Things preventing progress
- github_refs: All issue/PR numbers mentioned
- notes: Important context, metrics, or explanations worth remembering. NOT duplicates of completed items.
- Empty array [] if none found for a category

CRITICAL: Output ONLY the JSON object. Start with { and end with }

---SESSION START---
"##;

/// The closed set of extraction backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Shells out to the `claude` CLI in non-interactive JSON mode.
    ClaudeCli { model: String },
}

impl Backend {
    /// Pick the first installed backend. Resolved once at startup, not per
    /// call.
    pub fn detect(config: &Config) -> Result<Self> {
        if which::which("claude").is_ok() {
            return Ok(Backend::ClaudeCli {
                model: config.extraction_model.clone(),
            });
        }
        Err(VaultError::ExtractorUnavailable)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::ClaudeCli { .. } => "claude-cli",
        }
    }

    /// Run the backend over a transcript and parse its JSON reply. Any
    /// non-zero exit or unparseable output aborts the run without writing
    /// partial state.
    pub fn extract(&self, conversation: &str) -> Result<ExtractionRecord> {
        let raw = match self {
            Backend::ClaudeCli { model } => {
                let prompt =
                    format!("{EXTRACTION_PROMPT}{conversation}\n---SESSION END---\n\nJSON output:");
                tracing::debug!(backend = self.name(), model, "running extraction");
                let output = Command::new("claude")
                    .args(["-p", &prompt, "--output-format", "json", "--model", model])
                    .stdin(Stdio::null())
                    .output()
                    .map_err(|e| VaultError::ExtractionFailed(e.to_string()))?;
                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    return Err(VaultError::ExtractionFailed(
                        stderr.chars().take(500).collect(),
                    ));
                }
                String::from_utf8_lossy(&output.stdout).into_owned()
            }
        };
        parse_response(&raw)
    }
}

static CODE_FENCE_RE: OnceLock<Regex> = OnceLock::new();

fn code_fence_re() -> &'static Regex {
    CODE_FENCE_RE.get_or_init(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").unwrap())
}

/// Remove a markdown code-fence wrapper, if present.
fn strip_code_fences(text: &str) -> &str {
    match code_fence_re().captures(text) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(text),
        None => text,
    }
}

/// Parse the backend's reply into a record. The CLI wraps its answer in a
/// `{"result": "..."}` envelope; the answer itself may carry code fences or
/// surrounding chatter around the JSON object.
pub fn parse_response(raw: &str) -> Result<ExtractionRecord> {
    let content: String = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(envelope) => match envelope.get("result") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(v) if v.is_object() => {
                return Ok(finish(serde_json::from_value(v.clone())?));
            }
            _ => raw.to_string(),
        },
        Err(_) => raw.to_string(),
    };

    let content = strip_code_fences(&content);
    let start = content.find('{');
    let end = content.rfind('}');
    let (Some(start), Some(end)) = (start, end) else {
        return Err(VaultError::ExtractionFailed(format!(
            "no JSON object in response: {}",
            content.chars().take(200).collect::<String>()
        )));
    };
    if end < start {
        return Err(VaultError::ExtractionFailed(
            "no JSON object in response".to_string(),
        ));
    }

    let record: ExtractionRecord = serde_json::from_str(&content[start..=end])?;
    Ok(finish(record))
}

/// Post-parse fixups: flatten groups into the legacy flat list when the
/// backend only produced groups.
fn finish(mut record: ExtractionRecord) -> ExtractionRecord {
    if record.completed.is_empty() && !record.completed_groups.is_empty() {
        record.completed = record.flat_completed();
    }
    record
}

// ---------------------------------------------------------------------------
// [CAPTURE] knowledge items — scanned deterministically, no backend call
// ---------------------------------------------------------------------------

/// Pull `[CAPTURE]`-tagged content from a transcript. A capture starts on a
/// `User: [CAPTURE]` or `Assistant: [CAPTURE]` line and runs until the next
/// speaker line or a blank line that ends the block.
pub fn extract_captures(conversation: &str) -> Vec<String> {
    let mut captures = Vec::new();
    let lines: Vec<&str> = conversation.lines().collect();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let content = line
            .strip_prefix("User: [CAPTURE]")
            .or_else(|| line.strip_prefix("Assistant: [CAPTURE]"));
        let Some(content) = content else {
            i += 1;
            continue;
        };

        let mut capture = content.trim().to_string();
        i += 1;
        while i < lines.len() {
            let next = lines[i];
            if next.starts_with("User:") || next.starts_with("Assistant:") {
                break;
            }
            if next.trim().is_empty() {
                let block_ends = lines
                    .get(i + 1)
                    .map(|l| {
                        l.starts_with("User:") || l.starts_with("Assistant:") || l.starts_with('[')
                    })
                    .unwrap_or(true);
                if block_ends {
                    break;
                }
            }
            capture.push('\n');
            capture.push_str(next);
            i += 1;
        }

        let capture = capture.trim().to_string();
        if capture.len() > 10 {
            captures.push(capture);
        }
    }

    captures
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
