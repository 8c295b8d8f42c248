//! The extraction record — the unit of information produced per processing
//! run, shared between the extractor, the renderers, and the aggregator.

use serde::{Deserialize, Serialize};

/// A group of related completed items under a heading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletedGroup {
    pub heading: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// A GitHub issue reference with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueRef {
    pub number: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub effort: String,
    #[serde(default = "default_issue_status")]
    pub status: String,
}

fn default_issue_status() -> String {
    "Pending".to_string()
}

/// A git commit reference. Injected deterministically from `git log`,
/// never produced by the extraction backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRef {
    pub hash: String,
    #[serde(default)]
    pub message: String,
}

/// Extracted project state from one coding session.
///
/// Every sequence field defaults to empty; absence of data is rendered as an
/// explicit empty marker, never as a missing section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// One-line current state.
    #[serde(default)]
    pub status: String,
    /// Current phase or milestone. May be empty.
    #[serde(default)]
    pub phase: String,
    /// 1-2 sentence session summary.
    #[serde(default)]
    pub summary: String,
    /// Flat completed list (used when no groups were extracted).
    #[serde(default)]
    pub completed: Vec<String>,
    /// Completed items grouped by topic.
    #[serde(default)]
    pub completed_groups: Vec<CompletedGroup>,
    #[serde(default)]
    pub issues: Vec<IssueRef>,
    #[serde(default, skip_deserializing)]
    pub commits: Vec<CommitRef>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub decisions: Vec<String>,
    #[serde(default)]
    pub blockers: Vec<String>,
    #[serde(default)]
    pub github_refs: Vec<String>,
    /// `[CAPTURE]`-tagged items scanned from the transcript, not extracted.
    #[serde(default, skip_deserializing)]
    pub knowledge: Vec<String>,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl ExtractionRecord {
    /// Completed items as a flat list, flattening groups when the flat
    /// field is empty.
    pub fn flat_completed(&self) -> Vec<String> {
        if !self.completed.is_empty() {
            return self.completed.clone();
        }
        self.completed_groups
            .iter()
            .flat_map(|g| g.items.iter().cloned())
            .collect()
    }
}
