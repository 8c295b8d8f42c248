//! Weekly/monthly aggregation over daily log documents.
//!
//! Daily logs are the only durable source of truth; rollups are derived
//! views, fully regenerated on every request. Aggregation accumulates
//! section items across all matching documents in date order, then
//! deduplicates by exact string equality preserving first-seen order.

use crate::error::{Result, VaultError};
use crate::sections;
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// A week-or-month filter over daily documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Period {
    /// ISO week, keyed `YYYY-Www`.
    Week(String),
    /// Calendar month, keyed `YYYY-MM`.
    Month(String),
}

static WEEK_KEY_RE: OnceLock<Regex> = OnceLock::new();

fn week_key_re() -> &'static Regex {
    WEEK_KEY_RE.get_or_init(|| Regex::new(r"^\d{4}-W\d{2}$").unwrap())
}

static MONTH_KEY_RE: OnceLock<Regex> = OnceLock::new();

fn month_key_re() -> &'static Regex {
    MONTH_KEY_RE.get_or_init(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").unwrap())
}

impl Period {
    /// The ISO week containing `date`. Uses the ISO week-based year, so
    /// early-January dates can land in the previous year's last week.
    pub fn week_of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Period::Week(format!("{}-W{:02}", iso.year(), iso.week()))
    }

    pub fn month_of(date: NaiveDate) -> Self {
        Period::Month(date.format("%Y-%m").to_string())
    }

    /// Parse a `YYYY-Www` or `YYYY-MM` key.
    pub fn parse(key: &str) -> Result<Self> {
        if week_key_re().is_match(key) {
            Ok(Period::Week(key.to_string()))
        } else if month_key_re().is_match(key) {
            Ok(Period::Month(key.to_string()))
        } else {
            Err(VaultError::InvalidPeriod(key.to_string()))
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Period::Week(k) | Period::Month(k) => k,
        }
    }

    /// Does `date` fall inside this period? Weeks compare the full ISO
    /// year+week key; months compare the date's `YYYY-MM` prefix.
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            Period::Week(key) => Period::week_of(date).key() == key,
            Period::Month(key) => date.format("%Y-%m").to_string() == *key,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Accumulated, deduplicated items from a set of daily documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollupData {
    pub completed: Vec<String>,
    pub decisions: Vec<String>,
    pub blockers: Vec<String>,
    pub github_refs: Vec<String>,
}

/// Deduplicate by exact string equality, preserving first-seen order.
fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|i| seen.insert(i.clone())).collect()
}

/// Aggregate bullet items from the daily documents in `daily_dir` whose
/// date falls inside `period`. Files whose stem is not a `YYYY-MM-DD` date
/// are skipped, as is anything unreadable — a bad file never aborts the
/// sweep. A missing directory yields empty data.
pub fn aggregate_dailies(daily_dir: &Path, period: &Period) -> Result<RollupData> {
    let mut data = RollupData::default();

    if !daily_dir.exists() {
        return Ok(data);
    }

    let mut files: Vec<_> = std::fs::read_dir(daily_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "md"))
        .collect();
    // Filename is the date key, so name order is date order
    files.sort();

    for file in files {
        let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Ok(date) = NaiveDate::parse_from_str(stem, "%Y-%m-%d") else {
            tracing::debug!(file = %file.display(), "skipping non-date daily file");
            continue;
        };
        if !period.matches(date) {
            continue;
        }
        let Ok(content) = std::fs::read_to_string(&file) else {
            tracing::warn!(file = %file.display(), "skipping unreadable daily file");
            continue;
        };

        data.completed
            .extend(sections::extract_bold_label_section(&content, "Completed"));
        data.decisions
            .extend(sections::extract_bold_label_section(&content, "Decisions"));
        data.blockers
            .extend(sections::extract_bold_label_section(&content, "Blockers"));
        data.github_refs
            .extend(sections::extract_inline_refs(&content, "GitHub Refs"));
    }

    data.completed = dedup(data.completed);
    data.decisions = dedup(data.decisions);
    data.blockers = dedup(data.blockers);
    data.github_refs = dedup(data.github_refs);

    Ok(data)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
