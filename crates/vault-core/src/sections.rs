//! Section extraction from semi-structured markdown.
//!
//! Implemented as a small explicit line scanner (current section / none)
//! rather than one monolithic pattern, so heading-boundary and nesting edge
//! cases stay testable in isolation. Two document shapes are supported:
//! `## Heading` sections (STATUS.md, rollups) and `**Label**:` bold-label
//! sections (daily log entries).

use crate::record::CompletedGroup;
use regex::Regex;
use std::sync::OnceLock;

/// A checklist item with its checkbox state preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    pub done: bool,
    pub text: String,
}

static CHECKLIST_RE: OnceLock<Regex> = OnceLock::new();

fn checklist_re() -> &'static Regex {
    CHECKLIST_RE.get_or_init(|| Regex::new(r"^-\s+\[([ xX])\]\s+(.+)$").unwrap())
}

static BULLET_RE: OnceLock<Regex> = OnceLock::new();

fn bullet_re() -> &'static Regex {
    BULLET_RE.get_or_init(|| Regex::new(r"^-\s+(.+)$").unwrap())
}

/// Accepted "no data here" sentinels. Full-line italic markers
/// (`_None_`, `_Unknown_`, ...) are how our own renderers spell absence.
fn is_empty_sentinel(text: &str) -> bool {
    let t = text.trim();
    if t.len() >= 2 && t.starts_with('_') && t.ends_with('_') {
        return true;
    }
    matches!(t.to_ascii_lowercase().as_str(), "none" | "(none)" | "n/a")
}

/// Parse a markdown heading line into (level, title).
fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_end();
    let hashes = trimmed.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 {
        return None;
    }
    let rest = &trimmed[hashes..];
    let title = rest.strip_prefix(' ')?;
    Some((hashes, title.trim()))
}

/// Lines between the first `##`-or-deeper heading whose title starts with
/// `heading` (case-insensitive) and the next heading at the same or a
/// shallower level, or end of document. Deeper sub-headings are included
/// as data. An unmatched heading yields an empty vec, never an error.
fn section_body<'a>(content: &'a str, heading: &str) -> Vec<&'a str> {
    let needle = heading.to_ascii_lowercase();
    let mut body = Vec::new();
    let mut open_level: Option<usize> = None;

    for line in content.lines() {
        match (parse_heading(line), open_level) {
            (Some((level, _)), Some(open)) if level <= open => break,
            (Some(_), Some(_)) => body.push(line),
            (Some((level, title)), None) => {
                // The document title (level 1) never opens a section, so a
                // project named e.g. "Status-Page" can't shadow "## Status".
                if level >= 2 && title.to_ascii_lowercase().starts_with(&needle) {
                    open_level = Some(level);
                }
            }
            (None, Some(_)) => body.push(line),
            (None, None) => {}
        }
    }
    body
}

/// Extract list items from a heading-delimited section. Accepts both plain
/// bullets and checklist entries; the checkbox marker is stripped. Sentinel
/// lines are excluded.
pub fn extract_section(content: &str, heading: &str) -> Vec<String> {
    let mut items = Vec::new();
    for line in section_body(content, heading) {
        let line = line.trim();
        let text = if let Some(caps) = checklist_re().captures(line) {
            caps.get(2).map(|m| m.as_str().trim().to_string())
        } else {
            bullet_re()
                .captures(line)
                .and_then(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
        };
        if let Some(text) = text {
            if !is_empty_sentinel(&text) {
                items.push(text);
            }
        }
    }
    items
}

/// Extract checklist items from a section, preserving the checked marker.
/// Plain bullets are ignored here — callers that mandate checkbox semantics
/// (next steps) use this; callers that don't use [`extract_section`].
pub fn extract_checklist(content: &str, heading: &str) -> Vec<ChecklistItem> {
    let mut items = Vec::new();
    for line in section_body(content, heading) {
        if let Some(caps) = checklist_re().captures(line.trim()) {
            let text = caps[2].trim().to_string();
            if !is_empty_sentinel(&text) {
                items.push(ChecklistItem {
                    done: caps[1].eq_ignore_ascii_case("x"),
                    text,
                });
            }
        }
    }
    items
}

/// First non-empty scalar line of a section (Status / Phase fields).
/// Italic empty markers count as absent.
pub fn extract_section_text(content: &str, heading: &str) -> Option<String> {
    section_body(content, heading)
        .into_iter()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .filter(|l| !l.starts_with('_'))
        .map(str::to_string)
}

/// Grouped capture: deeper sub-headings inside the section open named item
/// groups. Items before any sub-heading land in an unnamed leading group.
pub fn extract_grouped(content: &str, heading: &str) -> Vec<CompletedGroup> {
    let mut groups: Vec<CompletedGroup> = Vec::new();
    let mut current = CompletedGroup::default();

    for line in section_body(content, heading) {
        if let Some((_, title)) = parse_heading(line) {
            if !current.items.is_empty() || !current.heading.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
            current.heading = title.to_string();
            continue;
        }
        let line = line.trim();
        let text = if let Some(caps) = checklist_re().captures(line) {
            Some(caps[2].trim().to_string())
        } else {
            bullet_re().captures(line).map(|caps| caps[1].trim().to_string())
        };
        if let Some(text) = text {
            if !is_empty_sentinel(&text) {
                current.items.push(text);
            }
        }
    }
    if !current.items.is_empty() || !current.heading.is_empty() {
        groups.push(current);
    }
    groups
}

/// Extract list items from every `**Label**:` section in a document.
/// Daily log entries use bold labels instead of headings; a file can hold
/// several entries, and all of them contribute. Checkbox markers are
/// stripped, like [`extract_section`]. A section is terminated by the next
/// bold label, a horizontal rule, a heading, or end of document.
pub fn extract_bold_label_section(content: &str, label: &str) -> Vec<String> {
    let open = format!("**{label}**:");
    let mut items = Vec::new();
    let mut in_section = false;

    for line in content.lines() {
        let t = line.trim();
        if t.eq_ignore_ascii_case(&open) {
            in_section = true;
            continue;
        }
        if in_section {
            if t.starts_with("**") || t.starts_with("---") || t.starts_with('#') {
                in_section = false;
                continue;
            }
            let text = if let Some(caps) = checklist_re().captures(t) {
                Some(caps[2].trim().to_string())
            } else {
                bullet_re().captures(t).map(|caps| caps[1].trim().to_string())
            };
            if let Some(text) = text {
                if !is_empty_sentinel(&text) {
                    items.push(text);
                }
            }
        }
    }
    items
}

/// Extract comma-joined inline references from every `**Label**: a, b` line.
pub fn extract_inline_refs(content: &str, label: &str) -> Vec<String> {
    let prefix = format!("**{label}**:");
    let mut refs = Vec::new();

    for line in content.lines() {
        let t = line.trim();
        if let Some(rest) = t.strip_prefix(&prefix) {
            let rest = rest.trim();
            if rest.is_empty() || is_empty_sentinel(rest) {
                continue;
            }
            refs.extend(
                rest.split(',')
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(str::to_string),
            );
        }
    }
    refs
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_DOC: &str = "\
# my-project

> Last updated: 2026-02-06 14:30

## Status
Implementing JWT auth for the backend

## Phase
Phase 1: Authentication

## Completed Today

### Auth Endpoints
- [x] Added login endpoint
- [x] Added refresh endpoint

### Cleanup
- [x] Removed dead session code

## Next Steps
- [ ] [HIGH] Wire up refresh token rotation
- [x] Write auth integration tests

## Decisions
- Chose SQLite over PostgreSQL

## Blockers
_None_

## Notes
- n/a
";

    #[test]
    fn unmatched_heading_yields_empty() {
        assert!(extract_section(STATUS_DOC, "Nonexistent Section").is_empty());
        assert!(extract_checklist(STATUS_DOC, "Nonexistent Section").is_empty());
        assert!(extract_section_text(STATUS_DOC, "Nonexistent Section").is_none());
    }

    #[test]
    fn heading_match_is_case_insensitive() {
        assert_eq!(
            extract_section(STATUS_DOC, "decisions"),
            vec!["Chose SQLite over PostgreSQL"]
        );
    }

    #[test]
    fn checkbox_markers_are_stripped_in_plain_extraction() {
        let steps = extract_section(STATUS_DOC, "Next Steps");
        assert_eq!(
            steps,
            vec![
                "[HIGH] Wire up refresh token rotation",
                "Write auth integration tests"
            ]
        );
    }

    #[test]
    fn checklist_preserves_done_state() {
        let steps = extract_checklist(STATUS_DOC, "Next Steps");
        assert_eq!(steps.len(), 2);
        assert!(!steps[0].done);
        assert!(steps[1].done);
        assert_eq!(steps[1].text, "Write auth integration tests");
    }

    #[test]
    fn sentinels_are_excluded() {
        assert!(extract_section(STATUS_DOC, "Blockers").is_empty());
        assert!(extract_section(STATUS_DOC, "Notes").is_empty());

        let doc = "## Blockers\n- none\n- (None)\n- N/A\n- real blocker\n";
        assert_eq!(extract_section(doc, "Blockers"), vec!["real blocker"]);
    }

    #[test]
    fn deeper_subheadings_are_inclusive_data() {
        // ### sub-headings inside "## Completed Today" do not terminate it
        let items = extract_section(STATUS_DOC, "Completed Today");
        assert_eq!(
            items,
            vec![
                "Added login endpoint",
                "Added refresh endpoint",
                "Removed dead session code"
            ]
        );
    }

    #[test]
    fn same_level_heading_terminates() {
        let items = extract_section(STATUS_DOC, "Decisions");
        // Must not leak into "## Blockers"
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn grouped_capture_names_subgroups() {
        let groups = extract_grouped(STATUS_DOC, "Completed Today");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].heading, "Auth Endpoints");
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[1].heading, "Cleanup");
        assert_eq!(groups[1].items, vec!["Removed dead session code"]);
    }

    #[test]
    fn grouped_capture_keeps_leading_ungrouped_items() {
        let doc = "## Completed\n- flat one\n\n### Grouped\n- in group\n";
        let groups = extract_grouped(doc, "Completed");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].heading, "");
        assert_eq!(groups[0].items, vec!["flat one"]);
        assert_eq!(groups[1].heading, "Grouped");
    }

    #[test]
    fn section_text_returns_scalar() {
        assert_eq!(
            extract_section_text(STATUS_DOC, "Status").as_deref(),
            Some("Implementing JWT auth for the backend")
        );
        assert_eq!(
            extract_section_text(STATUS_DOC, "Phase").as_deref(),
            Some("Phase 1: Authentication")
        );
    }

    #[test]
    fn document_title_does_not_open_a_section() {
        let doc = "# Status-Page\n\n> Last updated: now\n\n## Status\nGreen\n";
        assert_eq!(extract_section_text(doc, "Status").as_deref(), Some("Green"));
    }

    #[test]
    fn section_text_treats_marker_as_absent() {
        let doc = "## Status\n_Unknown_\n\n## Phase\nBeta\n";
        assert!(extract_section_text(doc, "Status").is_none());
        assert_eq!(extract_section_text(doc, "Phase").as_deref(), Some("Beta"));
    }

    const DAILY_DOC: &str = "\
# Daily Log: 2026-02-06

---

### 09:12 — my-project

**Summary**: Morning session.

**Completed**:
- [x] Added login endpoint

**Decisions**:
- Chose SQLite

**Blockers**:
- _None_

**GitHub Refs**: #105, PR #42

---

### 16:40 — my-project

**Summary**: Afternoon session.

**Completed**:
- [x] Added login endpoint
- [x] Added logout endpoint

**Decisions**:
- _None_

**Blockers**:
- Waiting on infra ticket

**GitHub Refs**: #106
";

    #[test]
    fn bold_label_sections_collect_across_entries() {
        let completed = extract_bold_label_section(DAILY_DOC, "Completed");
        assert_eq!(
            completed,
            vec![
                "Added login endpoint",
                "Added login endpoint",
                "Added logout endpoint"
            ]
        );
        assert_eq!(
            extract_bold_label_section(DAILY_DOC, "Blockers"),
            vec!["Waiting on infra ticket"]
        );
    }

    #[test]
    fn bold_label_checkbox_markers_are_stripped() {
        let doc = "**Completed**:\n- [x] Added login endpoint\n- plain item\n";
        assert_eq!(
            extract_bold_label_section(doc, "Completed"),
            vec!["Added login endpoint", "plain item"]
        );
    }

    #[test]
    fn bold_label_section_stops_at_rule_and_heading() {
        let doc = "**Completed**:\n- one\n---\n- not counted\n";
        assert_eq!(extract_bold_label_section(doc, "Completed"), vec!["one"]);
    }

    #[test]
    fn inline_refs_split_on_commas() {
        let refs = extract_inline_refs(DAILY_DOC, "GitHub Refs");
        assert_eq!(refs, vec!["#105", "PR #42", "#106"]);
    }

    #[test]
    fn inline_refs_skip_empty_marker() {
        let doc = "**GitHub Refs**: _None_\n";
        assert!(extract_inline_refs(doc, "GitHub Refs").is_empty());
    }
}
