use crate::output::print_json;
use anyhow::Context;
use serde::Serialize;
use vault_core::config::Config;
use vault_core::sections;
use vault_core::vault::Vault;

#[derive(Serialize)]
struct NextStep {
    done: bool,
    text: String,
}

#[derive(Serialize)]
struct StatusOutput {
    project: String,
    status: Option<String>,
    phase: Option<String>,
    next_steps: Vec<NextStep>,
    blockers: Vec<String>,
}

pub fn run(project: &str, json: bool) -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    let vault = Vault::new(&config);
    let content = vault.read_status(project)?;

    let out = StatusOutput {
        project: project.to_string(),
        status: sections::extract_section_text(&content, "Status"),
        phase: sections::extract_section_text(&content, "Phase"),
        next_steps: sections::extract_checklist(&content, "Next Steps")
            .into_iter()
            .map(|i| NextStep {
                done: i.done,
                text: i.text,
            })
            .collect(),
        blockers: sections::extract_section(&content, "Blockers"),
    };

    if json {
        return print_json(&out);
    }

    println!("{project}");
    println!("  Status: {}", out.status.as_deref().unwrap_or("—"));
    println!("  Phase:  {}", out.phase.as_deref().unwrap_or("—"));
    if !out.next_steps.is_empty() {
        println!("  Next steps:");
        for step in &out.next_steps {
            let mark = if step.done { "x" } else { " " };
            println!("    [{mark}] {}", step.text);
        }
    }
    if !out.blockers.is_empty() {
        println!("  Blockers:");
        for blocker in &out.blockers {
            println!("    - {blocker}");
        }
    }
    if let Some(groups) = completed_summary(&content) {
        println!("  Completed today:");
        for line in groups {
            println!("    {line}");
        }
    }
    Ok(())
}

/// Short completed-item summary, keeping group headings when present.
fn completed_summary(content: &str) -> Option<Vec<String>> {
    let groups = sections::extract_grouped(content, "Completed Today");
    if groups.is_empty() {
        return None;
    }
    let mut lines = Vec::new();
    for group in groups {
        if !group.heading.is_empty() {
            lines.push(format!("{}:", group.heading));
        }
        for item in group.items {
            lines.push(format!("- {item}"));
        }
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines)
    }
}
