//! Deterministic Markdown changelog rendering.
//!
//! Sections follow the fixed commit-type order, a trailing "Commits" section
//! collects unclassified entries, and entries keep their input order. The
//! same input always renders byte-identical output.

use crate::domain::{ClassifiedCommit, CommitType};

fn format_entry(commit: &ClassifiedCommit) -> String {
    if commit.commit_type.is_some() {
        let scope = commit
            .scope
            .as_ref()
            .map(|s| format!("**{}**: ", s))
            .unwrap_or_default();
        format!(
            "- {}{} ([{}]({}))",
            scope, commit.subject, commit.author, commit.html_url
        )
    } else {
        format!(
            "- {}: {} ({})",
            commit.short_sha(),
            commit.header,
            commit.author
        )
    }
}

fn section(label: &str, entries: &[String]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }
    Some(format!("## {}\n{}", label, entries.join("\n")))
}

/// Render classified commits into a grouped Markdown changelog.
///
/// Merge- and revert-flagged commits are never rendered. An empty commit set
/// yields an empty string.
pub fn render(commits: &[ClassifiedCommit]) -> String {
    let mut sections: Vec<String> = Vec::new();

    for commit_type in CommitType::ALL {
        let entries: Vec<String> = commits
            .iter()
            .filter(|c| !c.is_noise() && c.commit_type == Some(commit_type))
            .map(format_entry)
            .collect();
        if let Some(block) = section(commit_type.label(), &entries) {
            sections.push(block);
        }
    }

    let unclassified: Vec<String> = commits
        .iter()
        .filter(|c| !c.is_noise() && c.commit_type.is_none())
        .map(format_entry)
        .collect();
    if let Some(block) = section("Commits", &unclassified) {
        sections.push(block);
    }

    sections.join("\n\n")
}
