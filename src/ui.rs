//! Console output helpers.
//!
//! All user-facing narration goes through these functions so the pipeline
//! reads as grouped, colored progress lines.

use crate::warning::ReleaseWarning;
use console::style;

/// Print a bold group header, opening a new phase of the run
pub fn display_group(title: &str) {
    println!("\n{}", style(title).bold().underlined());
}

pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_warning(warning: &ReleaseWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Print the rendered changelog, indented under a header
pub fn display_changelog(changelog: &str) {
    display_group("Changelog");
    if changelog.is_empty() {
        println!("  (no entries)");
        return;
    }
    for line in changelog.lines() {
        println!("  {}", line);
    }
}
