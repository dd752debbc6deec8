//! CLI output formatting for `check` and `build`.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Each entity leads with
//! its positional index and title; file names and details follow as indented
//! context lines, so the output reads as a content inventory.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Profile
//!     Jordan Rivera, Full-Stack Developer
//!     Email: jordan@example.com
//!
//! Content
//! 001 Skills (6)
//!     001 Frontend (3)
//!     002 Tools (3)
//! 002 Projects (3)
//!     001 Trail Mapper [Web, featured]
//!     002 Pocket Budget [Mobile]
//! 003 Experience (2)
//!     001 Software Engineer at Acme Labs
//!
//! Navigation
//! 001 Home → /
//! 002 About → /#about
//!
//! Contact
//!     Relay: not configured (missing EMAILJS_SERVICE_ID)
//!     Fallback: mailto:jordan@example.com
//!
//! Missing images (1)
//!     images/projects/budget.png
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! Projects → projects/index.html
//! Page Not Found → 404.html
//!
//! Assets
//!     style.3f9a1c2e.css
//!     site.8b41d07a.js
//!     3 files copied
//!
//! Generated 6 pages
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure.

use crate::contact::{FieldErrors, SubmitOutcome, SubmitStatus};
use crate::generate::{BuildReport, CheckReport};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

fn group_header(index: usize, label: &str, count: usize) -> String {
    format!("{} {} ({})", format_index(index), label, count)
}

fn missing_images_block(lines: &mut Vec<String>, missing: &[String]) {
    if missing.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(format!("Missing images ({})", missing.len()));
    for image in missing {
        lines.push(format!("{}{}", indent(1), image));
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let store = &report.store;
    let profile = &store.profile;
    let mut lines = Vec::new();

    lines.push("Profile".to_string());
    lines.push(format!("{}{}, {}", indent(1), profile.name, profile.title));
    lines.push(format!("{}Email: {}", indent(1), profile.email));
    if !profile.bio.short.is_empty() {
        lines.push(format!("{}Bio: {}", indent(1), truncate_desc(&profile.bio.short, 60)));
    }

    lines.push(String::new());
    lines.push("Content".to_string());

    let skills: usize = store.skills.categories.iter().map(|c| c.skills.len()).sum();
    let groups: Vec<(&str, Vec<String>)> = vec![
        (
            "Skills",
            store
                .skills
                .categories
                .iter()
                .map(|c| format!("{} ({})", c.name, c.skills.len()))
                .collect(),
        ),
        (
            "Projects",
            store
                .projects
                .projects
                .iter()
                .map(|p| {
                    let mut tags: Vec<&str> = p.category.as_deref().into_iter().collect();
                    if p.featured {
                        tags.push("featured");
                    }
                    if tags.is_empty() {
                        p.title.clone()
                    } else {
                        format!("{} [{}]", p.title, tags.join(", "))
                    }
                })
                .collect(),
        ),
        (
            "Experience",
            store
                .sorted_experiences()
                .iter()
                .map(|e| format!("{} at {}", e.title, e.company))
                .collect(),
        ),
        (
            "Education",
            store.sorted_education().iter().map(|e| e.display_title()).collect(),
        ),
        (
            "Achievements",
            store.sorted_achievements().iter().map(|a| a.title.clone()).collect(),
        ),
        (
            "Certifications",
            store.sorted_certifications().iter().map(|c| c.title.clone()).collect(),
        ),
        (
            "Activities",
            store.sorted_activities().iter().map(|a| a.title.clone()).collect(),
        ),
    ];

    for (i, (label, items)) in groups.iter().enumerate() {
        let count = if *label == "Skills" { skills } else { items.len() };
        lines.push(group_header(i + 1, label, count));
        for (j, item) in items.iter().enumerate() {
            lines.push(format!("{}{} {}", indent(1), format_index(j + 1), item));
        }
    }

    lines.push(String::new());
    lines.push("Navigation".to_string());
    for (i, entry) in store.navigation().iter().enumerate() {
        lines.push(format!("{} {} → {}", format_index(i + 1), entry.name, entry.path));
    }

    lines.push(String::new());
    lines.push("Contact".to_string());
    if report.relay_missing.is_empty() {
        lines.push(format!("{}Relay: configured", indent(1)));
    } else {
        lines.push(format!(
            "{}Relay: not configured (missing {})",
            indent(1),
            report.relay_missing.join(", ")
        ));
        lines.push(format!("{}Fallback: mailto:{}", indent(1), profile.email));
    }

    missing_images_block(&mut lines, &report.missing_images);
    lines
}

pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    for page in &report.pages {
        let title = page.route.title().unwrap_or("Home");
        lines.push(format!("{} → {}", title, page.output));
        if let Some(error) = &page.error {
            lines.push(format!("{}Error: {}", indent(1), truncate_desc(error, 80)));
        }
    }

    lines.push(String::new());
    lines.push("Assets".to_string());
    lines.push(format!("{}{}", indent(1), report.stylesheet));
    lines.push(format!("{}{}", indent(1), report.script));
    lines.push(format!(
        "{}{} file{} copied",
        indent(1),
        report.assets_copied,
        if report.assets_copied == 1 { "" } else { "s" }
    ));

    missing_images_block(&mut lines, &report.missing_images);

    lines.push(String::new());
    lines.push(format!(
        "Contact form: {}",
        if report.relay_enabled {
            "mail relay"
        } else {
            "mailto fallback"
        }
    ));

    let failed = report.failed_pages().count();
    let summary = if failed > 0 {
        format!("Generated {} pages ({} failed)", report.pages.len(), failed)
    } else {
        format!("Generated {} pages", report.pages.len())
    };
    lines.push(summary);
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Contact
// ============================================================================

pub fn format_contact_output(
    outcome: &SubmitOutcome,
    status: &SubmitStatus,
    errors: &FieldErrors,
) -> Vec<String> {
    let mut lines = Vec::new();
    for (field, message) in errors {
        lines.push(format!("{}{}: {}", indent(1), field.key(), message));
    }
    match outcome {
        SubmitOutcome::Mailto(link) => {
            lines.push("No mail relay configured. Open this link to send the message:".to_string());
            lines.push(format!("{}{}", indent(1), link));
        }
        _ => match status {
            SubmitStatus::Success(msg) | SubmitStatus::Error(msg) | SubmitStatus::Info(msg) => {
                lines.push(msg.clone())
            }
            SubmitStatus::Idle | SubmitStatus::Submitting => {}
        },
    }
    lines
}

pub fn print_contact_output(outcome: &SubmitOutcome, status: &SubmitStatus, errors: &FieldErrors) {
    for line in format_contact_output(outcome, status, errors) {
        println!("{}", line);
    }
}
