//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! The `format_*` functions build the text; the `display_*` functions print it.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::domain::{DuplicateReport, PlanContext, TagListing, TagPlan};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Lines describing what the planner derived before proposing a tag.
///
/// Printed both for a normal run and before reporting a dirty working tree.
pub fn format_plan_context(context: &PlanContext) -> Vec<String> {
    vec![
        format!("Branch:         {}", context.branch),
        format!(
            "Strategy:       {} ({})",
            context.strategy.category, context.strategy.description
        ),
        format!(
            "Latest tag:     {}",
            context.latest_tag.as_deref().unwrap_or("none")
        ),
        format!("Base version:   {}", context.base_version),
    ]
}

/// Display the facts the plan was derived from
pub fn display_plan_context(context: &PlanContext) {
    println!("\n{}", style("Repository state:").bold());
    for line in format_plan_context(context) {
        println!("  {}", line);
    }
}

/// Display the proposed tag change (or initial tag).
///
/// # Arguments
/// * `plan` - The computed plan; its latest tag is shown as the starting point
pub fn display_proposed_tag(plan: &TagPlan) {
    match plan.context.latest_tag.as_deref() {
        Some(old) => {
            println!("\n{}", style("Proposed Tag Change:").bold());
            println!("  From: {}", style(old).red());
            println!("  To:   {}", style(&plan.proposed_tag).green());
        }
        None => {
            println!("\n{}", style("Initial Tag:").bold());
            println!("  New tag: {}", style(&plan.proposed_tag).green());
        }
    }
    println!("  Reason: {}", plan.reason);
}

/// Display why no tag will be created
pub fn display_skip(plan: &TagPlan) {
    println!(
        "\n{} Skipping {}: {}",
        style("→").yellow(),
        plan.proposed_tag,
        plan.reason
    );
}

/// Display the uncommitted changes that block tagging
pub fn display_dirty_tree(changes: &[String]) {
    eprintln!(
        "\n{} Working tree has uncommitted changes:",
        style("✗").red().bold()
    );
    for change in changes {
        eprintln!("  {}", change);
    }
    eprintln!("Commit or stash them before tagging.");
}

/// Display a boundary warning to the user.
///
/// Shows a yellow warning icon followed by the warning message.
///
/// # Arguments
/// * `warning` - The boundary warning to display
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display manual push instruction for a tag.
///
/// Shows the git command needed to push the tag to a remote.
///
/// # Arguments
/// * `tag` - The tag that was created locally
/// * `remote` - The remote name (e.g., "origin")
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    println!(
        "\n{} To push this tag later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} {}", remote, tag)).cyan()
    );
}

/// Lines of the tag listing, latest first
pub fn format_tag_listing(listing: &TagListing) -> Vec<String> {
    let mut lines: Vec<String> = listing
        .tags
        .iter()
        .map(|tag| {
            if listing.is_latest(tag) {
                format!("{} (latest)", tag)
            } else {
                tag.clone()
            }
        })
        .collect();

    lines.push(format!(
        "{} tag(s): {} valid, {} invalid",
        listing.tags.len(),
        listing.valid_count,
        listing.invalid.len()
    ));
    lines.push(if listing.head_tagged {
        "HEAD is tagged".to_string()
    } else {
        "HEAD is not tagged".to_string()
    });
    lines
}

/// Lines summarising tags per release scope, then each duplicate group
pub fn format_duplicate_report(report: &DuplicateReport) -> Vec<String> {
    let mut lines = vec![
        format!("Total tags:       {}", report.total),
        format!("Unique tags:      {}", report.unique_count()),
        format!("Duplicate tags:   {}", report.duplicate_count()),
        format!("Duplicate groups: {}", report.groups.len()),
    ];

    if !report.recent.is_empty() {
        lines.push("Most recent:".to_string());
        lines.extend(report.recent.iter().map(|tag| format!("  - {}", tag)));
    }

    for group in &report.groups {
        lines.push(format!("{}:", group.scope));
        lines.extend(group.tags.iter().map(|tag| format!("  - {}", tag)));
    }
    lines
}

/// Display every tag with a validity summary and the duplicate report
pub fn display_tag_listing(listing: &TagListing) {
    println!("{}", style("Tags:").bold());
    for line in format_tag_listing(listing) {
        println!("  {}", line);
    }

    println!("\n{}", style("Release scopes:").bold());
    for line in format_duplicate_report(&listing.duplicates) {
        println!("  {}", line);
    }
    if !listing.duplicates.has_duplicates() {
        display_success("No duplicate tags");
    }

    for warning in listing.warnings() {
        display_boundary_warning(&warning);
    }
}
