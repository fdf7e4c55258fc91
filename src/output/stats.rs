//! Run report printing.

use console::style;

use crate::download::Report;

/// Print the report of a finished run.
pub fn print_report(report: &Report) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Sync Report:").bold());

    for key in &report.new {
        println!("  {}    {}", style("NEW").green().bold(), key);
    }
    for key in &report.updated {
        println!("  {} {}", style("UPDATE").cyan().bold(), key);
    }

    println!("  New:       {}", style(report.new.len()).green());
    println!("  Updated:   {}", style(report.updated.len()).cyan());
    println!("  Unchanged: {}", report.unchanged);

    if report.has_errors() {
        println!("  Failed:    {}", style(report.errors.len()).red());
        for error in &report.errors {
            println!("    {} {}: {}", style("✗").red(), error.key, error.message);
        }
    }

    if !report.notices.is_empty() {
        println!();
        println!("{}", style("Pending homework:").bold());
        for notice in &report.notices {
            println!("  {} {}", style("!").yellow().bold(), notice);
        }
    }

    println!("{}", style("═".repeat(50)).dim());
}

/// Print a summary line for quick viewing.
pub fn print_summary(report: &Report) {
    println!(
        "Synced: {} new, {} updated, {} unchanged ({} failed)",
        style(report.new.len()).green(),
        style(report.updated.len()).cyan(),
        report.unchanged,
        style(report.errors.len()).red()
    );
}
