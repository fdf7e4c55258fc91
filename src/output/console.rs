//! Console output utilities.

use std::path::Path;

use console::style;

use crate::config::CourseSelection;
use crate::resource::{Course, ResourceKind};

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     course-sync                                       ║
║     Courseware, lecture videos and homework status    ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(
    modes: &[ResourceKind],
    selection: &CourseSelection,
    download_dir: &Path,
    ledger: &Path,
) {
    let modes: Vec<String> = modes.iter().map(ToString::to_string).collect();

    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Modes:     {}", modes.join(", "));
    println!("  Courses:   {}", selection);
    println!("  Directory: {}", download_dir.display());
    println!("  Ledger:    {}", ledger.display());
    println!();
}

/// Print the enrolled courses with the indices used by `--courses`.
pub fn print_course_list(courses: &[Course]) {
    println!();
    println!("{}", style(format!("Enrolled courses ({}):", courses.len())).bold());
    for (index, course) in courses.iter().enumerate() {
        println!("  {:>3}  {}", style(index).dim(), course.name);
    }
    println!();
}
