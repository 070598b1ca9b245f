// ============================================================================
// shortform-cli/src/output.rs
// ============================================================================
//
// TERMINAL OUTPUT: Sections, Status Lines and the Progress Bar
//
// User-facing output goes through these helpers so every command shares the
// same layout. Logging (see logging.rs) stays separate and goes to stderr.

use crate::config::{PROGRESS_BAR_TEMPLATE, PROGRESS_CHARS};

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use shortform_core::FieldErrors;

use std::time::Duration;

const STATUS_INDENT: &str = "  ";
const STATUS_LABEL_WIDTH: usize = 15;

/// Print a section header for a major step
pub fn print_section(title: &str) {
    println!();
    println!("===== {} =====", title.to_uppercase().cyan().bold());
    println!();
}

/// Print a status line (key-value pair), optionally emphasizing the value
pub fn print_status(label: &str, value: &str, highlight: bool) {
    let padding = STATUS_LABEL_WIDTH.saturating_sub(label.len()).max(1);
    let label = format!("{label}:{}", " ".repeat(padding));
    if highlight {
        println!("{STATUS_INDENT}{label}{}", value.bold());
    } else {
        println!("{STATUS_INDENT}{label}{value}");
    }
}

pub fn print_success(message: &str) {
    println!("{STATUS_INDENT}{} {}", "✓".green(), message);
}

/// Print an error message with red styling
pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".bold().bright_red(), message);
}

/// Print the per-field messages of a rejected submission to stderr
pub fn print_field_errors(errors: &FieldErrors) {
    for (field, messages) in errors.iter() {
        for message in messages {
            eprintln!("{STATUS_INDENT}{} {}: {}", "✗".red(), field.bright_cyan(), message);
        }
    }
}

/// Create a 0-100 progress bar for a conversion
#[must_use]
pub fn create_progress_bar(message: &str) -> ProgressBar {
    let pb = ProgressBar::new(100);
    let style = ProgressStyle::with_template(PROGRESS_BAR_TEMPLATE)
        .map(|style| style.progress_chars(PROGRESS_CHARS))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
