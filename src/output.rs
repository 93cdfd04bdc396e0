//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Resize
//!
//! ```text
//! photos/IMG_0042.jpg
//!     4032x3024 → 1024x768 (jpeg)
//!     Output: scaled/scaled_IMG_0042.jpg
//! ```
//!
//! ```text
//! photos/icon.png
//!     64x64 within bounds, unchanged
//! ```
//!
//! ## Plan
//!
//! ```text
//! photos/IMG_0042.jpg
//!     4032x3024 → 1024x768
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions do no I/O.

use crate::resizer::{Preview, ResizeOutcome};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn unchanged_line(width: u32, height: u32) -> String {
    format!("{}{}x{} within bounds, unchanged", indent(1), width, height)
}

/// Format the result of a `resize` command.
pub fn format_outcome(outcome: &ResizeOutcome) -> Vec<String> {
    match outcome {
        ResizeOutcome::Unchanged {
            path,
            width,
            height,
        } => vec![path.display().to_string(), unchanged_line(*width, *height)],
        ResizeOutcome::Scaled {
            source,
            path,
            original_width,
            original_height,
            plan,
            format,
        } => vec![
            source.display().to_string(),
            format!(
                "{}{}x{} → {}x{} ({})",
                indent(1),
                original_width,
                original_height,
                plan.width,
                plan.height,
                format
            ),
            format!("{}Output: {}", indent(1), path.display()),
        ],
    }
}

/// Format the result of a `plan` command.
pub fn format_preview(source: &Path, preview: &Preview) -> Vec<String> {
    let (width, height) = preview.original;
    let detail = match preview.plan {
        Some(plan) => format!(
            "{}{}x{} → {}x{}",
            indent(1),
            width,
            height,
            plan.width,
            plan.height
        ),
        None => unchanged_line(width, height),
    };
    vec![source.display().to_string(), detail]
}

pub fn print_outcome(outcome: &ResizeOutcome) {
    for line in format_outcome(outcome) {
        println!("{}", line);
    }
}

pub fn print_preview(source: &Path, preview: &Preview) {
    for line in format_preview(source, preview) {
        println!("{}", line);
    }
}
