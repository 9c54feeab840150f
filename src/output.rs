//! CLI output formatting.
//!
//! Each display has a `format_*` function returning lines (pure, testable)
//! and a `print_*` wrapper that writes them to stdout.
//!
//! # Output Format
//!
//! ## Grid
//!
//! ```text
//! Grid 390x1326.5 (20 images, 3 columns)
//! Column 1
//!     001 abc123  y=6 h=177.5
//!         https://images.unsplash.com/...
//!     004 def456  y=195.5 h=177.5
//! Column 2
//!     ...
//! ```
//!
//! ## Fetch
//!
//! ```text
//! page 1: +20 images (20 total)
//! skipped: a fetch is already in flight
//! failed: HTTP 401 from photos
//! ```

use crate::gallery::FetchOutcome;
use crate::layout::Size;
use crate::presenter::Cell;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Trim float noise: `177.5` stays, `6.0` becomes `6`.
fn format_units(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

/// One line per fetch attempt.
pub fn format_fetch(outcome: &FetchOutcome, total: usize) -> String {
    match outcome {
        FetchOutcome::Appended { page, added } => {
            format!("page {}: +{} images ({} total)", page, added, total)
        }
        FetchOutcome::Busy => "skipped: a fetch is already in flight".to_string(),
        FetchOutcome::Failed(e) => format!("failed: {}", e),
    }
}

/// Grid listing grouped by column, items in top-to-bottom order.
pub fn format_grid(cells: &[Cell], columns: usize, content: Size) -> Vec<String> {
    let mut lines = vec![format!(
        "Grid {}x{} ({} images, {} columns)",
        format_units(content.width),
        format_units(content.height),
        cells.len(),
        columns
    )];

    for column in 0..columns {
        let in_column: Vec<&Cell> = cells.iter().filter(|c| c.column == column).collect();
        if in_column.is_empty() {
            continue;
        }
        lines.push(format!("Column {}", column + 1));
        for cell in in_column {
            lines.push(format!(
                "{}{} {}  y={} h={}",
                indent(1),
                format_index(cell.index + 1),
                cell.image_id,
                format_units(cell.frame.y),
                format_units(cell.frame.height)
            ));
            if let Some(url) = &cell.url {
                lines.push(format!("{}{}", indent(2), url));
            }
        }
    }
    lines
}

pub fn print_fetch(outcome: &FetchOutcome, total: usize) {
    println!("{}", format_fetch(outcome, total));
}

pub fn print_grid(cells: &[Cell], columns: usize, content: Size) {
    for line in format_grid(cells, columns, content) {
        println!("{}", line);
    }
}
