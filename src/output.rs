//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Run
//!
//! ```text
//! Framing 3 images with 3 workers
//! [1/3] beach.jpg → beach-frame.jpg (1100x1100)
//! [2/3] dog.png: FAILED
//!     failed to decode input/dog.png: ...
//! [3/3] cat.webp → cat-frame.webp (945x945)
//!
//! Framed 2 of 3 images, 1 failed
//!     dog.png: failed to decode input/dog.png: ...
//! ```
//!
//! Progress lines arrive in completion order, so the file order differs
//! between runs; the counter always runs 1..=N.
//!
//! ## Check
//!
//! ```text
//! Settings: aspect 1:1, thickness 5%, color #ffffff, quality 95
//! beach.jpg 1000x800 → 1100x1100, image at (50, 150)
//!     Output: beach-frame.jpg
//! broken.jpg: ERROR failed to decode input/broken.jpg: ...
//!
//! 1 of 2 images can be framed
//! ```
//!
//! # Architecture
//!
//! Each display has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::batch::{BatchEvent, BatchReport, FileOutcome, PlannedFile};
use crate::imaging::FrameSettings;
use crate::scan::IMAGE_EXTENSIONS;
use crate::session::Summary;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// File name of a path, falling back to the whole path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `1 image`, `2 images`.
fn count_noun(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn progress_prefix(completed: usize, total: usize) -> String {
    format!("[{completed}/{total}]")
}

// ============================================================================
// Run
// ============================================================================

/// Format a single batch progress event as display lines.
pub fn format_batch_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::Started { total, workers } => vec![format!(
            "Framing {} with {}",
            count_noun(*total, "image"),
            count_noun(*workers, "worker")
        )],
        BatchEvent::FileFinished {
            completed,
            total,
            outcome,
        } => {
            let prefix = progress_prefix(*completed, *total);
            match outcome {
                FileOutcome::Framed(framed) => vec![format!(
                    "{} {} → {} ({}x{})",
                    prefix,
                    display_name(&framed.source),
                    display_name(&framed.output),
                    framed.layout.width,
                    framed.layout.height
                )],
                FileOutcome::Failed(failure) => vec![
                    format!("{} {}: FAILED", prefix, display_name(&failure.source)),
                    format!("    {}", failure.error),
                ],
            }
        }
    }
}

/// Format the closing summary of a batch.
pub fn format_report(report: &BatchReport) -> Vec<String> {
    let mut headline = format!(
        "Framed {} of {}",
        report.processed_count(),
        count_noun(report.total, "image")
    );
    if !report.failures.is_empty() {
        headline.push_str(&format!(", {} failed", report.failures.len()));
    }
    if report.skipped > 0 {
        headline.push_str(&format!(", {} skipped", report.skipped));
    }

    let mut lines = vec![headline];
    for failure in &report.failures {
        lines.push(format!(
            "    {}: {}",
            display_name(&failure.source),
            failure.error
        ));
    }
    lines
}

/// Message for a folder with nothing to frame.
pub fn format_nothing_to_do(input_dir: &Path) -> String {
    let extensions: Vec<String> = IMAGE_EXTENSIONS.iter().map(|e| format!(".{e}")).collect();
    format!(
        "No images found in {} (looking for {})",
        input_dir.display(),
        extensions.join(", ")
    )
}

/// Format the terminal summary of an interactive session.
pub fn format_summary(summary: &Summary) -> Vec<String> {
    match summary {
        Summary::NothingToDo => vec!["Nothing to do: the input folder has no images".to_string()],
        Summary::Completed(report) => format_report(report),
    }
}

pub fn print_batch_event(event: &BatchEvent) {
    for line in format_batch_event(event) {
        println!("{}", line);
    }
}

pub fn print_report(report: &BatchReport) {
    for line in format_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// One-line description of the parsed frame settings.
pub fn format_settings(settings: &FrameSettings) -> String {
    format!(
        "Settings: aspect {}, thickness {}, color {}, quality {}",
        settings.aspect,
        settings.thickness,
        settings.color,
        settings.quality.value()
    )
}

/// Format one dry-run entry.
pub fn format_check_line(planned: &PlannedFile) -> Vec<String> {
    let name = display_name(&planned.source);
    match &planned.plan {
        Ok(framed) => vec![
            format!(
                "{} {}x{} → {}x{}, image at ({}, {})",
                name,
                framed.source.width,
                framed.source.height,
                framed.layout.width,
                framed.layout.height,
                framed.layout.offset_x,
                framed.layout.offset_y
            ),
            format!("    Output: {}", display_name(&planned.output)),
        ],
        Err(error) => vec![format!("{}: ERROR {}", name, error)],
    }
}

/// Format the whole dry run: settings, one entry per file, tally.
pub fn format_check_output(settings: &FrameSettings, planned: &[PlannedFile]) -> Vec<String> {
    let mut lines = vec![format_settings(settings)];
    for entry in planned {
        lines.extend(format_check_line(entry));
    }
    let ok = planned.iter().filter(|p| p.plan.is_ok()).count();
    lines.push(String::new());
    lines.push(format!(
        "{} of {} can be framed",
        ok,
        count_noun(planned.len(), "image")
    ));
    lines
}

pub fn print_check_output(settings: &FrameSettings, planned: &[PlannedFile]) {
    for line in format_check_output(settings, planned) {
        println!("{}", line);
    }
}
