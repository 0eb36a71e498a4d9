//! CLI output formatting.
//!
//! Every formatter is a pure function returning display lines, so output can
//! be tested without capturing stdout. The `print_*` wrappers write those
//! lines to stdout. Diagnostics go through `tracing` on stderr instead.
//!
//! # Output Format
//!
//! ## Plans
//!
//! ```text
//! Source: 300x200
//!     Scale: 150x100
//!     Crop: 100x100 at 25,0 (horizontal overhang)
//! Result: 100x100
//! ```
//!
//! ## Info
//!
//! ```text
//! dawn.jpg
//!     Format: JPEG (image/jpeg)
//!     Size: 4000x3000
//! ```
//!
//! ## Batch
//!
//! ```text
//! dawn.jpg: 4000x3000 → 800x600
//!     Output: out/dawn.jpg
//! notes.txt: failed
//!     Error: Wrong file type: notes.txt
//! Processed 1 image, 1 failed
//! ```

use crate::imaging::{CropAxis, ImageKind, ResizePlan, Size};
use crate::process::{BatchSummary, ProcessEvent};
use serde::Serialize;
use std::path::Path;

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

// ============================================================================
// Plans
// ============================================================================

/// Format a resize plan for a `source`-sized image.
pub fn format_plan(source: Size, plan: &ResizePlan) -> Vec<String> {
    let mut lines = vec![format!("Source: {source}")];
    match plan {
        ResizePlan::NoChange => {
            lines.push(format!("{}No change", indent(1)));
        }
        ResizePlan::Scaled { target } => {
            lines.push(format!("{}Scale: {target}", indent(1)));
        }
        ResizePlan::ScaledWithCrop {
            canvas_before_crop,
            crop_axis,
            ..
        } => {
            lines.push(format!("{}Scale: {canvas_before_crop}", indent(1)));
            if let Some(window) = plan.crop_window() {
                let axis = match crop_axis {
                    CropAxis::Horizontal => "horizontal",
                    CropAxis::Vertical => "vertical",
                };
                lines.push(format!(
                    "{}Crop: {} at {},{} ({axis} overhang)",
                    indent(1),
                    window.size(),
                    window.x,
                    window.y
                ));
            }
        }
    }
    lines.push(format!("Result: {}", plan.output_size(source)));
    lines
}

#[derive(Serialize)]
struct PlanReport<'a> {
    source: Size,
    result: Size,
    plan: &'a ResizePlan,
}

/// Pretty JSON for `--json`: `{ "source", "result", "plan" }`.
pub fn format_plan_json(source: Size, plan: &ResizePlan) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&PlanReport {
        source,
        result: plan.output_size(source),
        plan,
    })
}

pub fn print_plan(source: Size, plan: &ResizePlan) {
    for line in format_plan(source, plan) {
        println!("{}", line);
    }
}

// ============================================================================
// Info
// ============================================================================

/// Format the identity of one image file.
pub fn format_info(path: &Path, kind: ImageKind, size: Size) -> Vec<String> {
    vec![
        file_label(path),
        format!("{}Format: {} ({})", indent(1), kind.name(), kind.mime_type()),
        format!("{}Size: {size}", indent(1)),
    ]
}

pub fn print_info(path: &Path, kind: ImageKind, size: Size) {
    for line in format_info(path, kind, size) {
        println!("{}", line);
    }
}

// ============================================================================
// Batch
// ============================================================================

/// Format a single batch progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Processed {
            source,
            output,
            from,
            to,
            plan,
        } => {
            let change = if plan.is_no_change() {
                format!("{from} (unchanged)")
            } else {
                format!("{from} \u{2192} {to}")
            };
            vec![
                format!("{}: {change}", file_label(source)),
                format!("{}Output: {}", indent(1), output.display()),
            ]
        }
        ProcessEvent::Failed { source, error } => vec![
            format!("{}: failed", file_label(source)),
            format!("{}Error: {error}", indent(1)),
        ],
    }
}

/// One-line tally for the end of a batch.
pub fn format_batch_summary(summary: &BatchSummary) -> String {
    let processed = plural(summary.processed_count(), "image");
    match summary.failed_count() {
        0 => format!("Processed {processed}"),
        failed => format!("Processed {processed}, {failed} failed"),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{plan_fit_exact, plan_fit_within};
    use std::path::PathBuf;

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    // =========================================================================
    // Plan formatting tests
    // =========================================================================

    #[test]
    fn format_plan_no_change() {
        let source = Size::new(100, 80);
        let plan = plan_fit_within(source, 200, 200).unwrap();
        assert_eq!(
            format_plan(source, &plan),
            vec!["Source: 100x80", "    No change", "Result: 100x80"]
        );
    }

    #[test]
    fn format_plan_scaled() {
        let source = Size::new(1000, 500);
        let plan = plan_fit_within(source, 500, 500).unwrap();
        assert_eq!(
            format_plan(source, &plan),
            vec!["Source: 1000x500", "    Scale: 500x250", "Result: 500x250"]
        );
    }

    #[test]
    fn format_plan_with_crop() {
        let source = Size::new(300, 200);
        let plan = plan_fit_exact(source, Some(100), Some(100)).unwrap();
        assert_eq!(
            format_plan(source, &plan),
            vec![
                "Source: 300x200",
                "    Scale: 150x100",
                "    Crop: 100x100 at 25,0 (horizontal overhang)",
                "Result: 100x100",
            ]
        );
    }

    #[test]
    fn plan_json_contains_result() {
        let source = Size::new(256, 256);
        let plan = plan_fit_exact(source, Some(100), Some(50)).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&format_plan_json(source, &plan).unwrap()).unwrap();

        assert_eq!(json["source"]["width"], 256);
        assert_eq!(json["result"]["width"], 100);
        assert_eq!(json["result"]["height"], 50);
        assert_eq!(json["plan"]["kind"], "scaled_with_crop");
        assert_eq!(json["plan"]["crop_axis"], "vertical");
    }

    // =========================================================================
    // Info formatting tests
    // =========================================================================

    #[test]
    fn format_info_lines() {
        let lines = format_info(
            Path::new("photos/dawn.jpg"),
            ImageKind::Jpeg,
            Size::new(4000, 3000),
        );
        assert_eq!(
            lines,
            vec!["dawn.jpg", "    Format: JPEG (image/jpeg)", "    Size: 4000x3000"]
        );
    }

    // =========================================================================
    // Batch formatting tests
    // =========================================================================

    fn processed(name: &str, from: Size, to: Size, plan: ResizePlan) -> ProcessEvent {
        ProcessEvent::Processed {
            source: PathBuf::from("in").join(name),
            output: PathBuf::from("out").join(name),
            from,
            to,
            plan,
        }
    }

    #[test]
    fn format_processed_event() {
        let event = processed(
            "dawn.jpg",
            Size::new(4000, 3000),
            Size::new(800, 600),
            ResizePlan::Scaled {
                target: Size::new(800, 600),
            },
        );
        let lines = format_process_event(&event);
        assert_eq!(lines[0], "dawn.jpg: 4000x3000 \u{2192} 800x600");
        assert!(lines[1].starts_with("    Output: out"));
        assert!(lines[1].ends_with("dawn.jpg"));
    }

    #[test]
    fn format_unchanged_event() {
        let event = processed(
            "icon.png",
            Size::new(16, 16),
            Size::new(16, 16),
            ResizePlan::NoChange,
        );
        assert_eq!(format_process_event(&event)[0], "icon.png: 16x16 (unchanged)");
    }

    #[test]
    fn format_failed_event() {
        let event = ProcessEvent::Failed {
            source: PathBuf::from("notes.txt"),
            error: "Wrong file type: notes.txt".into(),
        };
        assert_eq!(
            format_process_event(&event),
            vec!["notes.txt: failed", "    Error: Wrong file type: notes.txt"]
        );
    }

    #[test]
    fn summary_counts() {
        let ok = processed(
            "a.png",
            Size::new(2, 2),
            Size::new(1, 1),
            ResizePlan::Scaled {
                target: Size::new(1, 1),
            },
        );
        let failed = ProcessEvent::Failed {
            source: PathBuf::from("b.png"),
            error: "x".into(),
        };

        let one = BatchSummary {
            outcomes: vec![ok.clone()],
        };
        assert_eq!(format_batch_summary(&one), "Processed 1 image");

        let mixed = BatchSummary {
            outcomes: vec![ok.clone(), ok, failed],
        };
        assert_eq!(format_batch_summary(&mixed), "Processed 2 images, 1 failed");

        assert_eq!(
            format_batch_summary(&BatchSummary::default()),
            "Processed 0 images"
        );
    }
}
