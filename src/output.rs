//! CLI output formatting.
//!
//! Output is slot-centric: each line leads with the file an asset catalog
//! will see, followed by its pixel size and what happened to it. Targets are
//! grouped under a platform header and numbered within the group.
//!
//! # Output Format
//!
//! ## Targets (dry run)
//!
//! ```text
//! iPhone
//!     001 AppIcon-20x20@2x.png  40×40
//!     002 AppIcon-20x20@3x.png  60×60
//! App Store
//!     001 AppIcon-1024x1024@1x.png  1024×1024
//!
//! 9 targets, 8 distinct sizes
//! ```
//!
//! ## Generate
//!
//! ```text
//! Generating 9 icons
//! Source: 1024×1024 (sniffed)
//!     AppIcon-20x20@2x.png  40×40  rendered  preview:1
//!     AppIcon-60x60@2x.png  120×120  reused  preview:5
//! Writing archive
//!
//! Wrote AppIcon.appiconset.zip (212.4 KB)
//! 8 rendered, 1 reused (9 total)
//! ```
//!
//! # Architecture
//!
//! Every stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::catalog::Idiom;
use crate::generate::{GenerateOutput, RunEvent};
use crate::input::humanize_bytes;
use crate::targets::{PixelSize, TargetSpec};
use std::collections::HashSet;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Group header for an idiom.
fn idiom_header(idiom: Idiom) -> &'static str {
    match idiom {
        Idiom::Iphone => "iPhone",
        Idiom::Ipad => "iPad",
        Idiom::IosMarketing => "App Store",
        Idiom::Mac => "Mac",
        Idiom::Watch => "Apple Watch",
        Idiom::Tv => "Apple TV",
        Idiom::Vision => "Apple Vision",
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Targets
// ============================================================================

/// Format the resolved target list, grouped by idiom in catalog order.
pub fn format_targets(targets: &[TargetSpec]) -> Vec<String> {
    if targets.is_empty() {
        return vec!["No platforms selected.".to_string()];
    }

    let mut lines = Vec::new();
    let mut current: Option<Idiom> = None;
    let mut index = 0;
    for target in targets {
        if current != Some(target.idiom) {
            current = Some(target.idiom);
            index = 0;
            lines.push(idiom_header(target.idiom).to_string());
        }
        index += 1;
        lines.push(format!(
            "{}{} {}  {}",
            indent(1),
            format_index(index),
            target.filename(),
            target.pixel_size()
        ));
    }

    let distinct: HashSet<PixelSize> = targets.iter().map(TargetSpec::pixel_size).collect();
    lines.push(String::new());
    lines.push(format!(
        "{}, {}",
        plural(targets.len(), "target"),
        plural(distinct.len(), "distinct size")
    ));
    lines
}

pub fn print_targets(targets: &[TargetSpec]) {
    for line in format_targets(targets) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Format a single run progress event as display lines.
pub fn format_run_event(event: &RunEvent) -> Vec<String> {
    match event {
        RunEvent::Started { targets } => {
            vec![format!("Generating {}", plural(*targets, "icon"))]
        }
        RunEvent::Decoded {
            width,
            height,
            strategy,
        } => vec![format!("Source: {}×{} ({})", width, height, strategy)],
        RunEvent::Rendered {
            filename,
            size,
            preview,
            reused,
            ..
        } => {
            let status = if *reused { "reused" } else { "rendered" };
            vec![format!(
                "{}{}  {}  {}  {}",
                indent(1),
                filename,
                size,
                status,
                preview
            )]
        }
        RunEvent::Advisory(advisory) => vec![advisory.to_string()],
        RunEvent::StackIncluded { files } => {
            vec![format!("Solid image stack: {}", plural(*files, "file"))]
        }
        RunEvent::Archiving => vec!["Writing archive".to_string()],
    }
}

/// Format the closing summary of a successful run.
pub fn format_generate_summary(output: &GenerateOutput, path: &Path) -> Vec<String> {
    vec![
        String::new(),
        format!(
            "Wrote {} ({})",
            path.display(),
            humanize_bytes(output.archive.len() as u64)
        ),
        output.stats.to_string(),
    ]
}

pub fn print_generate_summary(output: &GenerateOutput, path: &Path) {
    for line in format_generate_summary(output, path) {
        println!("{}", line);
    }
}
