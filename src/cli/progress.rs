// src/cli/progress.rs — Terminal progress renderer for epoch feedback

use crate::core::types::{EpochReport, ProgressEvent};

/// Build a progress callback that writes to stderr.
///
/// Stdout is left for the final summary and `--show-trees` output.
pub fn terminal_progress() -> impl Fn(ProgressEvent) + Send + 'static {
    move |event| {
        let line = render(&event);
        match event {
            ProgressEvent::LeafProcessed { index, total, .. } => {
                eprint!("\r{line}");
                if index == total {
                    eprintln!();
                }
            }
            _ => eprintln!("{line}"),
        }
    }
}

fn render(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::EpochStart {
            epoch,
            epochs,
            leaves,
        } => format!("[epoch {epoch}/{epochs}] evolving {leaves} leaf node(s)"),
        ProgressEvent::LeafProcessed {
            epoch,
            index,
            total,
        } => {
            let pct = if *total == 0 { 100 } else { index * 100 / total };
            format!("[epoch {epoch}] {index}/{total} leaves ({pct}%)")
        }
        ProgressEvent::Checkpointed { epoch, path } => {
            format!("[epoch {epoch}] results saved to {}", path.display())
        }
        ProgressEvent::EpochEnd(report) => render_report(report),
    }
}

/// Per-epoch statistics block.
pub fn render_report(r: &EpochReport) -> String {
    format!(
        "[epoch {}] trees={} nodes={} leaves_added={} roots_added={}",
        r.epoch, r.trees, r.nodes, r.leaves_added, r.roots_added
    )
}
