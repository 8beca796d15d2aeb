// src/core/scheduler.rs — Epoch loop: frontier → mutation → checkpoint

use std::path::PathBuf;

use super::mutation::MutationGenerator;
use super::types::{EpochReport, ProgressEvent, SchedulerState};
use crate::dataset;
use crate::forest::Forest;
use crate::infra::errors::EvolveError;

/// Drives a fixed number of epochs over a forest.
///
/// Every epoch takes a fresh snapshot of the leaves, expands each one to
/// completion in order, then overwrites the output file with the whole forest.
/// There is no convergence check. The first error aborts the run; epochs
/// already checkpointed stay on disk.
pub struct EpochScheduler {
    generator: MutationGenerator,
    epochs: u32,
    output: PathBuf,
    state: SchedulerState,
    on_progress: Option<Box<dyn Fn(ProgressEvent) + Send>>,
}

impl EpochScheduler {
    pub fn new(generator: MutationGenerator, epochs: u32, output: impl Into<PathBuf>) -> Self {
        Self {
            generator,
            epochs,
            output: output.into(),
            state: SchedulerState::Idle,
            on_progress: None,
        }
    }

    /// Register a callback for real-time progress events.
    pub fn with_progress(mut self, f: impl Fn(ProgressEvent) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(cb) = &self.on_progress {
            cb(event);
        }
    }

    pub async fn run(&mut self, forest: &mut Forest) -> Result<Vec<EpochReport>, EvolveError> {
        let mut reports = Vec::with_capacity(self.epochs as usize);
        for epoch in 1..=self.epochs {
            let report = self.run_epoch(forest, epoch).await.inspect_err(|e| {
                tracing::error!(epoch, "Epoch aborted: {}", e);
            })?;
            reports.push(report);
        }
        self.state = SchedulerState::Done;
        Ok(reports)
    }

    async fn run_epoch(&mut self, forest: &mut Forest, epoch: u32) -> Result<EpochReport, EvolveError> {
        self.state = SchedulerState::EpochRunning(epoch);

        let frontier = forest.leaves();
        let total = frontier.len();
        tracing::info!(epoch, epochs = self.epochs, leaves = total, "Evolving epoch");
        self.emit(ProgressEvent::EpochStart {
            epoch,
            epochs: self.epochs,
            leaves: total,
        });

        let mut leaves_added = 0;
        let mut roots_added = 0;
        for (index, leaf) in frontier.into_iter().enumerate() {
            let expansion = self.generator.expand(forest, leaf).await?;
            if let Some(node) = expansion.promoted {
                forest.push_root(node);
                roots_added += 1;
            }
            leaves_added += forest.node(leaf).children().len();
            self.emit(ProgressEvent::LeafProcessed {
                epoch,
                index: index + 1,
                total,
            });
        }

        dataset::save_forest(forest, &self.output)?;
        self.state = SchedulerState::Checkpointed(epoch);
        tracing::info!(epoch, path = %self.output.display(), "Checkpoint written");
        self.emit(ProgressEvent::Checkpointed {
            epoch,
            path: self.output.clone(),
        });

        let stats = forest.stats();
        let report = EpochReport {
            epoch,
            trees: stats.trees,
            nodes: stats.nodes,
            leaves_added,
            roots_added,
            leaves_processed: total,
        };
        tracing::info!(
            epoch,
            trees = report.trees,
            nodes = report.nodes,
            leaves_added = report.leaves_added,
            roots_added = report.roots_added,
            "Epoch complete"
        );
        self.emit(ProgressEvent::EpochEnd(report.clone()));
        Ok(report)
    }
}
