// src/core/types.rs — Scheduler state, reports, and progress events

use std::path::PathBuf;

/// Where the scheduler is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    EpochRunning(u32),
    Checkpointed(u32),
    Done,
}

/// Statistics printed after each epoch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpochReport {
    /// 1-based epoch number.
    pub epoch: u32,
    pub trees: usize,
    pub nodes: usize,
    /// Running total: for every leaf processed this epoch, its child count
    /// afterwards. Children from earlier epochs are included.
    pub leaves_added: usize,
    pub roots_added: usize,
    /// Frontier size at the start of the epoch.
    pub leaves_processed: usize,
}

/// Progress events emitted by the scheduler.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    EpochStart {
        epoch: u32,
        epochs: u32,
        leaves: usize,
    },
    LeafProcessed {
        epoch: u32,
        index: usize,
        total: usize,
    },
    EpochEnd(EpochReport),
    Checkpointed {
        epoch: u32,
        path: PathBuf,
    },
}
