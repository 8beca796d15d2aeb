// src/core/mod.rs — Evolution engine

pub mod judge;
pub mod mutation;
pub mod prompts;
pub mod scheduler;
pub mod types;

pub use judge::{PruneReason, PruningJudge, Verdict};
pub use mutation::{Expansion, MutationGenerator};
pub use prompts::TemplateSet;
pub use scheduler::EpochScheduler;
pub use types::{EpochReport, ProgressEvent, SchedulerState};
