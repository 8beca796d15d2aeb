// src/core/judge.rs — Pruning judge for candidate mutations

use std::sync::Arc;

use super::prompts::TemplateSet;
use crate::forest::Node;
use crate::infra::errors::EvolveError;
use crate::provider::{Responder, Sampling};

/// The only answer that marks two prompts as semantically equal.
pub const EQUAL_TOKEN: &str = "Equal";

/// Why a candidate was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneReason {
    Absent,
    Unchanged,
    Empty,
    Equivalent,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PruneReason::Absent => "no response",
            PruneReason::Unchanged => "identical to parent",
            PruneReason::Empty => "empty",
            PruneReason::Equivalent => "judged equal to parent",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Prune(PruneReason),
}

impl Verdict {
    pub fn is_prune(self) -> bool {
        matches!(self, Verdict::Prune(_))
    }
}

/// Decides whether a candidate prompt adds anything over its parent.
///
/// Cheap textual checks run first; the responder is consulted only when the
/// candidate survives them. A responder failure is returned as an error, never
/// folded into a verdict.
pub struct PruningJudge {
    responder: Arc<dyn Responder>,
    templates: Arc<TemplateSet>,
    sampling: Sampling,
}

impl PruningJudge {
    pub fn new(responder: Arc<dyn Responder>, templates: Arc<TemplateSet>, sampling: Sampling) -> Self {
        Self {
            responder,
            templates,
            sampling,
        }
    }

    pub async fn judge(&self, candidate: Option<&str>, parent: &Node) -> Result<Verdict, EvolveError> {
        let Some(candidate) = candidate else {
            return Ok(Verdict::Prune(PruneReason::Absent));
        };

        let trimmed = candidate.trim();
        if trimmed == parent.user_prompt.trim() {
            return Ok(Verdict::Prune(PruneReason::Unchanged));
        }
        if trimmed.is_empty() {
            return Ok(Verdict::Prune(PruneReason::Empty));
        }

        let comparison = self.templates.render_equal(candidate, &parent.user_prompt)?;
        let answer = self
            .responder
            .respond(&self.sampling.request(comparison))
            .await?;

        match answer {
            Some(a) if a.trim() == EQUAL_TOKEN => Ok(Verdict::Prune(PruneReason::Equivalent)),
            _ => Ok(Verdict::Keep),
        }
    }

    pub async fn should_prune(&self, candidate: Option<&str>, parent: &Node) -> Result<bool, EvolveError> {
        Ok(self.judge(candidate, parent).await?.is_prune())
    }
}
