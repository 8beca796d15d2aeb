// src/core/mutation.rs — Depth and breadth mutation of a leaf

use std::sync::Arc;

use super::judge::{PruningJudge, Verdict};
use super::prompts::TemplateSet;
use crate::forest::{Forest, Node, NodeId};
use crate::infra::errors::EvolveError;
use crate::provider::{Responder, Sampling};
use crate::util::preview;

/// What one leaf produced.
#[derive(Debug, Default)]
pub struct Expansion {
    /// Depth children appended to the leaf during this expansion, in template order.
    pub children: Vec<NodeId>,
    /// Accepted breadth candidate. Not yet part of the forest; the caller decides.
    pub promoted: Option<Node>,
    /// Candidates the judge discarded.
    pub pruned: usize,
}

pub struct MutationGenerator {
    responder: Arc<dyn Responder>,
    templates: Arc<TemplateSet>,
    judge: PruningJudge,
    sampling: Sampling,
}

impl MutationGenerator {
    pub fn new(responder: Arc<dyn Responder>, templates: Arc<TemplateSet>, sampling: Sampling) -> Self {
        let judge = PruningJudge::new(responder.clone(), templates.clone(), sampling.clone());
        Self {
            responder,
            templates,
            judge,
            sampling,
        }
    }

    /// Apply every depth template and the breadth template to `leaf`.
    ///
    /// Each template sees the leaf's own prompt, never an earlier candidate
    /// from the same pass. Accepted depth candidates become children of the
    /// leaf; the forest's root list is left alone.
    pub async fn expand(&self, forest: &mut Forest, leaf: NodeId) -> Result<Expansion, EvolveError> {
        let parent = forest.node(leaf).clone();
        let mut expansion = Expansion::default();

        for index in 0..self.templates.depth_count() {
            let prompt = self.templates.render_depth(index, &parent.user_prompt)?;
            let candidate = self.responder.respond(&self.sampling.request(prompt)).await?;

            match self.judge.judge(candidate.as_deref(), &parent).await? {
                Verdict::Keep => {
                    // Keep verdicts only come back for present candidates.
                    let text = candidate.unwrap_or_default();
                    tracing::debug!(template = index, "depth mutation kept: {}", preview(&text, 80));
                    let child = forest.append_child(leaf, Node::derived(&parent, text));
                    expansion.children.push(child);
                }
                Verdict::Prune(reason) => {
                    tracing::debug!(template = index, %reason, "depth mutation pruned");
                    expansion.pruned += 1;
                }
            }
        }

        let prompt = self.templates.render_breadth(&parent.user_prompt)?;
        let candidate = self.responder.respond(&self.sampling.request(prompt)).await?;
        match self.judge.judge(candidate.as_deref(), &parent).await? {
            Verdict::Keep => {
                let text = candidate.unwrap_or_default();
                tracing::debug!("breadth mutation kept: {}", preview(&text, 80));
                expansion.promoted = Some(Node::derived(&parent, text));
            }
            Verdict::Prune(reason) => {
                tracing::debug!(%reason, "breadth mutation pruned");
                expansion.pruned += 1;
            }
        }

        Ok(expansion)
    }
}
