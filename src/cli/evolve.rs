// src/cli/evolve.rs — Default command: evolve the seed dataset

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use super::progress;
use super::Cli;
use crate::core::{EpochReport, EpochScheduler, MutationGenerator, ProgressEvent, TemplateSet};
use crate::dataset;
use crate::infra::config::Config;
use crate::infra::paths;
use crate::provider::cache::CachingResponder;
use crate::provider::openai::OpenAiResponder;
use crate::provider::retry::RetryResponder;
use crate::provider::{Responder, Sampling};

/// Effective run settings after merging CLI flags over the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub epochs: u32,
    pub sampling: Sampling,
    pub cache_file: Option<PathBuf>,
}

impl RunSettings {
    pub fn resolve(cli: &Cli, config: &Config) -> Self {
        let use_cache = cli.use_cache || cli.cache_file.is_some() || config.cache.enabled;
        let cache_file = use_cache.then(|| {
            cli.cache_file
                .clone()
                .or_else(|| config.cache.path.clone())
                .unwrap_or_else(paths::default_cache_file)
        });
        Self {
            epochs: cli.epochs.unwrap_or(config.evolution.epochs),
            sampling: Sampling::new(
                cli.model.clone().unwrap_or_else(|| config.model.name.clone()),
                cli.temperature.unwrap_or(config.model.temperature),
            ),
            cache_file,
        }
    }
}

/// Load the seeds, run every epoch, and print the summary.
pub async fn run_evolve(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let settings = RunSettings::resolve(cli, config);

    // Everything that can be misconfigured is checked before the first call.
    let templates = Arc::new(
        TemplateSet::from_config(&config.templates).context("Invalid prompt templates")?,
    );
    let policy = config.retry.to_policy()?;
    let service: Arc<dyn Responder> = Arc::new(OpenAiResponder::from_env()?);
    let retrying: Arc<dyn Responder> = Arc::new(RetryResponder::with_policy(service, policy));
    let cache = settings
        .cache_file
        .as_ref()
        .map(|path| Arc::new(CachingResponder::with_file(retrying.clone(), path.clone())));
    let responder: Arc<dyn Responder> = match &cache {
        Some(c) => c.clone() as Arc<dyn Responder>,
        None => retrying,
    };

    let mut forest = dataset::load_forest(&cli.input)
        .with_context(|| format!("Could not load seeds from {}", cli.input.display()))?;
    println!(
        "Evolving prompts from {} for {} epochs.",
        cli.input.display(),
        settings.epochs
    );
    tracing::info!(
        model = %settings.sampling.model,
        temperature = settings.sampling.temperature,
        depth_templates = templates.depth_count(),
        cache = settings.cache_file.is_some(),
        "Starting evolution"
    );

    let generator = MutationGenerator::new(responder, templates, settings.sampling.clone());
    let mut scheduler = EpochScheduler::new(generator, settings.epochs, cli.output.clone())
        .with_progress(progress_handler(cache.clone(), cli.quiet));

    let outcome = scheduler.run(&mut forest).await;

    // Keep whatever was memoized since the last checkpoint, even when the run aborted.
    if let Some(c) = &cache {
        let stats = c.stats();
        tracing::info!(
            entries = stats.entries,
            hits = stats.hits,
            misses = stats.misses,
            "Response cache"
        );
        save_cache(c);
    }

    let reports = outcome.context("Evolution aborted; the last completed epoch is on disk")?;

    if cli.show_trees {
        for &root in forest.roots() {
            print!("{}", forest.render_tree(root));
        }
    }
    print_summary(&reports, cli);
    Ok(())
}

/// Progress callback for a run: saves the response cache alongside every
/// dataset checkpoint, then renders the event unless `quiet`.
pub fn progress_handler(
    cache: Option<Arc<CachingResponder>>,
    quiet: bool,
) -> impl Fn(ProgressEvent) + Send + 'static {
    let terminal = (!quiet).then(progress::terminal_progress);
    move |event| {
        if let (ProgressEvent::Checkpointed { .. }, Some(c)) = (&event, &cache) {
            save_cache(c);
        }
        if let Some(render) = &terminal {
            render(event);
        }
    }
}

fn save_cache(cache: &CachingResponder) {
    if let Err(e) = cache.persist() {
        tracing::warn!("Failed to save response cache: {}", e);
    }
}

fn print_summary(reports: &[EpochReport], cli: &Cli) {
    for r in reports {
        println!(
            "Epoch {}: Total Trees in Forest: {}, Total Nodes in Forest: {}, Leaves Added: {}, Root Nodes Added: {}",
            r.epoch, r.trees, r.nodes, r.leaves_added, r.roots_added
        );
    }
    if !reports.is_empty() {
        println!("Results saved to {}", cli.output.display());
    }
}
