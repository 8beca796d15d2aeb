// src/main.rs — evoforest entry point

use clap::Parser;

use evoforest::cli::evolve::run_evolve;
use evoforest::cli::validate::run_validate;
use evoforest::cli::Cli;
use evoforest::infra::config::Config;
use evoforest::infra::logger;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Respects RUST_LOG; --verbose lowers the default level
    logger::init_logging(if cli.verbose { "debug" } else { "warn" });

    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.validate {
        if !run_validate(&cli.input)? {
            anyhow::bail!("{} failed validation", cli.input.display());
        }
        return Ok(());
    }

    // Load config (falls back to defaults if no config.toml)
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    run_evolve(&cli, &config).await
}
