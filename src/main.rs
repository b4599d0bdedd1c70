//! Kindred scoring CLI entrypoint.

use mimalloc::MiMalloc;

use kindred::config::Config;
use kindred::engine::ScoringEngine;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        model_dir = %config.model_dir.display(),
        top_n = config.top_n,
        unknown_threshold = config.unknown_threshold,
        "Kindred starting"
    );

    let engine = ScoringEngine::new(config)?;
    tracing::info!("{}", engine.model_details());

    let names: Vec<String> = std::env::args().skip(1).collect();
    if names.is_empty() {
        tracing::info!("No package names given, nothing to score");
        return Ok(());
    }

    let outcome = engine.predict(&names);
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
