use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result};
use depthgate::clock::SystemClock;
use depthgate::observability::{Observer, create_observer};
use depthgate::oracle::create_oracle;
use depthgate::scoring::{Tier, TurnScorer};
use depthgate::store::InMemoryContextStore;
use depthgate::sweeper::spawn_sweeper;
use depthgate::{Config, EngagementEngine, TurnRequest};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Simulate { key, tier } => run_simulate(config, key, tier).await,
        Commands::Score { message, tier } => run_score(&config, &message, tier).await,
        Commands::Config => {
            let mut shown = config;
            if shown.oracle.api_key.is_some() {
                shown.oracle.api_key = Some("***".into());
            }
            let rendered = toml::to_string_pretty(&shown).context("Failed to serialize config")?;
            println!("{rendered}");
            Ok(())
        }
    }
}

/// Feed stdin lines through one engine session, printing one JSON outcome
/// per line. Depth state is carried between turns like a caller would.
async fn run_simulate(config: Config, key: String, tier: Tier) -> Result<()> {
    let observer: Arc<dyn Observer> = Arc::from(create_observer(&config.observability));
    let oracle = create_oracle(&config.oracle);
    let store = Arc::new(InMemoryContextStore::new(&config.store));
    let sweep_interval = config.sweep_interval();
    let sweeper_enabled = config.sweeper.enabled;

    let engine = Arc::new(
        EngagementEngine::new(config, store, oracle, Arc::new(SystemClock)).with_observer(observer),
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let sweeper = sweeper_enabled
        .then(|| spawn_sweeper(Arc::clone(&engine), sweep_interval, shutdown_rx));

    info!(key = %key, tier = %tier, "simulation started, reading turns from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut depth = None;
    let mut turns = 0_usize;
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let mut request = TurnRequest::new(key.clone(), line).with_tier(tier);
        request.depth = depth;

        let outcome = engine.process_turn(request).await;
        if let Some(state) = outcome.depth_state {
            depth = Some(state);
        }
        println!(
            "{}",
            serde_json::to_string(&outcome).context("Failed to serialize outcome")?
        );
        turns += 1;
    }

    let _ = shutdown_tx.send(true);
    if let Some(handle) = sweeper {
        handle.await.context("Sweeper task failed")?;
    }
    info!(turns, "simulation finished");
    Ok(())
}

async fn run_score(config: &Config, message: &str, tier: Tier) -> Result<()> {
    let scorer = TurnScorer::new(
        config.scorer.clone(),
        create_oracle(&config.oracle),
        config.oracle_timeout(),
    );
    let breakdown = scorer.heuristic(message);
    let trigger = scorer.escalation_trigger(message, &breakdown);
    let score = scorer.score(message, tier).await;

    let report = serde_json::json!({
        "heuristic": breakdown,
        "escalation_trigger": trigger,
        "score": score,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize score")?
    );
    Ok(())
}
