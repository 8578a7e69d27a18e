//! Headless autoplay runner (default binary).
//!
//! Plays a seeded battle with the chain planner and prints every board event
//! as one JSON line on stdout, followed by a final snapshot line. Logs go to
//! stderr, filtered by `RUST_LOG`.

use anyhow::{anyhow, Context, Result};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::info;
use tracing_subscriber::EnvFilter;

use orb_echo::config::SimConfig;
use orb_echo::core::{BoardEvent, BoardOrchestrator, RandomOrbs};
use orb_echo::engine::{apply_plan, forward_events, resolve_paced, suggest_chain, PlanError};
use orb_echo::observe::{event_line, SnapshotRecord};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = SimConfig::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    config.apply_args(&args)?;

    let (tx, rx) = unbounded_channel();
    let printer = tokio::spawn(print_events(rx));

    let orch = play(&config, &tx).await?;
    drop(tx);
    printer.await.context("event printer panicked")??;

    let snapshot = SnapshotRecord::from(&orch.snapshot());
    println!("{}", serde_json::to_string(&snapshot)?);
    Ok(())
}

async fn print_events(mut rx: UnboundedReceiver<BoardEvent>) -> Result<()> {
    while let Some(event) = rx.recv().await {
        println!("{}", event_line(&event)?);
    }
    Ok(())
}

async fn play(
    config: &SimConfig,
    tx: &UnboundedSender<BoardEvent>,
) -> Result<BoardOrchestrator<RandomOrbs>> {
    let pacing = config.pacing();
    let mut orch = BoardOrchestrator::new(RandomOrbs::seeded(config.seed));
    orch.initialize_for_battle(config.bias());
    forward_events(&mut orch, tx);
    info!(seed = config.seed, turns = config.turns, "battle started");

    for turn in 1..=config.turns {
        if config.inverts_before(turn) {
            let gravity = orch.invert_gravity()?;
            info!(turn, gravity = gravity.as_str(), "boss inverted gravity");
        }
        orch.begin_player_turn();
        forward_events(&mut orch, tx);

        let mut chains = 0u32;
        loop {
            let plan = match suggest_chain(&orch) {
                Ok(plan) => plan,
                Err(PlanError::NotPlayable | PlanError::NoChain) => break,
                Err(e) => return Err(anyhow!("turn {turn}: {}: {}", e.code(), e.message())),
            };
            apply_plan(&mut orch, &plan)
                .map_err(|e| anyhow!("turn {turn}: {}: {}", e.code(), e.message()))?;
            resolve_paced(&mut orch, &pacing, tx).await;
            chains += 1;
        }

        let cd_units = orch.take_cd_reductions();
        info!(
            turn,
            chains,
            combo = orch.combo().current(),
            cd_units,
            gauge = orch.gauge().value(),
            "turn finished"
        );
        orch.end_player_turn();
        forward_events(&mut orch, tx);
    }

    Ok(orch)
}
