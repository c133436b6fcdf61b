use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use sprout_engine::{GrowthConfig, GrowthEngine, GrowthSettings, World};
use sprout_server::terrain::{self, TerrainParams};
use sprout_server::{block, event_bus, host};

#[derive(Parser, Debug)]
#[command(name = "sprout", about = "Grow grass and snow over a generated voxel world")]
struct Args {
    /// Growth config (TOML). Defaults to Konstructs grass and snow on dirt.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Terrain radius in columns.
    #[arg(long, default_value_t = 24)]
    radius: i64,

    /// Stop after this many seconds instead of waiting for Ctrl+C.
    #[arg(long)]
    seconds: Option<u64>,

    /// Seeds both the terrain and the growth engine.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Simulation speed multiplier.
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Seconds between stats lines; 0 disables them.
    #[arg(long, default_value_t = 5)]
    stats_interval: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading growth config {}", path.display()))?;
            GrowthSettings::from_toml_str(&text)
                .with_context(|| format!("parsing growth config {}", path.display()))?
        }
        None => block::default_settings(),
    };
    let config = Arc::new(GrowthConfig::from_settings(settings).context("invalid growth config")?);

    tracing::info!("Sprout -- terrain growth simulator");

    // ── Start the growth host before any terrain exists ────────────────
    let world = Arc::new(World::new());
    let bus = event_bus::channel();
    let engine = GrowthEngine::seeded(Arc::clone(&config), args.seed);
    let handle = host::spawn(engine, Arc::clone(&world), bus.clone());
    handle.set_simulation_speed(args.speed);

    // ── Generate terrain; the bus carries it to the engine ─────────────
    tracing::info!("Generating terrain (radius {}, seed {})...", args.radius, args.seed);
    let params = TerrainParams {
        radius: args.radius,
        seed: args.seed,
        ..TerrainParams::default()
    };
    let placed = event_bus::apply_external(&world, &bus, "terrain", terrain::generate(&params));
    tracing::info!("Terrain ready: {} blocks", placed);

    // ── Periodic stats ──────────────────────────────────────────────────
    let stats = (args.stats_interval > 0).then(|| {
        let metrics = Arc::clone(handle.metrics());
        let every = Duration::from_secs(args.stats_interval);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.tick().await; // nothing to report at startup
            loop {
                interval.tick().await;
                match serde_json::to_string(&metrics.snapshot()) {
                    Ok(json) => tracing::info!("stats {}", json),
                    Err(e) => tracing::warn!("Failed to serialize stats: {}", e),
                }
            }
        })
    });

    let run_for = async {
        match args.seconds {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        _ = run_for => {
            tracing::info!("Run time elapsed, shutting down...");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received, shutting down...");
        }
    }

    if let Some(stats) = stats {
        stats.abort();
    }
    let final_stats = handle.metrics().snapshot();
    let engine = handle.shutdown().await?;

    // ── Census ──────────────────────────────────────────────────────────
    for (variant, _) in config.variants() {
        tracing::info!("{}: {} blocks", variant, world.count_of(variant));
    }
    for substrate in config.substrate() {
        tracing::info!("{}: {} blocks", substrate, world.count_of(substrate));
    }
    tracing::info!("{} candidates still queued", engine.queue().len());
    println!(
        "{}",
        serde_json::to_string_pretty(&final_stats).context("serializing final stats")?
    );

    Ok(())
}
