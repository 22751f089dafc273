//! Crypto Bot Simulator - Main binary
//!
//! Runs the trading-bot market simulation and serves its HTTP/WS API.
//!
//! # Architecture
//!
//! The engine and the server run on separate threads, communicating via
//! channels and shared snapshot state:
//!
//! ```text
//! ┌────────────────┐    TickUpdate (broadcast)    ┌────────────────┐
//! │     Engine     │ ───────────────────────────► │  Axum server   │
//! │  (sim thread)  │    SimData / ServerMetrics   │    (tokio)     │
//! │                │ ◄─────────────────────────── │                │
//! └────────────────┘    SimCommand (channel)      └────────────────┘
//! ```
//!
//! The engine starts live and ticks at the configured interval. Clients
//! pause, resume, and manage bots through the REST and WebSocket API.
//!
//! # Headless Mode
//!
//! Run `--headless` to skip the server and run a fixed number of ticks
//! flat out. Useful for benchmarks, CI, and soak tests.

mod config;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossbeam_channel::{bounded, Receiver, TryRecvError};
use server::{
    BroadcastHook, DataServiceHook, ServerConfig, ServerMetrics, ServerState, SimCommand, SimData,
    TickUpdate,
};
use simulation::{MetricsHook, Simulation, SimulationConfig};
use tokio::sync::{broadcast, RwLock};
use tracing_subscriber::EnvFilter;

pub use config::AppConfig;

/// Crypto bot simulator - simulated market data and trading bots
#[derive(Parser, Debug)]
#[command(name = "crypto-bot-sim")]
#[command(about = "A crypto trading bot simulation with an HTTP/WS API")]
#[command(version)]
struct Args {
    /// Run without the server (headless mode for benchmarks/CI)
    #[arg(long, env = "SIM_HEADLESS")]
    headless: bool,

    /// Ticks to run in headless mode
    #[arg(long, env = "SIM_TICKS")]
    ticks: Option<u64>,

    /// Tick interval in milliseconds
    #[arg(long, env = "SIM_TICK_INTERVAL_MS")]
    tick_interval_ms: Option<u64>,

    /// RNG seed for reproducible runs
    #[arg(long, env = "SIM_SEED")]
    seed: Option<u64>,

    /// Start with an empty bot roster instead of the presets
    #[arg(long, env = "SIM_NO_DEFAULT_BOTS")]
    no_default_bots: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine Thread
// ─────────────────────────────────────────────────────────────────────────────

/// Apply one queued command to the engine. Returns `false` on `Quit`.
fn apply_command(sim: &mut Simulation, metrics: &ServerMetrics, cmd: SimCommand) -> bool {
    match cmd {
        SimCommand::Start => {
            sim.start();
            metrics.set_sim_running(true);
        }
        SimCommand::Pause => {
            sim.stop();
            metrics.set_sim_running(false);
        }
        SimCommand::Toggle => {
            if sim.is_running() {
                sim.stop();
            } else {
                sim.start();
            }
            metrics.set_sim_running(sim.is_running());
        }
        SimCommand::Step => {
            // Single-stepping is only meaningful while paused.
            if !sim.is_running() {
                sim.step();
            }
        }
        SimCommand::Quit => return false,
        SimCommand::StartBot(id) => {
            sim.start_bot(id);
        }
        SimCommand::PauseBot(id) => {
            sim.pause_bot(id);
        }
        SimCommand::CreateBot(config) => {
            sim.create_bot(config);
        }
        SimCommand::DeleteBot(id) => {
            sim.delete_bot(id);
        }
        SimCommand::UpdateSettings { id, patch } => {
            sim.update_bot_settings(id, &patch);
        }
        SimCommand::SetBotStatus { id, status } => {
            sim.set_bot_status(id, status);
        }
    }
    true
}

/// Drain pending commands, returning whether the engine should keep going.
fn process_commands(
    cmd_rx: &Receiver<SimCommand>,
    sim: &mut Simulation,
    metrics: &ServerMetrics,
) -> bool {
    loop {
        match cmd_rx.try_recv() {
            Ok(cmd) => {
                if !apply_command(sim, metrics, cmd) {
                    return false;
                }
            }
            Err(TryRecvError::Empty) => return true,
            // Server side is gone; nothing left to serve.
            Err(TryRecvError::Disconnected) => return false,
        }
    }
}

/// Engine thread body: pace the tick loop, applying queued commands
/// between ticks.
fn run_engine(
    sim_config: SimulationConfig,
    tick_tx: broadcast::Sender<TickUpdate>,
    cmd_rx: Receiver<SimCommand>,
    sim_data: Arc<RwLock<SimData>>,
    metrics: Arc<ServerMetrics>,
) {
    let tick_interval = Duration::from_millis(sim_config.tick_interval_ms);

    // Phase 1: build the engine with the server-facing hooks attached
    let mut sim = Simulation::new(sim_config);
    sim.subscribe(Arc::new(BroadcastHook::new(tick_tx)));
    sim.subscribe(Arc::new(DataServiceHook::new(sim_data, metrics.clone())));

    // Phase 2: start live; clients pause via the API when they want to
    sim.start();
    metrics.set_sim_running(true);

    // Phase 3: main loop
    loop {
        if !process_commands(&cmd_rx, &mut sim, &metrics) {
            break;
        }

        if sim.is_running() {
            sim.step();
            thread::sleep(tick_interval);
        } else {
            thread::sleep(Duration::from_millis(10));
        }
    }

    metrics.set_sim_running(false);
    tracing::info!(tick = sim.tick(), "engine thread exiting");
}

// ─────────────────────────────────────────────────────────────────────────────
// Run Modes
// ─────────────────────────────────────────────────────────────────────────────

/// Run the engine flat out for a fixed number of ticks, no server.
fn run_headless(config: &AppConfig) {
    let total_ticks = config.ticks.max(1);

    // Build the engine with a metrics hook attached
    let mut sim = Simulation::new(config.simulation_config());
    let metrics = Arc::new(MetricsHook::new());
    sim.subscribe(metrics.clone());
    sim.start();

    eprintln!("Running {} ticks...", total_ticks);
    let start = Instant::now();

    for tick in 1..=total_ticks {
        sim.step();

        // Progress every 10%
        if tick % (total_ticks / 10).max(1) == 0 && tick < total_ticks {
            let pct = (tick * 100) / total_ticks;
            eprintln!("  {}% ({}/{} ticks)", pct, tick, total_ticks);
        }
    }
    sim.stop();

    let elapsed = start.elapsed();
    let snapshot = metrics.snapshot();

    eprintln!();
    eprintln!("╔═══════════════════════════════════════════════════════════╗");
    eprintln!("║  Simulation Complete                                      ║");
    eprintln!("╠═══════════════════════════════════════════════════════════╣");
    eprintln!(
        "║  Ticks: {:8}  │  Elapsed: {:7.2}s  │  Rate: {:7.1}/s   ║",
        snapshot.total_ticks,
        elapsed.as_secs_f64(),
        snapshot.total_ticks as f64 / elapsed.as_secs_f64()
    );
    eprintln!(
        "║  Trades: {:7}  │  Avg/Tick: {:5.2}  │  Peak/Tick: {:3}    ║",
        snapshot.total_trades, snapshot.avg_trades_per_tick, snapshot.peak_trades_per_tick
    );
    eprintln!("╚═══════════════════════════════════════════════════════════╝");
}

/// Run the engine on its own thread and serve the HTTP/WS API from tokio.
fn run_server(config: &AppConfig) -> anyhow::Result<()> {
    // Phase 1: channels and shared state for the sync/async bridge
    let (tick_tx, _) = broadcast::channel::<TickUpdate>(100);
    let (cmd_tx, cmd_rx) = bounded::<SimCommand>(64);
    let sim_data = Arc::new(RwLock::new(SimData::new()));
    let metrics = Arc::new(ServerMetrics::new());

    let state = ServerState::with_shared(
        tick_tx.clone(),
        cmd_tx,
        sim_data.clone(),
        metrics.clone(),
    );

    // Phase 2: spawn the engine thread
    let sim_config = config.simulation_config();
    let engine = thread::spawn(move || {
        run_engine(sim_config, tick_tx, cmd_rx, sim_data, metrics);
    });

    // Phase 3: serve the API until the process is stopped
    let server_config = ServerConfig::from_env();
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(&server_config, state))?;

    let _ = engine.join();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Build config with CLI/env overrides
    let mut config = AppConfig::default().headless(args.headless);
    if let Some(ticks) = args.ticks {
        config.ticks = ticks;
    }
    if let Some(interval) = args.tick_interval_ms {
        config.tick_interval_ms = interval;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if args.no_default_bots {
        config.no_default_bots = true;
    }

    // Print config summary
    eprintln!("╔═══════════════════════════════════════════════════════════╗");
    eprintln!(
        "║  Crypto Bot Simulator - {}                     ║",
        if config.headless {
            "Headless Mode"
        } else {
            "Server Mode  "
        }
    );
    eprintln!("╠═══════════════════════════════════════════════════════════╣");
    eprintln!(
        "║  Pairs: {:2}  │  Bots: {:2}  │  Tick Interval: {:5}ms        ║",
        config.pair_count(),
        config.bot_count(),
        config.tick_interval_ms
    );
    match config.seed {
        Some(seed) => {
            eprintln!("║  Seed: {:<12}                                       ║", seed)
        }
        None => eprintln!("║  Seed: OS entropy                                         ║"),
    }
    if config.headless {
        eprintln!(
            "║  Ticks: {:8}                                          ║",
            config.ticks
        );
    }
    eprintln!("╚═══════════════════════════════════════════════════════════╝");
    eprintln!();

    if config.headless {
        run_headless(&config);
        Ok(())
    } else {
        run_server(&config)
    }
}
