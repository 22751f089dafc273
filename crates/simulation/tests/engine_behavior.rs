//! Integration tests for the full tick engine.
//!
//! Everything here goes through the public `Simulation` API: seeded configs,
//! direct `step()`/`run()` calls, and hook registration. No timers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use simulation::{HookContext, Simulation, SimulationConfig, SimulationHook, SimulationStats};
use types::{Bot, BotConfig, BotId, BotSettingsPatch, BotStatus, RiskLevel, Strategy};

fn seeded(seed: u64) -> Simulation {
    Simulation::new(SimulationConfig::default().with_seed(seed))
}

/// A busy market with every bot trading every tick.
fn busy(seed: u64) -> Simulation {
    Simulation::new(
        SimulationConfig::default()
            .with_seed(seed)
            .with_trade_probability(1.0),
    )
}

/// The default setup must actually produce trades over a realistic run.
#[test]
fn test_default_run_produces_trades() {
    let mut sim = seeded(42);
    sim.run(1_000);

    let stats = sim.stats();
    println!("Simulation completed:");
    println!("  Total ticks: {}", stats.tick);
    println!("  Total trades: {}", stats.total_trades);
    println!("  Running bots: {}", stats.bots_running);

    assert!(
        stats.total_trades > 0,
        "Expected trades but got none. Zombie simulation detected!"
    );
    assert_eq!(stats.tick, 1_000);

    // Two running bots at 30% each should land well clear of the tails.
    assert!(
        stats.total_trades > 400 && stats.total_trades < 800,
        "trade volume {} implausible for 2 bots x 1000 ticks x 0.3",
        stats.total_trades
    );
}

/// Each step advances every market timestamp by exactly the tick interval.
#[test]
fn test_tick_cadence() {
    let start = 1_700_000_000_000;
    let mut sim = Simulation::new(
        SimulationConfig::default()
            .with_seed(3)
            .with_tick_interval_ms(2_000)
            .with_start_timestamp_ms(start),
    );

    for n in 1..=50u64 {
        sim.step();
        let expected = start + n * 2_000;
        assert_eq!(sim.timestamp(), expected);
        for tick in sim.get_market_data(None) {
            assert_eq!(tick.timestamp, expected, "{} lagging the clock", tick.pair);
        }
    }
}

/// The 24h envelope always contains the current price, for every pair,
/// at every observation point.
#[test]
fn test_envelope_contains_price_throughout() {
    let mut sim = seeded(8);
    for _ in 0..2_000 {
        sim.step();
        for tick in sim.get_market_data(None) {
            assert!(
                tick.low_24h <= tick.price && tick.price <= tick.high_24h,
                "{} price {} escaped envelope [{}, {}]",
                tick.pair,
                tick.price,
                tick.low_24h,
                tick.high_24h
            );
        }
    }
}

/// Bots that are not running never trade and never drift.
#[test]
fn test_non_running_bots_are_inert() {
    let mut sim = busy(5);
    let idle_id = sim.create_bot(BotConfig::new("Idle Watcher", "BTC/USDT"));

    let paused_before = sim.bot(BotId(3)).cloned().unwrap();
    let idle_before = sim.bot(idle_id).cloned().unwrap();

    sim.run(300);

    let paused_after = sim.bot(BotId(3)).unwrap();
    assert_eq!(paused_after.profit, paused_before.profit);
    assert_eq!(
        paused_after.stats.total_trades,
        paused_before.stats.total_trades
    );
    assert_eq!(paused_after.trades.len(), paused_before.trades.len());

    let idle_after = sim.bot(idle_id).unwrap();
    assert_eq!(idle_after.profit, idle_before.profit);
    assert!(idle_after.trades.is_empty());
    assert_eq!(idle_after.last_update, idle_before.last_update);
}

/// Trade history stays bounded no matter how long the run is.
#[test]
fn test_trade_history_never_exceeds_bound() {
    let mut sim = busy(9);
    sim.run(500);

    for bot in sim.bots() {
        assert!(
            bot.trades.len() <= 10,
            "{} holds {} trades",
            bot.name,
            bot.trades.len()
        );
        if bot.is_running() {
            assert_eq!(bot.trades.len(), 10, "{} should have filled up", bot.name);
            // Newest first.
            for pair in bot.trades.windows(2) {
                assert!(pair[0].id > pair[1].id);
            }
        }
    }
}

/// Balance is display-only: no amount of trading moves it.
#[test]
fn test_balances_never_change() {
    let mut sim = busy(13);
    let balances: Vec<f64> = sim.bots().iter().map(|b| b.balance).collect();

    sim.run(400);

    let after: Vec<f64> = sim.bots().iter().map(|b| b.balance).collect();
    assert_eq!(balances, after, "trading must not touch balances");

    // And the derived percentage stays consistent with profit.
    for bot in sim.bots() {
        if bot.balance > 0.0 && bot.stats.total_trades > 0 {
            let expected = bot.profit / bot.balance * 100.0;
            assert!(
                (bot.profit_percentage - expected).abs() < 1e-9,
                "{} profit percentage out of sync",
                bot.name
            );
        }
        assert!(
            (0.0..=100.0).contains(&bot.stats.win_rate),
            "{} win rate {} out of range",
            bot.name,
            bot.stats.win_rate
        );
    }
}

/// Start on a running bot and pause on a non-running bot are rejected
/// no-ops; valid transitions flip status.
#[test]
fn test_start_pause_transitions() {
    let mut sim = seeded(2);

    assert!(!sim.start_bot(BotId(1)), "Grid Master is already running");
    assert!(sim.pause_bot(BotId(1)));
    assert_eq!(sim.bot(BotId(1)).unwrap().status, BotStatus::Paused);
    assert!(!sim.pause_bot(BotId(1)));
    assert!(sim.start_bot(BotId(1)));
    assert_eq!(sim.bot(BotId(1)).unwrap().status, BotStatus::Running);

    assert!(!sim.start_bot(BotId(404)));
    assert!(!sim.pause_bot(BotId(404)));
}

/// Two subscribers see the same bot list after the same tick.
#[test]
fn test_fanout_delivers_identical_snapshots() {
    let mut sim = seeded(17);

    let seen_a: Arc<Mutex<Vec<Bot>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_b: Arc<Mutex<Vec<Bot>>> = Arc::new(Mutex::new(Vec::new()));

    let store_a = seen_a.clone();
    sim.subscribe_fn("a", move |bots, _ctx| {
        *store_a.lock() = bots.to_vec();
    });
    let store_b = seen_b.clone();
    sim.subscribe_fn("b", move |bots, _ctx| {
        *store_b.lock() = bots.to_vec();
    });

    sim.step();

    let a = serde_json::to_value(&*seen_a.lock()).unwrap();
    let b = serde_json::to_value(&*seen_b.lock()).unwrap();
    assert_eq!(a, b, "subscribers diverged");

    let names: Vec<String> = seen_a.lock().iter().map(|b| b.name.clone()).collect();
    assert_eq!(
        names,
        vec!["Grid Master", "DCA Accumulator", "Momentum Scout"],
        "insertion order must be preserved"
    );
}

/// Create returns a zeroed bot; delete removes it; both publish.
#[test]
fn test_create_then_delete_scenario() {
    let mut sim = seeded(23);

    let config = BotConfig::new("Scalper", "BNB/USDT")
        .with_strategy(Strategy::Arbitrage)
        .with_balance(2_500.0)
        .with_status(BotStatus::Running);
    let id = sim.create_bot(config);
    assert_eq!(id, BotId(4));

    let bot = sim.bot(id).unwrap();
    assert_eq!(bot.profit, 0.0);
    assert_eq!(bot.profit_percentage, 0.0);
    assert_eq!(bot.stats.total_trades, 0);
    assert!(bot.trades.is_empty());
    assert_eq!(bot.strategy, Strategy::Arbitrage);

    assert!(sim.delete_bot(id));
    assert!(sim.bot(id).is_none());
    assert!(!sim.delete_bot(id));
    assert_eq!(sim.bots().len(), 3);
}

/// A sparse settings patch only touches the fields it sets.
#[test]
fn test_settings_patch_is_sparse() {
    let mut sim = seeded(31);
    let before = sim.bot(BotId(2)).unwrap().settings.clone();

    let patch = BotSettingsPatch {
        risk_level: Some(RiskLevel::High),
        take_profit: Some(42.0),
        ..Default::default()
    };
    assert!(sim.update_bot_settings(BotId(2), &patch));

    let after = &sim.bot(BotId(2)).unwrap().settings;
    assert_eq!(after.risk_level, RiskLevel::High);
    assert_eq!(after.take_profit, 42.0);
    assert_eq!(after.grid_levels, before.grid_levels);
    assert_eq!(after.grid_spacing, before.grid_spacing);
    assert_eq!(after.investment, before.investment);
    assert_eq!(after.stop_loss, before.stop_loss);
    assert_eq!(after.max_trades, before.max_trades);
}

struct PanickyHook;

impl SimulationHook for PanickyHook {
    fn name(&self) -> &str {
        "Panicky"
    }

    fn on_snapshot(&self, _bots: &[Bot], _ctx: &HookContext) {
        panic!("subscriber crashed");
    }
}

struct TickCounter {
    snapshots: AtomicU64,
    tick_ends: AtomicU64,
    run_ends: AtomicU64,
}

impl SimulationHook for TickCounter {
    fn name(&self) -> &str {
        "TickCounter"
    }

    fn on_snapshot(&self, _bots: &[Bot], _ctx: &HookContext) {
        self.snapshots.fetch_add(1, Ordering::Relaxed);
    }

    fn on_tick_end(&self, _stats: &SimulationStats, _ctx: &HookContext) {
        self.tick_ends.fetch_add(1, Ordering::Relaxed);
    }

    fn on_simulation_end(&self, _final_stats: &SimulationStats) {
        self.run_ends.fetch_add(1, Ordering::Relaxed);
    }
}

impl TickCounter {
    fn new() -> Self {
        Self {
            snapshots: AtomicU64::new(0),
            tick_ends: AtomicU64::new(0),
            run_ends: AtomicU64::new(0),
        }
    }
}

/// A panicking subscriber is skipped; later subscribers and the engine
/// itself keep going.
#[test]
fn test_panicking_subscriber_is_isolated() {
    let mut sim = seeded(19);
    sim.subscribe(Arc::new(PanickyHook));
    let counter = Arc::new(TickCounter::new());
    sim.subscribe(counter.clone());

    sim.run(5);

    assert_eq!(sim.tick(), 5, "engine must survive a broken subscriber");
    // Subscribe-time delivery plus one per tick.
    assert_eq!(counter.snapshots.load(Ordering::Relaxed), 6);
    assert_eq!(counter.tick_ends.load(Ordering::Relaxed), 5);
    assert_eq!(counter.run_ends.load(Ordering::Relaxed), 1);
}

/// Subscribing delivers exactly one snapshot before any tick runs, and
/// unsubscribing stops delivery for that hook only.
#[test]
fn test_subscribe_and_unsubscribe_lifecycle() {
    let mut sim = seeded(29);

    let first = Arc::new(TickCounter::new());
    let second = Arc::new(TickCounter::new());
    let first_id = sim.subscribe(first.clone());
    sim.subscribe(second.clone());

    assert_eq!(first.snapshots.load(Ordering::Relaxed), 1);
    assert_eq!(second.snapshots.load(Ordering::Relaxed), 1);
    assert_eq!(first.tick_ends.load(Ordering::Relaxed), 0, "no tick yet");

    assert!(sim.unsubscribe(first_id));
    assert!(!sim.unsubscribe(first_id), "already gone");

    sim.step();
    assert_eq!(first.snapshots.load(Ordering::Relaxed), 1, "no delivery after unsubscribe");
    assert_eq!(second.snapshots.load(Ordering::Relaxed), 2);
    assert_eq!(sim.hook_count(), 1);
}

/// Same seed, same config, same story: prices, trades, profits all match.
#[test]
fn test_seeded_runs_replay_identically() {
    let build = || {
        Simulation::new(
            SimulationConfig::default()
                .with_seed(777)
                .with_trade_probability(0.5),
        )
    };
    let mut a = build();
    let mut b = build();

    a.run(200);
    b.run(200);

    let market_a = serde_json::to_value(a.get_market_data(None)).unwrap();
    let market_b = serde_json::to_value(b.get_market_data(None)).unwrap();
    assert_eq!(market_a, market_b);

    let bots_a = serde_json::to_value(a.bots()).unwrap();
    let bots_b = serde_json::to_value(b.bots()).unwrap();
    assert_eq!(bots_a, bots_b);

    assert_eq!(a.stats().total_trades, b.stats().total_trades);
}
