//! The simulation engine: owns market and bot state, advances both on
//! demand, and fans snapshots out to hooks.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  step()                                              │
//! │    Phase 1: advance clock (tick, timestamp)          │
//! │    Phase 2: market walk (price/change/volume)        │
//! │    Phase 3: bot pass (maybe one trade per running)   │
//! │    Phase 4: refresh stats                            │
//! │    Phase 5: publish snapshot, then tick end          │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! The engine never sets its own pace. `start()`/`stop()` flip a flag the
//! external driver loop polls; tests call `step()` directly and advance
//! virtual time without any timer. Mutating commands (`start_bot`,
//! `create_bot`, ...) publish an out-of-band snapshot on success so
//! observers never wait a full tick to see the change.
//!
//! State transitions only ever happen through the public command surface.
//! In particular no engine code path moves a bot into `Error` status; that
//! assignment is reserved for `set_bot_status`.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use types::{Bot, BotConfig, BotId, BotSettingsPatch, BotStatus, MarketTick, Tick, Timestamp};

use crate::config::SimulationConfig;
use crate::hooks::{FnHook, HookContext, HookRunner, SimulationHook, SubscriptionId};
use crate::market::MarketState;
use crate::trading::TradeGenerator;

// =============================================================================
// SimulationStats
// =============================================================================

/// Rolling engine statistics, refreshed at the end of every tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStats {
    /// Ticks executed so far.
    pub tick: Tick,
    /// Trades filled across the whole run.
    pub total_trades: u64,
    /// Trades filled in the most recent tick.
    pub trades_this_tick: usize,
    /// Bots currently registered.
    pub bots_total: usize,
    /// Bots currently in running status.
    pub bots_running: usize,
    /// Snapshots delivered to hooks (ticks, commands, and subscribes).
    pub snapshots_published: u64,
}

// =============================================================================
// Simulation
// =============================================================================

/// The simulation engine. One instance owns all state; drive it from one
/// thread.
pub struct Simulation {
    config: SimulationConfig,
    market: MarketState,
    bots: Vec<Bot>,
    next_bot_id: u64,
    trades: TradeGenerator,
    rng: StdRng,
    running: bool,
    tick: Tick,
    timestamp: Timestamp,
    stats: SimulationStats,
    hooks: HookRunner,
}

// ─────────────────────────────────────────────────────────────────────────────
// Construction & lifecycle
// ─────────────────────────────────────────────────────────────────────────────

impl Simulation {
    /// Build an engine from a config. Seeds the market and bot roster and
    /// nothing else: no timer starts, no I/O happens.
    pub fn new(config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let market = MarketState::new(&config.pairs);
        let bots = config.bots.clone();
        let next_bot_id = bots.iter().map(|b| b.id.0).max().map_or(1, |max| max + 1);
        let timestamp = config.start_timestamp_ms;

        let mut sim = Self {
            config,
            market,
            bots,
            next_bot_id,
            trades: TradeGenerator::new(),
            rng,
            running: false,
            tick: 0,
            timestamp,
            stats: SimulationStats::default(),
            hooks: HookRunner::new(),
        };
        sim.refresh_bot_counts();
        sim
    }

    /// Build an engine with the default pairs and preset bots.
    pub fn with_defaults() -> Self {
        Self::new(SimulationConfig::default())
    }

    /// Mark the engine as running. The driver loop keys off this flag.
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            tracing::info!(tick = self.tick, "simulation started");
        }
    }

    /// Mark the engine as stopped.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            tracing::info!(tick = self.tick, "simulation stopped");
        }
    }

    /// Whether the engine is marked running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tick execution
    // ─────────────────────────────────────────────────────────────────────────

    /// Execute one full tick. Returns the number of trades filled.
    ///
    /// Safe to call regardless of the running flag; pacing and gating both
    /// belong to the driver.
    pub fn step(&mut self) -> usize {
        // Phase 1: advance the clock
        self.tick += 1;
        self.timestamp += self.config.tick_interval_ms;
        let now = self.timestamp;

        // Phase 2: market walk
        self.market.advance(&mut self.rng, &self.config, now);

        // Phase 3: bot pass
        let mut trades_this_tick = 0;
        for bot in &mut self.bots {
            if !bot.is_running() {
                continue;
            }
            bot.last_update = now;
            let Some(price) = self.market.price_of(&bot.pair) else {
                continue;
            };
            if let Some(trade) =
                self.trades
                    .maybe_trade(&mut self.rng, &self.config, bot, price, now)
            {
                bot.record_trade(trade);
                trades_this_tick += 1;
            }
        }

        // Phase 4: refresh stats
        self.stats.tick = self.tick;
        self.stats.trades_this_tick = trades_this_tick;
        self.stats.total_trades += trades_this_tick as u64;
        self.refresh_bot_counts();

        // Phase 5: publish snapshot, then tick end
        if !self.hooks.is_empty() {
            let ctx = self.build_context();
            self.hooks.on_snapshot(&self.bots, &ctx);
            self.stats.snapshots_published += 1;
            self.hooks.on_tick_end(&self.stats, &ctx);
        }

        tracing::debug!(
            tick = self.tick,
            trades = trades_this_tick,
            "tick processed"
        );
        trades_this_tick
    }

    /// Drive `step()` a fixed number of times, then notify hooks that the
    /// run is over. Returns total trades filled.
    pub fn run(&mut self, ticks: u64) -> u64 {
        let mut total_trades = 0u64;
        for _ in 0..ticks {
            total_trades += self.step() as u64;
        }
        self.hooks.on_simulation_end(&self.stats);
        total_trades
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Subscriptions
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a hook. Delivers one snapshot to it immediately.
    pub fn subscribe(&mut self, hook: Arc<dyn SimulationHook>) -> SubscriptionId {
        let id = self.hooks.add(hook);
        let ctx = self.build_context();
        self.hooks.snapshot_to(id, &self.bots, &ctx);
        self.stats.snapshots_published += 1;
        id
    }

    /// Register a plain closure as a snapshot hook.
    pub fn subscribe_fn<F>(&mut self, name: impl Into<String>, f: F) -> SubscriptionId
    where
        F: Fn(&[Bot], &HookContext) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(FnHook::new(name, f)))
    }

    /// Remove a hook. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.hooks.remove(id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Bot commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Put a bot into running status. No-op returning `false` if the bot is
    /// missing or already running.
    pub fn start_bot(&mut self, id: BotId) -> bool {
        let now = self.timestamp;
        let Some(bot) = self.bots.iter_mut().find(|b| b.id == id) else {
            return false;
        };
        if bot.status == BotStatus::Running {
            return false;
        }
        bot.status = BotStatus::Running;
        bot.last_update = now;
        tracing::debug!(bot = %id, "bot started");
        self.refresh_bot_counts();
        self.publish();
        true
    }

    /// Put a running bot into paused status. No-op returning `false` if the
    /// bot is missing or not running.
    pub fn pause_bot(&mut self, id: BotId) -> bool {
        let now = self.timestamp;
        let Some(bot) = self.bots.iter_mut().find(|b| b.id == id) else {
            return false;
        };
        if bot.status != BotStatus::Running {
            return false;
        }
        bot.status = BotStatus::Paused;
        bot.last_update = now;
        tracing::debug!(bot = %id, "bot paused");
        self.refresh_bot_counts();
        self.publish();
        true
    }

    /// Assign a bot's status directly. This is the only way a bot can end up
    /// in `Error` status. Returns whether the bot was found.
    pub fn set_bot_status(&mut self, id: BotId, status: BotStatus) -> bool {
        let now = self.timestamp;
        let Some(bot) = self.bots.iter_mut().find(|b| b.id == id) else {
            return false;
        };
        bot.status = status;
        bot.last_update = now;
        tracing::debug!(bot = %id, status = %status, "bot status set");
        self.refresh_bot_counts();
        self.publish();
        true
    }

    /// Merge the set fields of a settings patch into a bot's settings.
    /// Values are taken as-is; returns whether the bot was found.
    pub fn update_bot_settings(&mut self, id: BotId, patch: &BotSettingsPatch) -> bool {
        let now = self.timestamp;
        let Some(bot) = self.bots.iter_mut().find(|b| b.id == id) else {
            return false;
        };
        bot.settings.apply_patch(patch);
        bot.last_update = now;
        tracing::debug!(bot = %id, "bot settings updated");
        self.publish();
        true
    }

    /// Insert a new bot with zeroed profit, stats, and history. Returns the
    /// generated id.
    pub fn create_bot(&mut self, config: BotConfig) -> BotId {
        let id = BotId(self.next_bot_id);
        self.next_bot_id += 1;
        let bot = Bot::new(id, config, self.timestamp);
        tracing::debug!(bot = %id, name = %bot.name, "bot created");
        self.bots.push(bot);
        self.refresh_bot_counts();
        self.publish();
        id
    }

    /// Remove a bot. Returns whether it existed.
    pub fn delete_bot(&mut self, id: BotId) -> bool {
        let before = self.bots.len();
        self.bots.retain(|b| b.id != id);
        if self.bots.len() == before {
            return false;
        }
        tracing::debug!(bot = %id, "bot deleted");
        self.refresh_bot_counts();
        self.publish();
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// All bots, in insertion order.
    pub fn bots(&self) -> &[Bot] {
        &self.bots
    }

    /// Look up one bot.
    pub fn bot(&self, id: BotId) -> Option<&Bot> {
        self.bots.iter().find(|b| b.id == id)
    }

    /// Market data for one pair, or for every pair when `pair` is `None`.
    /// An unknown pair yields an empty vec.
    pub fn get_market_data(&self, pair: Option<&str>) -> Vec<MarketTick> {
        match pair {
            Some(p) => self.market.get(p).cloned().into_iter().collect(),
            None => self.market.all().to_vec(),
        }
    }

    /// The live market state.
    pub fn market(&self) -> &MarketState {
        &self.market
    }

    /// Ticks executed so far.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Current simulated timestamp (ms).
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Rolling engine statistics.
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// The config the engine was built from.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Number of registered hooks.
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    /// Fan the current state out to every hook.
    fn publish(&mut self) {
        if self.hooks.is_empty() {
            return;
        }
        let ctx = self.build_context();
        self.hooks.on_snapshot(&self.bots, &ctx);
        self.stats.snapshots_published += 1;
    }

    fn build_context(&self) -> HookContext {
        HookContext::new(self.tick, self.timestamp).with_market(self.market.all().to_vec())
    }

    fn refresh_bot_counts(&mut self) {
        self.stats.bots_total = self.bots.len();
        self.stats.bots_running = self.bots.iter().filter(|b| b.is_running()).count();
    }
}
