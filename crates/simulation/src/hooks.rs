//! Simulation hooks for observing engine state.
//!
//! Hooks are **observers** that receive owned snapshots of simulation state.
//! They cannot modify engine state.
//!
//! # Design Principles
//!
//! - **Declarative**: Hooks declare what events they care about via trait methods
//! - **Modular**: Each hook is independent; add/remove without affecting the engine
//! - **SoC**: The engine owns state; hooks observe and report
//!
//! # Isolation
//!
//! Every hook invocation runs behind a panic guard: a hook that panics is
//! logged and skipped, and the remaining hooks still receive the event. One
//! broken observer cannot starve the rest.
//!
//! # Lifecycle
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  Simulation.step()                                         │
//! │                                                            │
//! │  market walk ─▶ bot trades ─▶ ┌───────────────┐            │
//! │                               │ on_snapshot() │            │
//! │                               └───────┬───────┘            │
//! │                                       ▼                    │
//! │                               ┌───────────────┐            │
//! │                               │ on_tick_end() │            │
//! │                               └───────────────┘            │
//! └────────────────────────────────────────────────────────────┘
//! │
//! ▼ (after a bounded run)
//! ┌───────────────────────┐
//! │ on_simulation_end()   │
//! └───────────────────────┘
//! ```
//!
//! Mutating commands (start/pause/create/delete/settings/status) also fire
//! `on_snapshot()` out of band, and `subscribe` delivers one snapshot to the
//! new hook immediately.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use smallvec::SmallVec;
use types::{Bot, MarketTick, Tick, Timestamp};

use crate::SimulationStats;

// ─────────────────────────────────────────────────────────────────────────────
// Subscription Id
// ─────────────────────────────────────────────────────────────────────────────

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub#{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Hook Context
// ─────────────────────────────────────────────────────────────────────────────

/// Context passed to hooks alongside each event.
///
/// Contains owned snapshots of engine state at the time of the call. Hooks
/// can freely store, serialize, or forward this data.
#[derive(Debug, Clone)]
pub struct HookContext {
    /// Current simulation tick.
    pub tick: Tick,
    /// Current timestamp (ms).
    pub timestamp: Timestamp,
    /// Market tickers at the time of the event.
    pub market: Vec<MarketTick>,
}

impl HookContext {
    /// Create a context with an empty market snapshot.
    pub fn new(tick: Tick, timestamp: Timestamp) -> Self {
        Self {
            tick,
            timestamp,
            market: Vec::new(),
        }
    }

    /// Set the market snapshot.
    pub fn with_market(mut self, market: Vec<MarketTick>) -> Self {
        self.market = market;
        self
    }

    /// Look up one pair's ticker in the snapshot.
    pub fn market_tick(&self, pair: &str) -> Option<&MarketTick> {
        self.market.iter().find(|t| t.pair == pair)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SimulationHook Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for simulation observers.
///
/// Hooks receive **owned snapshots** and cannot modify engine state. Use
/// interior mutability (`Mutex`, `AtomicU64`, channels) for hook-owned state.
///
/// Hooks must be `Send + Sync`: they are registered from any thread and held
/// behind `Arc` so embedders can retain access after registration.
pub trait SimulationHook: Send + Sync {
    /// Human-readable name for logging and debugging.
    fn name(&self) -> &str;

    /// Called with the full bot list, in insertion order.
    ///
    /// Fires on every tick, after every mutating command, and once
    /// immediately on subscribe.
    /// Use for: UI pushes, snapshot caches, websocket fan-out.
    #[allow(unused_variables)]
    fn on_snapshot(&self, bots: &[Bot], ctx: &HookContext) {}

    /// Called at the end of each full tick with engine statistics.
    ///
    /// Not fired for out-of-band command publishes.
    /// Use for: metrics aggregation, progress reporting.
    #[allow(unused_variables)]
    fn on_tick_end(&self, stats: &SimulationStats, ctx: &HookContext) {}

    /// Called once when a bounded run completes.
    ///
    /// Use for: final reports, summary statistics.
    #[allow(unused_variables)]
    fn on_simulation_end(&self, final_stats: &SimulationStats) {}
}

// ─────────────────────────────────────────────────────────────────────────────
// HookRunner
// ─────────────────────────────────────────────────────────────────────────────

/// Run one hook call behind a panic guard.
fn dispatch_guarded(name: &str, event: &str, f: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(f)).is_err() {
        tracing::warn!(hook = name, event, "hook panicked, continuing with remaining hooks");
    }
}

/// Manages hook registration and sequential, guarded invocation.
///
/// Hooks are called in registration order. Each call is synchronous; for
/// async behavior, hooks should use interior channels/queues.
pub struct HookRunner {
    // Typical embedders register one or two observers.
    hooks: SmallVec<[(SubscriptionId, Arc<dyn SimulationHook>); 4]>,
    next_id: u64,
}

impl Default for HookRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl HookRunner {
    /// Create a new empty hook runner.
    pub fn new() -> Self {
        Self {
            hooks: SmallVec::new(),
            next_id: 1,
        }
    }

    /// Register a hook. Hooks are called in registration order.
    pub fn add(&mut self, hook: Arc<dyn SimulationHook>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.hooks.push((id, hook));
        id
    }

    /// Remove a hook by subscription id. Returns whether it was present.
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.hooks.len();
        self.hooks.retain(|(hid, _)| *hid != id);
        self.hooks.len() != before
    }

    /// Get the number of registered hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Check if no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Get hook names for debugging.
    pub fn hook_names(&self) -> Vec<&str> {
        self.hooks.iter().map(|(_, h)| h.name()).collect()
    }

    /// Invoke `on_snapshot` on all hooks.
    pub fn on_snapshot(&self, bots: &[Bot], ctx: &HookContext) {
        for (_, hook) in &self.hooks {
            dispatch_guarded(hook.name(), "snapshot", || hook.on_snapshot(bots, ctx));
        }
    }

    /// Invoke `on_snapshot` on a single hook by id (the subscribe-time
    /// immediate delivery). Returns whether the hook was found.
    pub fn snapshot_to(&self, id: SubscriptionId, bots: &[Bot], ctx: &HookContext) -> bool {
        match self.hooks.iter().find(|(hid, _)| *hid == id) {
            Some((_, hook)) => {
                dispatch_guarded(hook.name(), "snapshot", || hook.on_snapshot(bots, ctx));
                true
            }
            None => false,
        }
    }

    /// Invoke `on_tick_end` on all hooks.
    pub fn on_tick_end(&self, stats: &SimulationStats, ctx: &HookContext) {
        for (_, hook) in &self.hooks {
            dispatch_guarded(hook.name(), "tick_end", || hook.on_tick_end(stats, ctx));
        }
    }

    /// Invoke `on_simulation_end` on all hooks.
    pub fn on_simulation_end(&self, final_stats: &SimulationStats) {
        for (_, hook) in &self.hooks {
            dispatch_guarded(hook.name(), "simulation_end", || {
                hook.on_simulation_end(final_stats)
            });
        }
    }
}

impl fmt::Debug for HookRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRunner")
            .field("hooks", &self.hook_names())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Built-in Hooks
// ─────────────────────────────────────────────────────────────────────────────

/// A no-op hook useful for testing.
#[derive(Debug, Default)]
pub struct NoOpHook;

impl SimulationHook for NoOpHook {
    fn name(&self) -> &str {
        "NoOp"
    }
}

/// Adapter turning a plain closure into a snapshot hook.
///
/// The callback-shaped cousin of implementing [`SimulationHook`] by hand,
/// for embedders that only care about bot-list updates.
pub struct FnHook<F> {
    name: String,
    f: F,
}

impl<F> FnHook<F>
where
    F: Fn(&[Bot], &HookContext) + Send + Sync,
{
    /// Wrap a closure under the given name.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> SimulationHook for FnHook<F>
where
    F: Fn(&[Bot], &HookContext) + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_snapshot(&self, bots: &[Bot], ctx: &HookContext) {
        (self.f)(bots, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct CountingHook {
        snapshots: AtomicU64,
        bots_seen: AtomicU64,
        tick_ends: AtomicU64,
    }

    impl CountingHook {
        fn new() -> Self {
            Self {
                snapshots: AtomicU64::new(0),
                bots_seen: AtomicU64::new(0),
                tick_ends: AtomicU64::new(0),
            }
        }
    }

    impl SimulationHook for CountingHook {
        fn name(&self) -> &str {
            "CountingHook"
        }

        fn on_snapshot(&self, bots: &[Bot], _ctx: &HookContext) {
            self.snapshots.fetch_add(1, Ordering::Relaxed);
            self.bots_seen.store(bots.len() as u64, Ordering::Relaxed);
        }

        fn on_tick_end(&self, _stats: &SimulationStats, _ctx: &HookContext) {
            self.tick_ends.fetch_add(1, Ordering::Relaxed);
        }
    }

    struct PanickingHook;

    impl SimulationHook for PanickingHook {
        fn name(&self) -> &str {
            "PanickingHook"
        }

        fn on_snapshot(&self, _bots: &[Bot], _ctx: &HookContext) {
            panic!("hook blew up");
        }
    }

    #[test]
    fn test_hook_runner_invocation() {
        let hook = Arc::new(CountingHook::new());
        let mut runner = HookRunner::new();
        runner.add(hook.clone());

        let ctx = HookContext::new(1, 2000);
        let stats = SimulationStats::default();

        runner.on_snapshot(&[], &ctx);
        runner.on_snapshot(&[], &ctx);
        runner.on_tick_end(&stats, &ctx);

        assert_eq!(hook.snapshots.load(Ordering::Relaxed), 2);
        assert_eq!(hook.tick_ends.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_multiple_hooks_all_receive() {
        let hook1 = Arc::new(CountingHook::new());
        let hook2 = Arc::new(CountingHook::new());

        let mut runner = HookRunner::new();
        runner.add(hook1.clone());
        runner.add(hook2.clone());

        let ctx = HookContext::new(1, 2000);
        runner.on_snapshot(&[], &ctx);

        assert_eq!(hook1.snapshots.load(Ordering::Relaxed), 1);
        assert_eq!(hook2.snapshots.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_remove_stops_delivery() {
        let hook1 = Arc::new(CountingHook::new());
        let hook2 = Arc::new(CountingHook::new());

        let mut runner = HookRunner::new();
        let id1 = runner.add(hook1.clone());
        runner.add(hook2.clone());

        assert!(runner.remove(id1));
        assert!(!runner.remove(id1), "second remove must report absence");

        let ctx = HookContext::new(1, 2000);
        runner.on_snapshot(&[], &ctx);

        assert_eq!(hook1.snapshots.load(Ordering::Relaxed), 0);
        assert_eq!(hook2.snapshots.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_panicking_hook_does_not_block_others() {
        let counting = Arc::new(CountingHook::new());

        let mut runner = HookRunner::new();
        runner.add(Arc::new(PanickingHook));
        runner.add(counting.clone());

        let ctx = HookContext::new(1, 2000);
        runner.on_snapshot(&[], &ctx);
        runner.on_snapshot(&[], &ctx);

        assert_eq!(
            counting.snapshots.load(Ordering::Relaxed),
            2,
            "hooks after the panicking one must still run"
        );
    }

    #[test]
    fn test_snapshot_to_targets_one_hook() {
        let hook1 = Arc::new(CountingHook::new());
        let hook2 = Arc::new(CountingHook::new());

        let mut runner = HookRunner::new();
        runner.add(hook1.clone());
        let id2 = runner.add(hook2.clone());

        let ctx = HookContext::new(0, 0);
        assert!(runner.snapshot_to(id2, &[], &ctx));

        assert_eq!(hook1.snapshots.load(Ordering::Relaxed), 0);
        assert_eq!(hook2.snapshots.load(Ordering::Relaxed), 1);

        assert!(!runner.snapshot_to(SubscriptionId(999), &[], &ctx));
    }

    #[test]
    fn test_fn_hook_sees_bot_count() {
        let seen = Arc::new(AtomicU64::new(0));
        let seen_in_hook = seen.clone();
        let hook = FnHook::new("bot-counter", move |bots: &[Bot], _ctx: &HookContext| {
            seen_in_hook.store(bots.len() as u64, Ordering::Relaxed);
        });

        let mut runner = HookRunner::new();
        runner.add(Arc::new(hook));

        let ctx = HookContext::new(1, 2000);
        runner.on_snapshot(&[], &ctx);
        assert_eq!(seen.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_hook_names() {
        let mut runner = HookRunner::new();
        runner.add(Arc::new(NoOpHook));
        runner.add(Arc::new(CountingHook::new()));

        let names = runner.hook_names();
        assert_eq!(names, vec!["NoOp", "CountingHook"]);
    }
}
