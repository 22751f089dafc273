//! Central configuration for the crypto bot simulator binary.
//!
//! Maps CLI and environment overrides onto the engine configuration.

use std::time::{SystemTime, UNIX_EPOCH};

use simulation::{defaults, SimulationConfig};

/// Master configuration for one simulator process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Run Control
    // ─────────────────────────────────────────────────────────────────────────
    /// Run without the HTTP/WS server (headless mode for benchmarks/CI).
    pub headless: bool,
    /// Ticks to run in headless mode.
    pub ticks: u64,
    /// Wall-clock period of one tick in milliseconds.
    pub tick_interval_ms: u64,

    // ─────────────────────────────────────────────────────────────────────────
    // Engine Parameters
    // ─────────────────────────────────────────────────────────────────────────
    /// RNG seed. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Start with an empty bot list instead of the three presets.
    pub no_default_bots: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            // Run Control
            headless: false,
            ticks: 5_000,
            tick_interval_ms: 2_000, // One tick every 2s

            // Engine Parameters
            seed: None,
            no_default_bots: false,
        }
    }
}

impl AppConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder-style setters for fluent configuration
    // ─────────────────────────────────────────────────────────────────────────

    /// Set headless mode.
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set headless tick count.
    pub fn ticks(mut self, ticks: u64) -> Self {
        self.ticks = ticks;
        self
    }

    /// Set the tick interval in milliseconds.
    pub fn tick_interval_ms(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms;
        self
    }

    /// Seed the RNG for a reproducible run.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Start with no bots.
    pub fn no_default_bots(mut self, empty: bool) -> Self {
        self.no_default_bots = empty;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Computed Properties
    // ─────────────────────────────────────────────────────────────────────────

    /// Number of tracked pairs the engine will seed.
    pub fn pair_count(&self) -> usize {
        defaults::default_pairs().len()
    }

    /// Number of bots present at startup.
    pub fn bot_count(&self) -> usize {
        if self.no_default_bots {
            0
        } else {
            defaults::default_bots().len()
        }
    }

    /// Build the engine configuration this app config describes.
    ///
    /// The wall clock becomes the timestamp base, so serialized instants
    /// look like real epoch millis even though the engine only ever adds
    /// tick intervals to it.
    pub fn simulation_config(&self) -> SimulationConfig {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64);

        let mut config = SimulationConfig::default()
            .with_tick_interval_ms(self.tick_interval_ms)
            .with_start_timestamp_ms(now_ms);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.no_default_bots {
            config = config.without_bots();
        }
        config
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Preset Configurations
// ─────────────────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Quick demo: short headless run at full speed.
    pub fn demo() -> Self {
        Self::default().headless(true).ticks(1_000)
    }

    /// Benchmark: long seeded headless run on a clean slate.
    pub fn bench() -> Self {
        Self::default()
            .headless(true)
            .ticks(100_000)
            .seed(42)
            .no_default_bots(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_consistency() {
        // Don't check specific values - those may change.
        let config = AppConfig::default();

        assert!(config.ticks > 0, "Should run at least 1 tick");
        assert!(config.tick_interval_ms > 0, "Tick interval should be set");
        assert!(config.pair_count() >= 1, "Should seed at least 1 pair");
        assert!(config.bot_count() >= 1, "Should seed at least 1 bot");
    }

    #[test]
    fn test_builder_pattern() {
        let config = AppConfig::new()
            .headless(true)
            .ticks(9_999)
            .tick_interval_ms(100)
            .seed(7);

        assert!(config.headless);
        assert_eq!(config.ticks, 9_999);
        assert_eq!(config.tick_interval_ms, 100);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_simulation_config_mapping() {
        let config = AppConfig::new()
            .tick_interval_ms(250)
            .seed(11)
            .no_default_bots(true);

        let sim_config = config.simulation_config();
        assert_eq!(sim_config.tick_interval_ms, 250);
        assert_eq!(sim_config.seed, Some(11));
        assert!(sim_config.bots.is_empty());
        assert_eq!(sim_config.pairs.len(), config.pair_count());
        assert!(sim_config.start_timestamp_ms > 0, "stamped from the wall clock");
    }

    #[test]
    fn test_no_default_bots_empties_startup_roster() {
        let full = AppConfig::default();
        let empty = AppConfig::default().no_default_bots(true);

        assert!(full.bot_count() > 0);
        assert_eq!(empty.bot_count(), 0);
    }

    #[test]
    fn test_preset_configs_differ_from_default() {
        let default = AppConfig::default();
        let demo = AppConfig::demo();
        let bench = AppConfig::bench();

        assert_ne!(demo.ticks, default.ticks);
        assert!(demo.headless);
        assert_eq!(bench.seed, Some(42));
        assert_ne!(bench.bot_count(), default.bot_count());
    }
}
