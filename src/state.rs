// Owned dashboard state and the cooperative timer scheduler.
//
// Every mutation happens inside one of the discrete update methods below,
// each corresponding to one timer's payload. The binaries drive them
// through `Timers`; tests call them directly.

use std::time::{Duration, Instant};

use chrono::Utc;
use rand::thread_rng;

use crate::baseline::BaselineSource;
use crate::generator::TransactionGenerator;
use crate::ledger::{FeedFilter, Ledger, SEED_COUNT};
use crate::progress::{ProgressBoard, TrackedTransaction};
use crate::stats::{FlowStats, RollupTable, TrendSignals};
use crate::types::{PoolStats, Transaction};
use crate::Result;

// Timer cadences
pub const ARRIVAL_INTERVAL: Duration = Duration::from_millis(800);
pub const AMBIENT_INTERVAL: Duration = Duration::from_secs(3);
pub const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);
pub const TPS_INTERVAL: Duration = Duration::from_secs(10);
pub const HOURLY_INTERVAL: Duration = Duration::from_secs(60 * 60);
pub const DAILY_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// The whole dashboard state: ledger, pool counters, jitter signals and the
/// pipeline progress board, owned by a single cooperative loop.
pub struct BridgeState {
    generator: TransactionGenerator,
    ledger: Ledger,
    pool: PoolStats,
    trends: TrendSignals,
    board: ProgressBoard,
    pub feed_filter: FeedFilter,
}

impl BridgeState {
    /// Build the initial state: seed the ledger, draw the initial jitter
    /// signals and merge the optional baseline snapshot.
    pub fn new(baseline: &dyn BaselineSource) -> Result<Self> {
        let mut generator = TransactionGenerator::new()?;

        let mut ledger = Ledger::new();
        ledger.seed(&mut generator, SEED_COUNT)?;

        let pool = baseline.fetch().unwrap_or_default();

        let mut rng = thread_rng();
        let trends = TrendSignals::new(&mut rng);

        let mut board = ProgressBoard::new();
        board.retrack(&ledger);

        Ok(BridgeState {
            generator,
            ledger,
            pool,
            trends,
            board,
            feed_filter: FeedFilter::default(),
        })
    }

    /// Arrival tick (~800ms): one new transaction enters the ledger and the
    /// running counters, and the pipeline recaptures its working set.
    pub fn on_arrival_tick(&mut self) -> Result<()> {
        let tx = self.generator.generate()?;
        self.pool.apply_arrival(&tx);
        self.ledger.append(tx);
        self.board.retrack(&self.ledger);
        Ok(())
    }

    /// Ambient tick (~3s): address and block-height drift.
    pub fn on_ambient_tick(&mut self) {
        self.pool.perturb_ambient(&mut thread_rng());
    }

    /// Progress tick (~1s): advance the pipeline working set.
    pub fn on_progress_tick(&mut self) {
        self.board.tick();
    }

    /// Throughput tick (~10s): nudge both simulated TPS counters.
    pub fn on_tps_tick(&mut self) {
        self.trends.jitter_tps(&mut thread_rng());
    }

    /// Hourly tick: redraw the transaction-count trend string.
    pub fn on_hourly_tick(&mut self) {
        self.trends.redraw_hourly(&mut thread_rng());
    }

    /// Daily tick: redraw the volume trend string.
    pub fn on_daily_tick(&mut self) {
        self.trends.redraw_daily(&mut thread_rng());
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn pool(&self) -> &PoolStats {
        &self.pool
    }

    pub fn trends(&self) -> &TrendSignals {
        &self.trends
    }

    pub fn tracked(&self) -> &[TrackedTransaction] {
        self.board.tracked()
    }

    /// Per-chain rollup over the full ledger snapshot.
    pub fn rollup(&self) -> RollupTable {
        RollupTable::compute(self.ledger.snapshot())
    }

    /// Hourly-window flow stats as of now.
    pub fn flow(&self) -> FlowStats {
        FlowStats::compute(self.ledger.snapshot(), Utc::now())
    }

    /// Activity feed after the current chain/status filter.
    pub fn filtered_feed(&self) -> Vec<&Transaction> {
        self.ledger
            .snapshot()
            .filter(|tx| self.feed_filter.matches(tx))
            .collect()
    }
}

/// Deadline scheduler for the cooperative loop. All six timers are armed
/// together on construction and die together when the value is dropped, so
/// teardown can never leave a stray cadence running.
pub struct Timers {
    next_arrival: Instant,
    next_ambient: Instant,
    next_progress: Instant,
    next_tps: Instant,
    next_hourly: Instant,
    next_daily: Instant,
}

impl Timers {
    pub fn new(now: Instant) -> Self {
        Timers {
            next_arrival: now + ARRIVAL_INTERVAL,
            next_ambient: now + AMBIENT_INTERVAL,
            next_progress: now + PROGRESS_INTERVAL,
            next_tps: now + TPS_INTERVAL,
            next_hourly: now + HOURLY_INTERVAL,
            next_daily: now + DAILY_INTERVAL,
        }
    }

    /// Run every update whose deadline has passed, re-arming from `now`.
    /// Each callback runs to completion before the next fires.
    pub fn fire_due(&mut self, state: &mut BridgeState, now: Instant) -> Result<()> {
        if now >= self.next_arrival {
            state.on_arrival_tick()?;
            self.next_arrival = now + ARRIVAL_INTERVAL;
        }
        if now >= self.next_progress {
            state.on_progress_tick();
            self.next_progress = now + PROGRESS_INTERVAL;
        }
        if now >= self.next_ambient {
            state.on_ambient_tick();
            self.next_ambient = now + AMBIENT_INTERVAL;
        }
        if now >= self.next_tps {
            state.on_tps_tick();
            self.next_tps = now + TPS_INTERVAL;
        }
        if now >= self.next_hourly {
            state.on_hourly_tick();
            self.next_hourly = now + HOURLY_INTERVAL;
        }
        if now >= self.next_daily {
            state.on_daily_tick();
            self.next_daily = now + DAILY_INTERVAL;
        }
        Ok(())
    }

    /// Time until the earliest pending deadline, to size poll timeouts.
    pub fn until_next(&self, now: Instant) -> Duration {
        let earliest = [
            self.next_arrival,
            self.next_ambient,
            self.next_progress,
            self.next_tps,
            self.next_hourly,
            self.next_daily,
        ]
        .into_iter()
        .min()
        .unwrap_or(now);

        earliest.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::{BaselineSource, NullBaseline};
    use crate::ledger::LEDGER_CAP;
    use crate::progress::TRACKED_COUNT;

    struct FixedBaseline(PoolStats);

    impl BaselineSource for FixedBaseline {
        fn fetch(&self) -> Option<PoolStats> {
            Some(self.0.clone())
        }
    }

    #[test]
    fn test_startup_seeds_and_tracks() {
        let state = BridgeState::new(&NullBaseline).unwrap();
        assert_eq!(state.ledger().len(), SEED_COUNT);
        assert_eq!(state.tracked().len(), TRACKED_COUNT);
        assert_eq!(state.pool().tx_count_24h, 0);
        assert!(!state.trends().volume_trend.is_empty());
    }

    #[test]
    fn test_baseline_merge() {
        let baseline = FixedBaseline(PoolStats {
            total_volume_usd: 5_000_000.0,
            tx_count_24h: 1_000,
            ..PoolStats::default()
        });
        let state = BridgeState::new(&baseline).unwrap();
        assert_eq!(state.pool().tx_count_24h, 1_000);
        assert_eq!(state.pool().total_volume_usd, 5_000_000.0);
    }

    #[test]
    fn test_arrival_tick_end_to_end() {
        let mut state = BridgeState::new(&NullBaseline).unwrap();
        let volume_before = state.pool().total_volume_usd;

        state.on_arrival_tick().unwrap();

        assert_eq!(state.ledger().len(), SEED_COUNT + 1);
        assert_eq!(state.pool().tx_count_24h, 1);
        assert!(state.pool().total_volume_usd > volume_before);

        // The newest arrival sits at the head of the snapshot and of the
        // tracked working set
        let newest = state.ledger().snapshot().next().unwrap().id.clone();
        assert_eq!(state.tracked()[0].tx.id, newest);
    }

    #[test]
    fn test_ledger_stays_capped_under_load() {
        let mut state = BridgeState::new(&NullBaseline).unwrap();
        for _ in 0..(LEDGER_CAP + 50) {
            state.on_arrival_tick().unwrap();
        }
        assert_eq!(state.ledger().len(), LEDGER_CAP);
        assert_eq!(state.pool().tx_count_24h, (LEDGER_CAP + 50) as u64);
    }

    #[test]
    fn test_rollup_reflects_ledger_window() {
        let state = BridgeState::new(&NullBaseline).unwrap();
        let table = state.rollup();
        let total: u64 = crate::types::ALL_CHAINS
            .iter()
            .map(|&c| table.get(c).tx_count)
            .sum();
        // Every seeded transaction touches exactly two chains
        assert_eq!(total, (SEED_COUNT * 2) as u64);
    }

    #[test]
    fn test_filtered_feed_respects_filter() {
        let mut state = BridgeState::new(&NullBaseline).unwrap();
        state.feed_filter.cycle_chain(); // all -> SOL
        for tx in state.filtered_feed() {
            assert!(tx.touches(crate::types::Chain::Sol));
        }
    }

    #[test]
    fn test_timers_fire_on_schedule() {
        let mut state = BridgeState::new(&NullBaseline).unwrap();
        let start = Instant::now();
        let mut timers = Timers::new(start);

        // Nothing is due immediately
        timers.fire_due(&mut state, start).unwrap();
        assert_eq!(state.ledger().len(), SEED_COUNT);

        // One arrival interval later the arrival tick fires, nothing else
        timers
            .fire_due(&mut state, start + ARRIVAL_INTERVAL)
            .unwrap();
        assert_eq!(state.ledger().len(), SEED_COUNT + 1);
        assert_eq!(state.pool().last_block_height, 0);

        // The ambient tick joins in once its own deadline passes
        timers
            .fire_due(&mut state, start + AMBIENT_INTERVAL)
            .unwrap();
        assert_eq!(state.ledger().len(), SEED_COUNT + 2);
    }

    #[test]
    fn test_until_next_bounded_by_progress_tick() {
        let now = Instant::now();
        let timers = Timers::new(now);
        // The arrival deadline is always the nearest at rest
        assert!(timers.until_next(now) <= ARRIVAL_INTERVAL);
    }
}
