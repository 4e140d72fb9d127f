// Display-focused progress simulation for the transaction pipeline.
//
// Operates on a small working set of recent ledger entries, not on the
// ledger itself: the ledger's status field stays authoritative for the
// activity feed, this board only animates the pipeline view.

use rand::{thread_rng, Rng};

use crate::ledger::Ledger;
use crate::types::{Transaction, TxStatus};

/// Size of the tracked working set (the pipeline shows the newest 20).
pub const TRACKED_COUNT: usize = 20;

/// Progress threshold at which a pending transfer starts bridging.
const BRIDGING_THRESHOLD: f64 = 45.0;

/// Maximum progress gained per one-second tick.
const MAX_GAIN_PER_TICK: f64 = 5.0;

/// A tracked transaction with its simulated completion percentage.
#[derive(Clone, Debug)]
pub struct TrackedTransaction {
    pub tx: Transaction,
    pub progress: f64,
}

impl TrackedTransaction {
    fn capture<R: Rng>(rng: &mut R, tx: Transaction) -> Self {
        let progress = match tx.status {
            TxStatus::Confirmed => 100.0,
            TxStatus::Bridging => 50.0 + rng.gen::<f64>() * 30.0,
            TxStatus::Pending => 10.0 + rng.gen::<f64>() * 20.0,
            // Never generated, but a failed transfer would show no progress
            TxStatus::Failed => 0.0,
        };
        TrackedTransaction { tx, progress }
    }

    /// Apply one tick's progress gain. Confirmed entries are frozen.
    pub fn advance(&mut self, gain: f64) {
        if self.tx.status == TxStatus::Confirmed {
            return;
        }

        self.progress += gain;
        if self.progress >= 100.0 {
            self.progress = 100.0;
            self.tx.status = TxStatus::Confirmed; // terminal
        } else if self.progress >= BRIDGING_THRESHOLD && self.tx.status == TxStatus::Pending {
            self.tx.status = TxStatus::Bridging;
        }
    }
}

/// The tracked working set, recaptured whenever the ledger changes and
/// advanced on its own one-second cadence.
#[derive(Default)]
pub struct ProgressBoard {
    tracked: Vec<TrackedTransaction>,
}

impl ProgressBoard {
    pub fn new() -> Self {
        ProgressBoard { tracked: Vec::new() }
    }

    /// Recapture the newest ledger entries, reinitializing each progress
    /// value from its current status.
    pub fn retrack(&mut self, ledger: &Ledger) {
        let mut rng = thread_rng();
        self.tracked = ledger
            .recent(TRACKED_COUNT)
            .into_iter()
            .map(|tx| TrackedTransaction::capture(&mut rng, tx))
            .collect();
    }

    /// One simulation tick: every non-terminal entry gains up to 5 points.
    pub fn tick(&mut self) {
        let mut rng = thread_rng();
        for entry in &mut self.tracked {
            entry.advance(rng.gen::<f64>() * MAX_GAIN_PER_TICK);
        }
    }

    pub fn tracked(&self) -> &[TrackedTransaction] {
        &self.tracked
    }
}
