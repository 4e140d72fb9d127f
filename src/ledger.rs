// Bounded in-memory transaction ledger, most-recent-first.

use std::collections::VecDeque;

use crate::generator::TransactionGenerator;
use crate::types::{Chain, Transaction, TxStatus};
use crate::Result;

/// Maximum number of transactions kept in memory.
pub const LEDGER_CAP: usize = 200;

/// Number of transactions generated at startup so the dashboard never
/// renders empty.
pub const SEED_COUNT: usize = 50;

/// Ordered, capped collection of synthetic transactions. The newest entry
/// is always at index 0; the ledger itself performs no aggregation.
#[derive(Default)]
pub struct Ledger {
    entries: VecDeque<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger {
            entries: VecDeque::with_capacity(LEDGER_CAP),
        }
    }

    /// Prepend a new transaction, evicting the oldest past the cap.
    pub fn append(&mut self, tx: Transaction) {
        self.entries.push_front(tx);
        self.entries.truncate(LEDGER_CAP);
    }

    /// Populate with freshly generated transactions. These are seed data,
    /// not arrivals: no counters are advanced for them.
    pub fn seed(&mut self, generator: &mut TransactionGenerator, count: usize) -> Result<()> {
        for _ in 0..count {
            self.append(generator.generate()?);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read-only view, most-recent-first.
    pub fn snapshot(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }

    /// The `count` most recent entries, for the progress tracker.
    pub fn recent(&self, count: usize) -> Vec<Transaction> {
        self.entries.iter().take(count).cloned().collect()
    }
}

/// Activity-feed filter: optional chain (matching either endpoint) combined
/// with an optional status. Both default to "all".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeedFilter {
    pub chain: Option<Chain>,
    pub status: Option<TxStatus>,
}

impl FeedFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        let chain_match = match self.chain {
            Some(chain) => tx.touches(chain),
            None => true,
        };
        let status_match = match self.status {
            Some(status) => tx.status == status,
            None => true,
        };
        chain_match && status_match
    }

    /// Cycle the chain filter: all -> SOL -> BSC -> TRON -> ETH -> BTC -> all
    pub fn cycle_chain(&mut self) {
        use crate::types::ALL_CHAINS;
        self.chain = match self.chain {
            None => Some(ALL_CHAINS[0]),
            Some(current) => {
                let idx = ALL_CHAINS.iter().position(|&c| c == current).unwrap_or(0);
                if idx + 1 < ALL_CHAINS.len() {
                    Some(ALL_CHAINS[idx + 1])
                } else {
                    None
                }
            }
        };
    }

    /// Cycle the status filter: all -> pending -> bridging -> confirmed -> all
    pub fn cycle_status(&mut self) {
        self.status = match self.status {
            None => Some(TxStatus::Pending),
            Some(TxStatus::Pending) => Some(TxStatus::Bridging),
            Some(TxStatus::Bridging) => Some(TxStatus::Confirmed),
            Some(TxStatus::Confirmed) | Some(TxStatus::Failed) => None,
        };
    }
}
