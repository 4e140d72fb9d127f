// Synthetic transaction generation.
//
// Policy mirrors what real bridge traffic tends to look like: mostly USDT
// in round ticket sizes, a thin tail of BTC/ETH, and every transfer
// strictly cross-chain.

use chrono::{Duration, Utc};
use rand::{thread_rng, Rng};

use crate::address::{generate_address, generate_tx_hash, TxIdGenerator};
use crate::types::{Asset, Chain, Transaction, TxStatus, ALL_CHAINS};
use crate::Result;

// Base ticket sizes per asset; a small random jitter is added on top
const USDT_TIERS: [f64; 10] = [
    100.0, 250.0, 500.0, 750.0, 1000.0, 1500.0, 2000.0, 5000.0, 10000.0, 25000.0,
];
const BTC_TIERS: [f64; 5] = [0.01, 0.025, 0.05, 0.1, 0.2];
const ETH_TIERS: [f64; 5] = [0.5, 1.0, 2.0, 5.0, 8.0];

const GENERATED_STATUSES: [TxStatus; 3] = [TxStatus::Pending, TxStatus::Bridging, TxStatus::Confirmed];

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn pick_asset<R: Rng>(rng: &mut R) -> Asset {
    let r: f64 = rng.gen();
    if r < 0.70 {
        Asset::Usdt // 70% USDT
    } else if r < 0.85 {
        Asset::Btc // 15% BTC
    } else {
        Asset::Eth // 15% ETH
    }
}

fn pick_amount<R: Rng>(rng: &mut R, asset: Asset) -> f64 {
    match asset {
        Asset::Usdt => {
            let base = USDT_TIERS[rng.gen_range(0..USDT_TIERS.len())];
            round_to(base + rng.gen::<f64>() * 200.0, 2)
        }
        Asset::Btc => {
            let base = BTC_TIERS[rng.gen_range(0..BTC_TIERS.len())];
            round_to(base + rng.gen::<f64>() * 0.02, 4)
        }
        Asset::Eth => {
            let base = ETH_TIERS[rng.gen_range(0..ETH_TIERS.len())];
            round_to(base + rng.gen::<f64>() * 0.5, 4)
        }
    }
}

fn pick_chain<R: Rng>(rng: &mut R) -> Chain {
    ALL_CHAINS[rng.gen_range(0..ALL_CHAINS.len())]
}

/// Produces fully-populated synthetic transactions.
///
/// Owns the unique-id generator; everything else is drawn fresh per call
/// with no other state touched.
pub struct TransactionGenerator {
    ids: TxIdGenerator,
}

impl TransactionGenerator {
    pub fn new() -> Result<Self> {
        Ok(TransactionGenerator {
            ids: TxIdGenerator::new()?,
        })
    }

    /// Generate one synthetic cross-chain transaction.
    pub fn generate(&mut self) -> Result<Transaction> {
        let mut rng = thread_rng();

        let asset = pick_asset(&mut rng);
        let amount = pick_amount(&mut rng, asset);

        let source_chain = pick_chain(&mut rng);
        // Redraw the target until it differs: the transfer must cross chains
        let mut target_chain = pick_chain(&mut rng);
        while target_chain == source_chain {
            target_chain = pick_chain(&mut rng);
        }

        let status = GENERATED_STATUSES[rng.gen_range(0..GENERATED_STATUSES.len())];

        let created_at = Utc::now();
        let confirmed_at = if status == TxStatus::Confirmed {
            // Confirmation lands within 5 seconds of creation
            Some(created_at + Duration::milliseconds(rng.gen_range(0..5000)))
        } else {
            None
        };

        Ok(Transaction {
            id: self.ids.generate()?,
            source_address: generate_address(&mut rng, source_chain),
            target_address: generate_address(&mut rng, target_chain),
            tx_hash: Some(generate_tx_hash(&mut rng, source_chain)),
            source_chain,
            target_chain,
            amount,
            asset,
            status,
            created_at,
            confirmed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimals_of(value: f64, decimals: u32) -> bool {
        let factor = 10f64.powi(decimals as i32);
        ((value * factor).round() - value * factor).abs() < 1e-6
    }

    #[test]
    fn test_generated_transactions_cross_chains() {
        let mut generator = TransactionGenerator::new().unwrap();
        for _ in 0..200 {
            let tx = generator.generate().unwrap();
            assert_ne!(tx.source_chain, tx.target_chain);
        }
    }

    #[test]
    fn test_amounts_positive_with_asset_precision() {
        let mut generator = TransactionGenerator::new().unwrap();
        for _ in 0..200 {
            let tx = generator.generate().unwrap();
            assert!(tx.amount > 0.0);
            match tx.asset {
                Asset::Usdt => assert!(decimals_of(tx.amount, 2)),
                Asset::Btc | Asset::Eth => assert!(decimals_of(tx.amount, 4)),
            }
        }
    }

    #[test]
    fn test_confirmed_at_only_when_confirmed() {
        let mut generator = TransactionGenerator::new().unwrap();
        for _ in 0..200 {
            let tx = generator.generate().unwrap();
            match tx.status {
                TxStatus::Confirmed => {
                    let confirmed = tx.confirmed_at.expect("confirmed tx needs a timestamp");
                    let delta = confirmed - tx.created_at;
                    assert!(delta >= Duration::zero());
                    assert!(delta < Duration::seconds(5));
                }
                _ => assert!(tx.confirmed_at.is_none()),
            }
        }
    }

    #[test]
    fn test_failed_is_never_generated() {
        let mut generator = TransactionGenerator::new().unwrap();
        for _ in 0..300 {
            let tx = generator.generate().unwrap();
            assert_ne!(tx.status, TxStatus::Failed);
        }
    }

    #[test]
    fn test_addresses_match_their_chains() {
        let mut generator = TransactionGenerator::new().unwrap();
        for _ in 0..100 {
            let tx = generator.generate().unwrap();
            let expected_len = |chain: Chain| match chain {
                Chain::Sol => 44,
                Chain::Btc => 34,
                _ => 42,
            };
            assert_eq!(tx.source_address.len(), expected_len(tx.source_chain));
            assert_eq!(tx.target_address.len(), expected_len(tx.target_chain));
        }
    }
}
