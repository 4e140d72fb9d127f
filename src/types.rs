// Core data model shared by the simulation core and the dashboard binaries.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The five simulated blockchain networks the bridge connects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Chain {
    Sol,
    Bsc,
    Tron,
    Eth,
    Btc,
}

/// All supported chains, in display order.
pub const ALL_CHAINS: [Chain; 5] = [Chain::Sol, Chain::Bsc, Chain::Tron, Chain::Eth, Chain::Btc];

impl Chain {
    /// Short ticker used everywhere in the UI.
    pub fn ticker(self) -> &'static str {
        match self {
            Chain::Sol => "SOL",
            Chain::Bsc => "BSC",
            Chain::Tron => "TRON",
            Chain::Eth => "ETH",
            Chain::Btc => "BTC",
        }
    }

    /// Full network name for the overview cards.
    pub fn network_name(self) -> &'static str {
        match self {
            Chain::Sol => "Solana Network",
            Chain::Bsc => "BSC Network",
            Chain::Tron => "TRON Network",
            Chain::Eth => "Ethereum Network",
            Chain::Btc => "Bitcoin Network",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ticker())
    }
}

/// Assets that can cross the bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    Usdt,
    Btc,
    Eth,
}

impl Asset {
    /// Decimal places used when formatting amounts of this asset.
    pub fn decimals(self) -> usize {
        match self {
            Asset::Usdt => 2,
            Asset::Btc | Asset::Eth => 4,
        }
    }

    /// Fixed synthetic USD rate, not a live price.
    pub fn usd_rate(self) -> f64 {
        match self {
            Asset::Usdt => 1.0,
            Asset::Btc => 60_000.0,
            Asset::Eth => 3_000.0,
        }
    }

    pub fn ticker(self) -> &'static str {
        match self {
            Asset::Usdt => "USDT",
            Asset::Btc => "BTC",
            Asset::Eth => "ETH",
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ticker())
    }
}

/// Lifecycle of a bridge transfer. `Failed` is part of the taxonomy for
/// external consumers but the generator never produces it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Bridging,
    Confirmed,
    Failed,
}

impl TxStatus {
    /// Uppercase label for status badges.
    pub fn label(self) -> &'static str {
        match self {
            TxStatus::Pending => "PENDING",
            TxStatus::Bridging => "BRIDGING...",
            TxStatus::Confirmed => "CONFIRMED",
            TxStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Block explorer hosts for the activity feed's outbound links
static EXPLORER_HOSTS: Lazy<HashMap<Chain, &'static str>> = Lazy::new(|| {
    let mut hosts = HashMap::new();
    hosts.insert(Chain::Sol, "https://solscan.io/tx/");
    hosts.insert(Chain::Bsc, "https://bscscan.com/tx/");
    hosts.insert(Chain::Eth, "https://etherscan.io/tx/");
    hosts.insert(Chain::Tron, "https://tronscan.org/#/transaction/");
    hosts.insert(Chain::Btc, "https://mempool.space/tx/");
    hosts
});

/// A synthetic cross-chain transfer. Immutable once generated except for
/// `status`, which the progress simulation may advance on its own copy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub source_chain: Chain,
    pub target_chain: Chain,
    pub source_address: String,
    pub target_address: String,
    pub amount: f64,
    pub asset: Asset,
    pub status: TxStatus,
    pub tx_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// USD-equivalent value at the fixed synthetic rates.
    pub fn usd_value(&self) -> f64 {
        self.amount * self.asset.usd_rate()
    }

    /// True if the chain is either endpoint of this transfer.
    pub fn touches(&self, chain: Chain) -> bool {
        self.source_chain == chain || self.target_chain == chain
    }

    /// Amount formatted at the asset's precision, e.g. "1,250.00 USDT".
    pub fn format_amount(&self) -> String {
        format!(
            "{} {}",
            format_thousands(self.amount, self.asset.decimals()),
            self.asset
        )
    }

    /// Explorer link for the source-chain transaction hash, if one exists.
    pub fn explorer_url(&self) -> Option<String> {
        let hash = self.tx_hash.as_ref()?;
        let host = EXPLORER_HOSTS.get(&self.source_chain)?;
        Some(format!("{}{}", host, hash))
    }
}

/// Running pool-level counters. Seeded once from an optional baseline
/// snapshot, then only ever nudged upward by the aggregation updates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoolStats {
    pub total_volume_usd: f64,
    pub tx_count_24h: u64,
    pub active_addresses: i64,
    pub sol_tx_count: u64,
    pub bsc_tx_count: u64,
    pub sol_node_status: String,
    pub bsc_node_status: String,
    pub bridge_status: String,
    pub last_block_height: u64,
}

impl Default for PoolStats {
    fn default() -> Self {
        PoolStats {
            total_volume_usd: 0.0,
            tx_count_24h: 0,
            active_addresses: 0,
            sol_tx_count: 0,
            bsc_tx_count: 0,
            sol_node_status: "online".to_string(),
            bsc_node_status: "online".to_string(),
            bridge_status: "operational".to_string(),
            last_block_height: 0,
        }
    }
}

/// Format a number with thousands separators and a fixed number of decimals.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(frac) if decimals > 0 => format!("{}{}.{}", sign, grouped, frac),
        _ => format!("{}{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_tx(asset: Asset, amount: f64) -> Transaction {
        Transaction {
            id: "0000001".to_string(),
            source_chain: Chain::Sol,
            target_chain: Chain::Bsc,
            source_address: "addr1".to_string(),
            target_address: "addr2".to_string(),
            amount,
            asset,
            status: TxStatus::Pending,
            tx_hash: Some("abc123".to_string()),
            created_at: Utc::now(),
            confirmed_at: None,
        }
    }

    #[test]
    fn test_usd_valuation_fixed_rates() {
        assert_eq!(sample_tx(Asset::Btc, 2.0).usd_value(), 120_000.0);
        assert_eq!(sample_tx(Asset::Eth, 3.0).usd_value(), 9_000.0);
        assert_eq!(sample_tx(Asset::Usdt, 100.0).usd_value(), 100.0);
    }

    #[test]
    fn test_touches_either_endpoint() {
        let tx = sample_tx(Asset::Usdt, 100.0);
        assert!(tx.touches(Chain::Sol));
        assert!(tx.touches(Chain::Bsc));
        assert!(!tx.touches(Chain::Tron));
        assert!(!tx.touches(Chain::Btc));
    }

    #[test]
    fn test_explorer_url_uses_source_chain() {
        let tx = sample_tx(Asset::Usdt, 100.0);
        assert_eq!(
            tx.explorer_url().unwrap(),
            "https://solscan.io/tx/abc123"
        );

        let mut unhashed = tx;
        unhashed.tx_hash = None;
        assert!(unhashed.explorer_url().is_none());
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_thousands(999.0, 0), "999");
        assert_eq!(format_thousands(1000.0, 0), "1,000");
        assert_eq!(format_thousands(0.1234, 4), "0.1234");
    }

    #[test]
    fn test_status_serde_is_lowercase() {
        let json = serde_json::to_string(&TxStatus::Bridging).unwrap();
        assert_eq!(json, "\"bridging\"");
        let chain: Chain = serde_json::from_str("\"TRON\"").unwrap();
        assert_eq!(chain, Chain::Tron);
    }

    #[test]
    fn test_pool_stats_default_baseline() {
        let stats = PoolStats::default();
        assert_eq!(stats.tx_count_24h, 0);
        assert_eq!(stats.sol_node_status, "online");
        assert_eq!(stats.bridge_status, "operational");
    }
}
