// Headless bridge feed driver
// Runs the arrival/progress/ambient cadences without a terminal UI and
// prints each synthetic transfer as it lands, with a rollup summary at
// the end. Useful for smoke-testing the simulation and for exporting a
// pool snapshot the dashboard can reload.

use std::thread;
use std::time::Instant;

use colored::Colorize;
use log::info;
use simple_logger::SimpleLogger;

use bridgesim::address::mask_address;
use bridgesim::baseline::{NullBaseline, SnapshotFile};
use bridgesim::state::{BridgeState, Timers, ARRIVAL_INTERVAL};
use bridgesim::types::{format_thousands, TxStatus};
use bridgesim::{BridgeError, Result};

/// How many arrivals to simulate before printing the closing summary.
const TOTAL_ARRIVALS: usize = 250;

/// Pool summary cadence, in arrivals.
const SUMMARY_EVERY: usize = 25;

fn status_line(state: &BridgeState) -> String {
    let tx = match state.ledger().snapshot().next() {
        Some(tx) => tx,
        None => return String::new(),
    };

    let status = match tx.status {
        TxStatus::Confirmed => tx.status.label().green(),
        TxStatus::Bridging => tx.status.label().yellow(),
        TxStatus::Pending => tx.status.label().red(),
        TxStatus::Failed => tx.status.label().dimmed(),
    };

    format!(
        "{} -> {} | {:>18} | {} | {}",
        tx.source_chain.ticker(),
        tx.target_chain.ticker(),
        tx.format_amount(),
        mask_address(&tx.source_address),
        status,
    )
}

fn print_pool_summary(state: &BridgeState) {
    let pool = state.pool();
    let trends = state.trends();
    info!(
        "Pool: ${} volume | {} txs | {} addresses | block {} | SOL {} TPS / BSC {} TPS",
        format_thousands(pool.total_volume_usd, 2),
        pool.tx_count_24h,
        format_thousands(pool.active_addresses as f64, 0),
        format_thousands(pool.last_block_height as f64, 0),
        trends.sol_tps,
        trends.bsc_tps,
    );
}

fn run_feed() -> Result<()> {
    // Initialize logging
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .map_err(|e| BridgeError::System(format!("Failed to initialize logger: {}", e)))?;

    info!("Initializing bridge feed simulation...");

    let snapshot = SnapshotFile::from_env();
    let mut state = match &snapshot {
        Some(source) => {
            info!("Loading baseline snapshot from the environment");
            BridgeState::new(source)?
        }
        None => BridgeState::new(&NullBaseline)?,
    };

    info!(
        "Ledger seeded with {} transactions; simulating {} arrivals",
        state.ledger().len(),
        TOTAL_ARRIVALS
    );
    print_pool_summary(&state);

    let mut timers = Timers::new(Instant::now());
    let mut arrivals = 0;

    while arrivals < TOTAL_ARRIVALS {
        let before = state.pool().tx_count_24h;
        timers.fire_due(&mut state, Instant::now())?;

        if state.pool().tx_count_24h > before {
            arrivals += 1;
            println!("{}", status_line(&state));

            if arrivals % SUMMARY_EVERY == 0 {
                info!(
                    "Processed {} arrivals ({:.1}% complete)",
                    arrivals,
                    (arrivals as f64 / TOTAL_ARRIVALS as f64) * 100.0
                );
                print_pool_summary(&state);
            }
        }

        thread::sleep(timers.until_next(Instant::now()).min(ARRIVAL_INTERVAL));
    }

    info!("Feed simulation completed with {} arrivals!", arrivals);

    let rollup = state.rollup();
    let flow = state.flow();
    info!("Final rollup over the in-memory window:");
    for &chain in &bridgesim::types::ALL_CHAINS {
        let entry = rollup.get(chain);
        info!(
            "  - {:<4}: {} txs, ${} volume",
            chain.ticker(),
            entry.tx_count,
            format_thousands(entry.usd_volume, 2)
        );
    }
    info!(
        "Corridor (last hour): SOL->BSC {} txs / ${}, BSC->SOL {} txs / ${}",
        flow.sol_to_bsc_count,
        format_thousands(flow.sol_to_bsc_volume, 2),
        flow.bsc_to_sol_count,
        format_thousands(flow.bsc_to_sol_volume, 2),
    );
    print_pool_summary(&state);

    // Export the final counters so the next run (or the dashboard) can
    // pick up where this one left off
    if let Some(file) = &snapshot {
        file.store(state.pool())?;
        info!("Pool snapshot exported");
    }

    Ok(())
}

fn main() {
    // Run the feed and handle any errors
    if let Err(e) = run_feed() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
