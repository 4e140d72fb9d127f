// Bridgesim - a simulated cross-chain bridge activity dashboard.
//
// The library holds the simulation core: synthetic transaction generation,
// the bounded in-memory ledger, the per-transaction progress simulation and
// the statistics aggregation that the dashboard binaries render.

use std::io;
use thiserror::Error;

pub mod address;
pub mod baseline;
pub mod generator;
pub mod ledger;
pub mod progress;
pub mod state;
pub mod stats;
pub mod types;

// Custom error type for the application
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Time error: {0}")]
    Time(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("System error: {0}")]
    System(String),
}

// Type alias for Result with our custom error type
pub type Result<T> = std::result::Result<T, BridgeError>;
