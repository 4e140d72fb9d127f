// Optional baseline statistics source.
//
// The dashboard can seed its pool counters from a previously exported
// snapshot; when none is available it simply starts from zero. Failure is
// never escalated because the simulation needs nothing external.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use log::debug;

use crate::types::PoolStats;
use crate::{BridgeError, Result};

/// Environment variable naming the snapshot file to read at startup.
pub const SNAPSHOT_ENV: &str = "BRIDGESIM_SNAPSHOT";

/// A source that can attempt to supply an initial statistics baseline.
pub trait BaselineSource {
    /// Best-effort, one-shot read. `None` for any reason at all.
    fn fetch(&self) -> Option<PoolStats>;
}

/// Default source: never supplies anything.
#[derive(Default)]
pub struct NullBaseline;

impl BaselineSource for NullBaseline {
    fn fetch(&self) -> Option<PoolStats> {
        None
    }
}

/// Reads a JSON `PoolStats` snapshot from a file on disk.
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotFile { path: path.into() }
    }

    /// Build a source from the environment, if a snapshot is configured.
    pub fn from_env() -> Option<Self> {
        std::env::var(SNAPSHOT_ENV).ok().map(SnapshotFile::new)
    }

    /// Export the current pool counters so a later run can reload them.
    /// Unlike `fetch`, a failed write is an error the caller sees.
    pub fn store(&self, stats: &PoolStats) -> Result<()> {
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), stats)
            .map_err(|e| BridgeError::Snapshot(format!("Failed to write snapshot: {}", e)))
    }
}

impl BaselineSource for SnapshotFile {
    fn fetch(&self) -> Option<PoolStats> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                debug!("Baseline snapshot {} not readable: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(stats) => Some(stats),
            Err(e) => {
                debug!("Baseline snapshot {} not parsable: {}", self.path.display(), e);
                None
            }
        }
    }
}
