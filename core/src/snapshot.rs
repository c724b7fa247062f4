//! Snapshot serialization — periodic clock state for the archive.
//!
//! A snapshot is written to an attached archive every
//! `EngineConfig::snapshot_interval` ticks. It marks a resume point for
//! replay tooling; world state itself is reconstructed by replaying the
//! event log from the snapshot's tick.

use crate::clock::WorldClock;
use crate::types::{RunId, Tick};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub run_id: RunId,
    pub tick: Tick,
    pub clock: WorldClock,
}
