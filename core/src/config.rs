//! Engine configuration.
//!
//! Calendar constants are configuration, not kernel invariants — but they
//! must be applied consistently everywhere tick↔calendar conversion occurs,
//! so they live here in one place and are injected into the clock.

use crate::types::Tick;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub days_per_month: u64,
    pub months_per_year: u64,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            days_per_month: 30,
            months_per_year: 12,
        }
    }
}

impl CalendarConfig {
    pub fn days_per_year(&self) -> u64 {
        self.days_per_month * self.months_per_year
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub calendar: CalendarConfig,
    /// How often (in ticks) a clock snapshot is written to an attached archive.
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval: Tick,
}

fn default_snapshot_interval() -> Tick {
    30 // monthly
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            calendar: CalendarConfig::default(),
            snapshot_interval: default_snapshot_interval(),
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file. Missing fields fall back to defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Ok(serde_json::from_str(&content)?)
    }
}
