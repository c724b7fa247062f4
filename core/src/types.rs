//! Shared primitive types used across the entire kernel.

use serde::{Deserialize, Serialize};

/// A simulation tick. One tick = one simulated day.
pub type Tick = u64;

/// The canonical run identifier.
pub type RunId = String;

/// An opaque entity identifier. Allocated monotonically by the world,
/// never reused within a run, and carries no data of its own —
/// components attach data to it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Entity(pub u64);

/// Identifier of one recorded world event.
/// Strictly increasing in append order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EventId(pub u64);
