//! chronica-core — the deterministic world-history simulation kernel.
//!
//! Independent domain systems (economy, warfare, magic, culture, ...)
//! mutate a shared entity/component store over simulated time and record
//! their effects as an append-only, causally-linked event log. This crate
//! is the kernel they all share:
//!
//!   - [`world`]      entity allocation + typed component storage
//!   - [`clock`]      tick counter, calendar projection, frequency checks
//!   - [`engine`]     the scheduler that runs due systems in fixed order
//!   - [`system`]     the trait every domain system implements
//!   - [`bus`]        synchronous publish/subscribe over world events
//!   - [`event_log`]  the authoritative history, with cascade traversal
//!   - [`event`]      the WorldEvent wire contract + id factory
//!   - [`rng`]        seeded randomness with named substream forking
//!   - [`archive`]    SQLite run archive (write-behind sink)
//!
//! GUARANTEES:
//!   - Bit-for-bit reproducible runs given the same seed and the same
//!     system registrations.
//!   - Stable interleaving of systems that run at different cadences.
//!   - A cause→consequence event graph that downstream tooling can
//!     traverse without infinite loops.
//!
//! Everything here is single-threaded, cooperative and synchronous. There
//! is no parallelism, no async, and no wall-clock time inside the kernel.

pub mod archive;
pub mod bus;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod event_log;
pub mod rng;
pub mod snapshot;
pub mod system;
pub mod types;
pub mod world;
