//! The simulation engine — advances the clock and runs due systems.
//!
//! RULES:
//!   - A tick is a single uninterrupted pass: advance the clock, run every
//!     due system in fixed order. No parallelism, no suspension.
//!   - Systems execute in ascending execution_order; ties fall back to
//!     registration order. The ordering is stable so that later systems
//!     may react to events emitted earlier in the same tick.
//!   - Only the currently-executing system mutates the world.
//!   - All randomness flows through per-system substreams forked from the
//!     root seed by system name at registration.
//!   - All observable effects are WorldEvents emitted through the bus.
//!   - One faulty system does not halt the world: an Err or panic from
//!     `execute` is logged and the remaining due systems still run.

use crate::archive::RunArchive;
use crate::bus::EventBus;
use crate::clock::WorldClock;
use crate::config::EngineConfig;
use crate::error::SimResult;
use crate::event::EventFactory;
use crate::rng::SeededRng;
use crate::snapshot::SimSnapshot;
use crate::system::SimSystem;
use crate::types::{RunId, Tick};
use crate::world::World;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

struct RegisteredSystem {
    order: i32,
    registered: usize,
    frequency: Tick,
    initialized: bool,
    rng: SeededRng,
    system: Box<dyn SimSystem>,
}

pub struct SimEngine {
    pub run_id: RunId,
    pub clock: WorldClock,
    pub world: World,
    bus: EventBus,
    config: EngineConfig,
    root_rng: SeededRng,
    seed: u64,
    systems: Vec<RegisteredSystem>,
    archive: Option<Rc<RunArchive>>,
}

impl SimEngine {
    pub fn new(run_id: RunId, seed: u64) -> Self {
        Self::with_config(run_id, seed, EngineConfig::default())
    }

    pub fn with_config(run_id: RunId, seed: u64, config: EngineConfig) -> Self {
        Self {
            clock: WorldClock::with_calendar(config.calendar),
            world: World::new(),
            bus: EventBus::with_factory(EventFactory::new()),
            root_rng: SeededRng::new(seed),
            seed,
            config,
            run_id,
            systems: Vec::new(),
            archive: None,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Register a system. Registration order does not matter for
    /// scheduling; the runner keeps systems sorted by
    /// (execution_order, registration index).
    pub fn register(&mut self, system: Box<dyn SimSystem>) {
        let frequency = system.frequency();
        assert!(
            frequency > 0,
            "system '{}' declares a zero frequency",
            system.name()
        );
        assert!(
            self.systems.iter().all(|s| s.system.name() != system.name()),
            "system name '{}' registered twice — substreams must not be shared",
            system.name()
        );
        let registered = self.systems.len();
        let rng = self.root_rng.fork(system.name());
        self.systems.push(RegisteredSystem {
            order: system.execution_order(),
            registered,
            frequency,
            initialized: false,
            rng,
            system,
        });
        self.systems.sort_by_key(|s| (s.order, s.registered));
    }

    /// Mirror every emitted event (and periodic clock snapshots) into a
    /// SQLite archive. The in-memory log stays authoritative.
    pub fn attach_archive(&mut self, archive: Rc<RunArchive>) {
        let run_id = self.run_id.clone();
        let sink = Rc::clone(&archive);
        self.bus.on_any(move |event| {
            if let Err(e) = sink.append_event(&run_id, event) {
                log::error!("archive append failed for event {}: {e}", event.id.0);
            }
        });
        self.archive = Some(archive);
    }

    /// Advance one tick. This is the core simulation step.
    pub fn tick(&mut self) -> SimResult<Tick> {
        // Wiring errors during initialize abort before the clock moves.
        for entry in &mut self.systems {
            if !entry.initialized {
                entry.system.initialize(&mut self.world)?;
                entry.initialized = true;
            }
        }

        let current = self.clock.advance();

        for entry in &mut self.systems {
            if !self.clock.is_due(entry.frequency) {
                continue;
            }
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                entry
                    .system
                    .execute(&mut self.world, &self.clock, &self.bus, &mut entry.rng)
            }));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => log::error!(
                    "tick={current} system '{}' failed: {e}",
                    entry.system.name()
                ),
                Err(_) => log::error!(
                    "tick={current} system '{}' panicked, continuing tick",
                    entry.system.name()
                ),
            }
        }

        if let Some(archive) = &self.archive {
            if current % self.config.snapshot_interval == 0 {
                let snapshot = SimSnapshot {
                    run_id: self.run_id.clone(),
                    tick: current,
                    clock: self.clock.clone(),
                };
                archive.save_snapshot(&self.run_id, current, &serde_json::to_string(&snapshot)?)?;
                log::debug!("snapshot saved at tick {current}");
            }
        }

        Ok(current)
    }

    /// Run n ticks in a loop. Used for testing and fast-forward.
    pub fn run_ticks(&mut self, n: u64) -> SimResult<()> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    /// Call `cleanup` on every system. Used for test isolation.
    pub fn cleanup(&mut self) {
        for entry in &mut self.systems {
            entry.system.cleanup();
        }
    }
}
