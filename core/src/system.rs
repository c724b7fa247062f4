//! System trait — the contract every simulation system fulfills.
//!
//! RULE: systems communicate only through world events and shared
//! components. A system never calls another system's functions directly
//! and never reads another system's internal state.
//!
//! The engine calls `execute` on each registered system whose frequency
//! divides the current tick, in ascending execution order (registration
//! order breaks ties). Later systems observe events emitted earlier in
//! the same tick through the bus and its log.

use crate::bus::EventBus;
use crate::clock::WorldClock;
use crate::error::SimResult;
use crate::rng::SeededRng;
use crate::types::Tick;
use crate::world::World;

pub trait SimSystem {
    /// Unique stable name. Doubles as the RNG substream name, so it must
    /// never be shared between two systems.
    fn name(&self) -> &'static str;

    /// Tick period. 1 = every tick. Must be positive.
    fn frequency(&self) -> Tick {
        1
    }

    /// Systems execute in ascending order within a tick.
    fn execution_order(&self) -> i32 {
        0
    }

    /// Called once, before the first tick. Register component stores here.
    fn initialize(&mut self, _world: &mut World) -> SimResult<()> {
        Ok(())
    }

    /// Called on every tick where `frequency` divides the current tick.
    ///
    /// - `world`: the shared entity/component store (exclusive while running)
    /// - `clock`: read-only tick and calendar
    /// - `bus`:   emit world events; read the log
    /// - `rng`:   this system's private substream — never share it
    fn execute(
        &mut self,
        world: &mut World,
        clock: &WorldClock,
        bus: &EventBus,
        rng: &mut SeededRng,
    ) -> SimResult<()>;

    /// Releases internal registries. Used for test isolation.
    fn cleanup(&mut self) {}
}
