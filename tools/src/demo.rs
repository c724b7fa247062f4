//! Demo domain systems for the headless runner.
//!
//! These live outside the kernel on purpose: they consume
//! (World, WorldClock, EventBus, SeededRng) exactly the way real domain
//! systems would, and everything observable they do goes through the bus.

use chronica_core::{
    bus::EventBus,
    clock::WorldClock,
    error::SimResult,
    event::{EventCategory, EventDraft},
    rng::SeededRng,
    system::SimSystem,
    types::Tick,
    world::World,
};
use serde_json::json;

pub const SETTLEMENT_STORE: &str = "settlement";

/// Component attached to every settlement entity.
#[derive(Debug, Clone)]
pub struct Settlement {
    pub name: String,
    pub population: i64,
    pub founded: Tick,
}

const NAME_STEMS: [&str; 8] = [
    "Ash", "Brack", "Cael", "Dun", "Ferro", "Gild", "Hollow", "Mir",
];
const NAME_ENDS: [&str; 6] = ["ford", "mere", "holt", "gate", "fen", "reach"];

/// Founds settlements and grows their populations. Monthly.
pub struct SettlementSystem {
    max_settlements: usize,
}

impl SettlementSystem {
    pub fn new() -> Self {
        Self { max_settlements: 8 }
    }
}

impl Default for SettlementSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl SimSystem for SettlementSystem {
    fn name(&self) -> &'static str {
        "settlement"
    }

    fn frequency(&self) -> Tick {
        30
    }

    fn execution_order(&self) -> i32 {
        10
    }

    fn initialize(&mut self, world: &mut World) -> SimResult<()> {
        world.register_component(SETTLEMENT_STORE);
        Ok(())
    }

    fn execute(
        &mut self,
        world: &mut World,
        clock: &WorldClock,
        bus: &EventBus,
        rng: &mut SeededRng,
    ) -> SimResult<()> {
        let tick = clock.current_tick();
        let towns = world.query(&[SETTLEMENT_STORE])?;

        // Occasionally found a new settlement until the region fills up.
        if towns.len() < self.max_settlements && rng.chance(0.5) {
            let stem = NAME_STEMS[rng.range_i64(0, NAME_STEMS.len() as i64 - 1) as usize];
            let end = NAME_ENDS[rng.range_i64(0, NAME_ENDS.len() as i64 - 1) as usize];
            let name = format!("{stem}{end}");
            let population = rng.range_i64(80, 400);
            let entity = world.create_entity();
            world.add_component(
                entity,
                SETTLEMENT_STORE,
                Settlement {
                    name: name.clone(),
                    population,
                    founded: tick,
                },
            )?;
            bus.emit(
                EventDraft::new(EventCategory::Political, "settlement.founded", tick)
                    .participant(entity)
                    .significance(60)
                    .data(json!({ "name": name, "population": population })),
            )?;
            log::debug!("tick={tick} founded {name} (pop {population})");
        }

        // Monthly growth; a census event once a year.
        let annual = clock.is_due(clock.calendar().days_per_year());
        for entity in towns {
            let growth = rng.range_i64(0, 12);
            let Some(town) =
                world.get_component_mut::<Settlement>(entity, SETTLEMENT_STORE)?
            else {
                continue;
            };
            town.population += town.population / 60 + growth;
            if annual {
                let (name, population, founded) =
                    (town.name.clone(), town.population, town.founded);
                bus.emit(
                    EventDraft::new(EventCategory::Social, "settlement.census", tick)
                        .participant(entity)
                        .significance(10)
                        .data(json!({
                            "name": name,
                            "population": population,
                            "founded": founded,
                        })),
                )?;
            }
        }
        Ok(())
    }
}

/// Raids between settlements. Seasonal; runs after settlement growth so a
/// raid in the same tick sees this season's populations.
pub struct RaidSystem;

impl RaidSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RaidSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl SimSystem for RaidSystem {
    fn name(&self) -> &'static str {
        "raiders"
    }

    fn frequency(&self) -> Tick {
        90
    }

    fn execution_order(&self) -> i32 {
        20
    }

    fn execute(
        &mut self,
        world: &mut World,
        clock: &WorldClock,
        bus: &EventBus,
        rng: &mut SeededRng,
    ) -> SimResult<()> {
        let towns = world.query(&[SETTLEMENT_STORE])?;
        if towns.len() < 2 {
            return Ok(());
        }
        let tick = clock.current_tick();
        let picked = rng.shuffle(&towns);
        let (attacker, defender) = (picked[0], picked[1]);

        // Link the raid back to the most recent event touching the defender.
        let prior = bus.log().for_entity(defender).last().map(|e| e.id);

        let losses = rng.range_i64(5, 60);
        let (name, ruined) = {
            let Some(town) =
                world.get_component_mut::<Settlement>(defender, SETTLEMENT_STORE)?
            else {
                return Ok(());
            };
            town.population = (town.population - losses).max(0);
            (town.name.clone(), town.population < 40)
        };

        let mut raid = EventDraft::new(EventCategory::Military, "war.raid", tick)
            .participant(attacker)
            .participant(defender)
            .location(defender)
            .significance(45)
            .data(json!({ "losses": losses }));
        if let Some(id) = prior {
            raid = raid.cause(id);
        }

        if ruined {
            // Two-phase emission so the raid carries a forward link to the
            // abandonment it triggers.
            let mut raid_event = bus.create(raid)?;
            let abandoned = bus.create(
                EventDraft::new(EventCategory::Social, "settlement.abandoned", tick)
                    .participant(defender)
                    .cause(raid_event.id)
                    .significance(70)
                    .data(json!({ "name": name })),
            )?;
            raid_event.consequences.push(abandoned.id);
            bus.publish(raid_event)?;
            bus.publish(abandoned)?;
            world.remove_component(defender, SETTLEMENT_STORE)?;
            log::debug!("tick={tick} {name} abandoned after raid");
        } else {
            bus.emit(raid)?;
        }
        Ok(())
    }
}
