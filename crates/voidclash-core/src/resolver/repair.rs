//! Damage control.

use crate::entity::Ship;
use crate::fleet::Fleets;
use crate::narration::BattleEvent;

use super::{Phase, PhaseContext, Resolver};

/// Chance that a ship with damaged subsystems repairs one this round.
pub const REPAIR_CHANCE: f64 = 0.5;

/// Repair chance while under a repair-priority order.
pub const PRIORITY_REPAIR_CHANCE: f64 = 1.0;

/// Efficiency restored by one repair.
pub const REPAIR_AMOUNT: u32 = 10;

/// Attempts one repair on every live ship with a non-operational subsystem.
///
/// The chance draw is always consumed, even under repair priority. Offline
/// subsystems can be picked but cannot be repaired.
pub fn repair_phase<'a>(ships: impl IntoIterator<Item = &'a mut Ship>, ctx: &mut PhaseContext<'_>) {
    for ship in ships {
        if ship.is_destroyed() {
            continue;
        }
        let damaged: Vec<String> = ship
            .damaged_subsystems()
            .into_iter()
            .map(str::to_owned)
            .collect();
        if damaged.is_empty() {
            continue;
        }
        let chance = if ship.repair_priority {
            PRIORITY_REPAIR_CHANCE
        } else {
            REPAIR_CHANCE
        };
        if !ctx.dice.chance(chance) {
            continue;
        }
        let name = &damaged[ctx.dice.pick(damaged.len())];
        let Some(system) = ship.systems.get_mut(name) else {
            continue;
        };
        let event = if system.repair(REPAIR_AMOUNT) {
            BattleEvent::SubsystemRepaired {
                ship: ship.name.clone(),
                subsystem: name.clone(),
                description: system.effect.clone(),
                efficiency: system.efficiency,
            }
        } else {
            BattleEvent::RepairFailed {
                ship: ship.name.clone(),
                subsystem: name.clone(),
            }
        };
        tracing::debug!(ship = %ship.name, subsystem = %name, "repair attempt");
        ctx.narrator.narrate(&event);
    }
}

/// Resolver for the repair phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepairResolver;

impl Resolver for RepairResolver {
    fn phase(&self) -> Phase {
        Phase::Repairs
    }

    fn resolve(&self, fleets: &mut Fleets, ctx: &mut PhaseContext<'_>) {
        repair_phase(fleets.ships_mut(), ctx);
    }
}
