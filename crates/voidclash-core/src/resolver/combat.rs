//! Combat resolvers: gunnery, missiles and boarding.
//!
//! Each phase runs twice per round, fleet A attacking fleet B and then B
//! attacking A, so damage dealt by A in a phase is visible to B's attacks in
//! the same phase. Ships destroyed earlier in the round neither act nor are
//! targeted.
//!
//! # Resolution rules
//!
//! - Gunnery: targets are tried nearest first; the first one that at least
//!   one battery can reach (arc and range) is engaged by every such battery.
//!   A battery hits when `2d20 + attack_mod + accuracy` strictly exceeds
//!   `shield + defense_mod`. Fire stops as soon as the target is destroyed.
//! - Missiles: one per ship per round at the nearest enemy within long range,
//!   for `3d6` damage with no to-hit roll.
//! - Boarding: a [`BOARDING_CHANCE`] draw, then the nearest enemy must be at
//!   point range. `1d20 + boarding_strength + attack_mod` must strictly exceed
//!   the defender's `boarding_strength + defense_mod`; success deals `1d10`.

use crate::dice::DiceExpr;
use crate::entity::Ship;
use crate::fleet::Fleets;
use crate::geometry::{can_fire, distance, in_range, RangeBand};
use crate::narration::{BattleEvent, DestructionCause};

use super::{each_engagement, signed, Phase, PhaseContext, Resolver};

/// Gunnery to-hit roll.
pub const ATTACK_ROLL: DiceExpr = DiceExpr::TWO_D20;

/// Missile damage.
pub const MISSILE_DAMAGE: DiceExpr = DiceExpr::THREE_D6;

/// Maximum missile reach.
pub const MISSILE_RANGE: RangeBand = RangeBand::Long;

/// Chance per ship per round of attempting a boarding action.
pub const BOARDING_CHANCE: f64 = 0.20;

/// Boarding roll.
pub const BOARDING_ROLL: DiceExpr = DiceExpr::D20;

/// Boarding damage.
pub const BOARDING_DAMAGE: DiceExpr = DiceExpr::D10;

/// Maximum boarding reach.
pub const BOARDING_RANGE: RangeBand = RangeBand::Point;

// ============================================================================
// Targeting
// ============================================================================

/// Index of the nearest live ship in `defenders`.
///
/// Ties go to the ship listed first.
#[must_use]
pub fn nearest_live_target(ship: &Ship, defenders: &[Ship]) -> Option<usize> {
    defenders
        .iter()
        .enumerate()
        .filter(|(_, target)| !target.is_destroyed())
        .map(|(index, target)| (index, distance(ship, target)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

/// Picks a gunnery target and the batteries that can engage it.
///
/// Returns the target's index and the indices of every battery that can
/// fire on it, or `None` if no live enemy is reachable by any battery.
fn acquire_target(ship: &Ship, defenders: &[Ship]) -> Option<(usize, Vec<usize>)> {
    let mut candidates: Vec<(usize, f64)> = defenders
        .iter()
        .enumerate()
        .filter(|(_, target)| !target.is_destroyed())
        .map(|(index, target)| (index, distance(ship, target)))
        .collect();
    // Stable: equidistant targets keep roster order.
    candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

    candidates.into_iter().find_map(|(index, _)| {
        let target = &defenders[index];
        let batteries: Vec<usize> = ship
            .weapons
            .batteries
            .iter()
            .enumerate()
            .filter(|(_, battery)| can_fire(ship, target, battery))
            .map(|(battery_index, _)| battery_index)
            .collect();
        (!batteries.is_empty()).then_some((index, batteries))
    })
}

// ============================================================================
// Gunnery
// ============================================================================

/// Resolves battery fire from `attackers` against `defenders`.
pub fn shooting_phase(attackers: &[Ship], defenders: &mut [Ship], ctx: &mut PhaseContext<'_>) {
    for ship in attackers.iter().filter(|ship| !ship.is_destroyed()) {
        let Some((target_index, batteries)) = acquire_target(ship, defenders) else {
            tracing::trace!(ship = %ship.name, "no target in arc and range");
            continue;
        };
        let target = &mut defenders[target_index];

        for battery in batteries.into_iter().map(|i| &ship.weapons.batteries[i]) {
            let attack =
                signed(ctx.dice.roll_dice(&ATTACK_ROLL)) + ship.attack_mod + battery.accuracy;
            let defense = target.shield + target.defense_mod;
            if attack <= defense {
                ctx.narrator.narrate(&BattleEvent::WeaponMiss {
                    attacker: ship.name.clone(),
                    target: target.name.clone(),
                    battery: battery.name.clone(),
                });
                continue;
            }

            let damage = ctx.dice.roll_dice(&battery.damage_dice);
            let destroyed = target.take_damage(damage);
            ctx.narrator.narrate(&BattleEvent::WeaponHit {
                attacker: ship.name.clone(),
                target: target.name.clone(),
                battery: battery.name.clone(),
                damage,
                hull: target.hull,
            });
            if destroyed {
                ctx.narrator.narrate(&BattleEvent::ShipDestroyed {
                    ship: target.name.clone(),
                    cause: DestructionCause::Gunfire,
                });
                break;
            }
        }
    }
}

/// Resolver for battery fire.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShootingResolver;

impl Resolver for ShootingResolver {
    fn phase(&self) -> Phase {
        Phase::Shooting
    }

    fn resolve(&self, fleets: &mut Fleets, ctx: &mut PhaseContext<'_>) {
        each_engagement(fleets, |attackers, defenders| {
            shooting_phase(attackers, defenders, ctx);
        });
    }
}

// ============================================================================
// Missiles
// ============================================================================

/// Resolves missile launches from `attackers` against `defenders`.
///
/// A missile is only spent when a target is in reach.
pub fn missile_phase(attackers: &mut [Ship], defenders: &mut [Ship], ctx: &mut PhaseContext<'_>) {
    for ship in attackers.iter_mut() {
        if ship.is_destroyed() || ship.weapons.missiles == 0 {
            continue;
        }
        let Some(target_index) = nearest_live_target(ship, defenders) else {
            continue;
        };
        let target = &mut defenders[target_index];
        if !in_range(ship, target, MISSILE_RANGE) {
            continue;
        }

        ship.weapons.expend_missile();
        let damage = ctx.dice.roll_dice(&MISSILE_DAMAGE);
        let destroyed = target.take_damage(damage);
        ctx.narrator.narrate(&BattleEvent::MissileHit {
            attacker: ship.name.clone(),
            target: target.name.clone(),
            damage,
            hull: target.hull,
        });
        if destroyed {
            ctx.narrator.narrate(&BattleEvent::ShipDestroyed {
                ship: target.name.clone(),
                cause: DestructionCause::Missile,
            });
        }
    }
}

/// Resolver for missile launches.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissileResolver;

impl Resolver for MissileResolver {
    fn phase(&self) -> Phase {
        Phase::Missiles
    }

    fn resolve(&self, fleets: &mut Fleets, ctx: &mut PhaseContext<'_>) {
        each_engagement(fleets, |attackers, defenders| {
            missile_phase(attackers, defenders, ctx);
        });
    }
}

// ============================================================================
// Boarding
// ============================================================================

/// Resolves boarding attempts from `attackers` against `defenders`.
///
/// The boarding chance is drawn before looking for a target, so a ship with
/// nobody at point range still spends its attempt.
pub fn boarding_phase(attackers: &[Ship], defenders: &mut [Ship], ctx: &mut PhaseContext<'_>) {
    for ship in attackers.iter().filter(|ship| !ship.is_destroyed()) {
        if !ctx.dice.chance(BOARDING_CHANCE) {
            continue;
        }
        let Some(target_index) = nearest_live_target(ship, defenders) else {
            continue;
        };
        let target = &mut defenders[target_index];
        if !in_range(ship, target, BOARDING_RANGE) {
            continue;
        }

        let attack =
            signed(ctx.dice.roll_dice(&BOARDING_ROLL)) + ship.boarding_strength + ship.attack_mod;
        let defense = target.boarding_strength + target.defense_mod;
        if attack <= defense {
            ctx.narrator.narrate(&BattleEvent::BoardingRepelled {
                attacker: ship.name.clone(),
                target: target.name.clone(),
            });
            continue;
        }

        let damage = ctx.dice.roll_dice(&BOARDING_DAMAGE);
        let destroyed = target.take_damage(damage);
        ctx.narrator.narrate(&BattleEvent::BoardingSucceeded {
            attacker: ship.name.clone(),
            target: target.name.clone(),
            damage,
            hull: target.hull,
        });
        if destroyed {
            ctx.narrator.narrate(&BattleEvent::ShipDestroyed {
                ship: target.name.clone(),
                cause: DestructionCause::Boarding,
            });
        }
    }
}

/// Resolver for boarding actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoardingResolver;

impl Resolver for BoardingResolver {
    fn phase(&self) -> Phase {
        Phase::Boarding
    }

    fn resolve(&self, fleets: &mut Fleets, ctx: &mut PhaseContext<'_>) {
        each_engagement(fleets, |attackers, defenders| {
            boarding_phase(attackers, defenders, ctx);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::WeaponBattery;
    use crate::fleet::Fleet;
    use crate::geometry::FiringArc;
    use crate::narration::EventLog;
    use crate::tests::helpers::{dummy_ship, ship_at, ScriptedDice};
    use glam::DVec3;

    fn omni(name: &str, dice: &str) -> WeaponBattery {
        WeaponBattery::new(name, 1)
            .with_arc(FiringArc::Omni)
            .with_range(RangeBand::Long)
            .with_damage(dice.parse().unwrap())
    }

    mod targeting_tests {
        use super::*;

        #[test]
        fn nearest_skips_destroyed_and_prefers_first_on_tie() {
            let shooter = dummy_ship("s");
            let mut dead = ship_at("dead", DVec3::new(1.0, 0.0, 0.0));
            dead.hull = 0;
            let defenders = vec![
                dead,
                ship_at("east", DVec3::new(3.0, 0.0, 0.0)),
                ship_at("west", DVec3::new(-3.0, 0.0, 0.0)),
            ];
            assert_eq!(nearest_live_target(&shooter, &defenders), Some(1));
            assert_eq!(nearest_live_target(&shooter, &[]), None);
        }

        #[test]
        fn acquisition_falls_through_to_reachable_target() {
            // Fore battery only: the nearer ship astern is out of arc.
            let shooter = Ship::builder("s")
                .battery(WeaponBattery::new("Fore", 1).with_range(RangeBand::Long))
                .build();
            let defenders = vec![
                ship_at("behind", DVec3::new(-2.0, 0.0, 0.0)),
                ship_at("ahead", DVec3::new(15.0, 0.0, 0.0)),
            ];
            let (index, batteries) = acquire_target(&shooter, &defenders).unwrap();
            assert_eq!(index, 1);
            assert_eq!(batteries, vec![0]);
        }

        #[test]
        fn no_target_when_out_of_range() {
            let shooter = Ship::builder("s")
                .battery(WeaponBattery::new("Short", 1).with_range(RangeBand::Short))
                .build();
            let defenders = vec![ship_at("far", DVec3::new(30.0, 0.0, 0.0))];
            assert!(acquire_target(&shooter, &defenders).is_none());
        }
    }

    mod shooting_tests {
        use super::*;

        #[test]
        fn hit_requires_strictly_greater_roll() {
            let attacker = Ship::builder("A").battery(omni("Gun", "1d6")).build();
            let mut defenders = vec![Ship::builder("B").hull(20).shield(10).build()];
            // 10 vs shield 10 misses; 11 hits for 4.
            let mut dice = ScriptedDice::new().with_rolls([10, 11, 4]);
            let mut log = EventLog::new();
            {
                let mut ctx = PhaseContext::new(&mut dice, &mut log);
                shooting_phase(std::slice::from_ref(&attacker), &mut defenders, &mut ctx);
                shooting_phase(std::slice::from_ref(&attacker), &mut defenders, &mut ctx);
            }
            assert_eq!(defenders[0].hull, 16);
            assert_eq!(
                dice.rolled(),
                [DiceExpr::new(2, 20), DiceExpr::new(2, 20), DiceExpr::new(1, 6)]
            );
            assert_eq!(
                log.lines(),
                vec!["A misses B with Gun", "A hits B with Gun for 4 (hull 16)"]
            );
        }

        #[test]
        fn modifiers_apply_to_both_sides() {
            let mut attacker = Ship::builder("A")
                .battery(omni("Gun", "1d6").with_accuracy(1))
                .build();
            attacker.attack_mod = 2;
            let mut target = Ship::builder("B").hull(20).shield(12).build();
            target.defense_mod = 1;
            let mut defenders = vec![target];
            // 11 + 2 + 1 = 14 > 13.
            let mut dice = ScriptedDice::new().with_rolls([11, 3]);
            let mut log = EventLog::new();
            shooting_phase(
                std::slice::from_ref(&attacker),
                &mut defenders,
                &mut PhaseContext::new(&mut dice, &mut log),
            );
            assert_eq!(defenders[0].hull, 17);
        }

        #[test]
        fn fire_stops_when_target_destroyed() {
            let attacker = Ship::builder("A")
                .battery(omni("First", "1d6"))
                .battery(omni("Second", "1d6"))
                .build();
            let mut defenders = vec![Ship::builder("B").hull(5).shield(0).build()];
            let mut dice = ScriptedDice::new().with_rolls([20, 6]);
            let mut log = EventLog::new();
            shooting_phase(
                std::slice::from_ref(&attacker),
                &mut defenders,
                &mut PhaseContext::new(&mut dice, &mut log),
            );
            assert!(defenders[0].is_destroyed());
            assert_eq!(
                log.lines(),
                vec!["A hits B with First for 6 (hull 0)", "B destroyed!"]
            );
            assert!(dice.is_exhausted());
        }

        #[test]
        fn destroyed_attackers_hold_fire() {
            let mut attacker = Ship::builder("A").battery(omni("Gun", "1d6")).build();
            attacker.hull = 0;
            let mut defenders = vec![dummy_ship("B")];
            let mut dice = ScriptedDice::new();
            let mut log = EventLog::new();
            shooting_phase(
                std::slice::from_ref(&attacker),
                &mut defenders,
                &mut PhaseContext::new(&mut dice, &mut log),
            );
            assert!(log.is_empty());
        }

        #[test]
        fn resolver_lets_b_return_fire_only_if_alive() {
            let a = Ship::builder("A").hull(5).shield(0).battery(omni("Gun", "1d6")).build();
            let b = Ship::builder("B").hull(5).shield(0).battery(omni("Gun", "1d6")).build();
            let mut fleets = Fleets::new(Fleet::new("A", vec![a]), Fleet::new("B", vec![b]));
            let mut dice = ScriptedDice::new().with_rolls([30, 6]);
            let mut log = EventLog::new();
            ShootingResolver.resolve(&mut fleets, &mut PhaseContext::new(&mut dice, &mut log));
            assert!(fleets.b.ships[0].is_destroyed());
            assert_eq!(fleets.a.ships[0].hull, 5);
        }
    }

    mod missile_tests {
        use super::*;

        #[test]
        fn missile_strikes_nearest_in_range() {
            let mut attackers = vec![Ship::builder("A").missiles(2).build()];
            let mut defenders = vec![
                ship_at("far", DVec3::new(30.0, 0.0, 0.0)),
                ship_at("near", DVec3::new(0.0, 20.0, 0.0)),
            ];
            defenders[1].hull = 30;
            let mut dice = ScriptedDice::new().with_rolls([12]);
            let mut log = EventLog::new();
            missile_phase(
                &mut attackers,
                &mut defenders,
                &mut PhaseContext::new(&mut dice, &mut log),
            );
            assert_eq!(attackers[0].weapons.missiles, 1);
            assert_eq!(dice.rolled(), [DiceExpr::new(3, 6)]);
            assert_eq!(defenders[1].hull, 18);
            assert_eq!(log.lines(), vec!["A launches missile at near for 12 (hull 18)"]);
        }

        #[test]
        fn missile_not_spent_out_of_range() {
            let mut attackers = vec![Ship::builder("A").missiles(1).build()];
            let mut defenders = vec![ship_at("far", DVec3::new(41.0, 0.0, 0.0))];
            let mut dice = ScriptedDice::new();
            let mut log = EventLog::new();
            missile_phase(
                &mut attackers,
                &mut defenders,
                &mut PhaseContext::new(&mut dice, &mut log),
            );
            assert_eq!(attackers[0].weapons.missiles, 1);
            assert!(log.is_empty());
        }

        #[test]
        fn empty_magazine_never_fires() {
            let mut attackers = vec![Ship::builder("A").missiles(0).build()];
            let mut defenders = vec![dummy_ship("B")];
            let mut dice = ScriptedDice::new();
            let mut log = EventLog::new();
            missile_phase(
                &mut attackers,
                &mut defenders,
                &mut PhaseContext::new(&mut dice, &mut log),
            );
            assert!(log.is_empty());
        }

        #[test]
        fn missile_kill_is_announced() {
            let mut attackers = vec![Ship::builder("A").missiles(1).build()];
            let mut defenders = vec![Ship::builder("B").hull(3).build()];
            let mut dice = ScriptedDice::new().with_rolls([9]);
            let mut log = EventLog::new();
            missile_phase(
                &mut attackers,
                &mut defenders,
                &mut PhaseContext::new(&mut dice, &mut log),
            );
            assert_eq!(log.lines()[1], "B destroyed by missile!");
        }
    }

    mod boarding_tests {
        use super::*;

        fn boarder() -> Ship {
            Ship::builder("A").boarding_strength(3).build()
        }

        #[test]
        fn successful_boarding() {
            let mut defenders = vec![Ship::builder("B").hull(20).boarding_strength(5).build()];
            // 3 + 3 = 6 > 5.
            let mut dice = ScriptedDice::new().with_chances([true]).with_rolls([3, 7]);
            let mut log = EventLog::new();
            boarding_phase(
                &[boarder()],
                &mut defenders,
                &mut PhaseContext::new(&mut dice, &mut log),
            );
            assert_eq!(defenders[0].hull, 13);
            assert_eq!(dice.asked(), [0.20]);
            assert_eq!(dice.rolled(), [DiceExpr::new(1, 20), DiceExpr::new(1, 10)]);
            assert_eq!(log.lines(), vec!["A boards B for 7 damage (hull 13)"]);
        }

        #[test]
        fn tie_is_repelled() {
            let mut defenders = vec![Ship::builder("B").boarding_strength(5).build()];
            let mut dice = ScriptedDice::new().with_chances([true]).with_rolls([2]);
            let mut log = EventLog::new();
            boarding_phase(
                &[boarder()],
                &mut defenders,
                &mut PhaseContext::new(&mut dice, &mut log),
            );
            assert_eq!(log.lines(), vec!["A fails to board B"]);
        }

        #[test]
        fn chance_consumed_even_out_of_reach() {
            let mut defenders = vec![ship_at("far", DVec3::new(6.0, 0.0, 0.0))];
            let mut dice = ScriptedDice::new().with_chances([true]);
            let mut log = EventLog::new();
            boarding_phase(
                &[boarder()],
                &mut defenders,
                &mut PhaseContext::new(&mut dice, &mut log),
            );
            assert!(log.is_empty());
            assert!(dice.is_exhausted());
            assert_eq!(dice.asked(), [0.20]);
        }

        #[test]
        fn boarding_kill_is_announced() {
            let mut defenders = vec![Ship::builder("B").hull(2).boarding_strength(0).build()];
            let mut dice = ScriptedDice::new().with_chances([true]).with_rolls([10, 5]);
            let mut log = EventLog::new();
            boarding_phase(
                &[boarder()],
                &mut defenders,
                &mut PhaseContext::new(&mut dice, &mut log),
            );
            assert_eq!(log.lines()[1], "B captured and destroyed!");
        }
    }
}
