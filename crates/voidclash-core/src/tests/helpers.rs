//! Test helper functions for setting up ships, fleets and battles.
//!
//! [`ScriptedDice`] replays a fixed script of dice totals, chance outcomes and
//! picks, so a test can force every random decision in a phase. Drawing past
//! the end of a script panics, which doubles as an assertion that a phase
//! consumed no more randomness than expected. Every requested dice expression
//! and probability is recorded, so tests can check which rule drew.

use std::collections::VecDeque;

use glam::DVec3;

use crate::battle::Battle;
use crate::dice::{DiceExpr, DiceService};
use crate::entity::{Ship, Subsystem, WeaponBattery};
use crate::fleet::Fleet;
use crate::geometry::{FiringArc, RangeBand};
use crate::narration::EventLog;

// =============================================================================
// Scripted dice
// =============================================================================

/// Dice service that returns pre-recorded results in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<u32>,
    chances: VecDeque<bool>,
    picks: VecDeque<usize>,
    rolled: Vec<DiceExpr>,
    asked: Vec<f64>,
}

impl ScriptedDice {
    /// Creates dice with empty scripts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends totals returned by successive `roll_dice` calls.
    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = u32>) -> Self {
        self.rolls.extend(rolls);
        self
    }

    /// Appends outcomes returned by successive `chance` calls.
    pub fn with_chances(mut self, chances: impl IntoIterator<Item = bool>) -> Self {
        self.chances.extend(chances);
        self
    }

    /// Appends indices returned by successive `pick` calls.
    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    /// Expressions passed to `roll_dice`, in call order.
    pub fn rolled(&self) -> &[DiceExpr] {
        &self.rolled
    }

    /// Probabilities passed to `chance`, in call order.
    pub fn asked(&self) -> &[f64] {
        &self.asked
    }

    /// Returns true once every scripted result has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.rolls.is_empty() && self.chances.is_empty() && self.picks.is_empty()
    }
}

impl DiceService for ScriptedDice {
    fn roll_dice(&mut self, expr: &DiceExpr) -> u32 {
        self.rolled.push(*expr);
        self.rolls
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted roll of {expr}"))
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.asked.push(probability);
        self.chances
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted chance of {probability}"))
    }

    fn pick(&mut self, len: usize) -> usize {
        let index = self
            .picks
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted pick among {len}"));
        assert!(index < len, "scripted pick {index} out of range for {len}");
        index
    }
}

// =============================================================================
// Ships
// =============================================================================

/// A minimal ship at the origin: no weapons, no subsystems.
pub fn dummy_ship(name: &str) -> Ship {
    Ship::builder(name).build()
}

/// A minimal ship at `position`.
pub fn ship_at(name: &str, position: DVec3) -> Ship {
    Ship::builder(name).position(position).build()
}

/// A sturdy gunship with one omni-arc long-range battery and a missile rack.
pub fn gunship(name: &str, position: DVec3) -> Ship {
    Ship::builder(name)
        .class_name("Gunship")
        .hull(30)
        .shield(15)
        .battery(
            WeaponBattery::new("Autocannon", 2)
                .with_arc(FiringArc::Omni)
                .with_range(RangeBand::Long)
                .with_damage(DiceExpr::new(2, 6)),
        )
        .missiles(2)
        .boarding_strength(2)
        .speed(5)
        .subsystem("engines", Subsystem::new(90, 50).with_effect("Engines"))
        .subsystem("shields", Subsystem::new(80, 50).with_effect("Shields"))
        .position(position)
        .build()
}

/// Two single-gunship fleets facing each other at gunnery range.
pub fn duel_fleets() -> (Fleet, Fleet) {
    let mut red = gunship("Red", DVec3::new(-8.0, 0.0, 0.0));
    red.heading = 0.0;
    let mut blue = gunship("Blue", DVec3::new(8.0, 0.0, 0.0));
    blue.heading = 180.0;
    (
        Fleet::new("Red Fleet", vec![red]),
        Fleet::new("Blue Fleet", vec![blue]),
    )
}

/// Two-ship fleets used by multi-round scenarios.
pub fn skirmish_fleets() -> (Fleet, Fleet) {
    let a = Fleet::new(
        "Coalition",
        vec![
            gunship("Vanguard", DVec3::new(-10.0, 2.0, 0.0)),
            gunship("Rearguard", DVec3::new(-14.0, -2.0, 1.0)),
        ],
    );
    let mut b_ships = vec![
        gunship("Marauder", DVec3::new(10.0, 0.0, 0.0)),
        gunship("Corsair", DVec3::new(12.0, 4.0, -1.0)),
    ];
    for ship in &mut b_ships {
        ship.heading = 180.0;
    }
    (a, Fleet::new("Syndicate", b_ships))
}

/// Builds a seeded battle over `rounds` rounds that records its events.
pub fn seeded_battle(a: Fleet, b: Fleet, seed: u64, rounds: u32) -> Battle<EventLog> {
    Battle::builder(a, b)
        .rounds(rounds)
        .seed(seed)
        .narrator(EventLog::new())
        .build()
        .expect("seeded battle builds")
}

// =============================================================================
// Assertions
// =============================================================================

/// Asserts two vectors are equal within floating-point tolerance.
#[track_caller]
pub fn assert_vec3_near(actual: DVec3, expected: DVec3) {
    assert!(
        actual.abs_diff_eq(expected, 1e-9),
        "expected {expected:?}, got {actual:?}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_dice_replays_in_order() {
        let mut dice = ScriptedDice::new()
            .with_rolls([3, 4])
            .with_chances([true])
            .with_picks([2]);
        assert_eq!(dice.roll_dice(&DiceExpr::D6), 3);
        assert!(dice.chance(0.1));
        assert_eq!(dice.pick(3), 2);
        assert!(!dice.is_exhausted());
        assert_eq!(dice.roll("1d20").unwrap(), 4);
        assert!(dice.is_exhausted());
        assert_eq!(dice.rolled(), [DiceExpr::D6, DiceExpr::D20]);
        assert_eq!(dice.asked(), [0.1]);
    }

    #[test]
    #[should_panic(expected = "unscripted chance")]
    fn scripted_dice_panics_when_exhausted() {
        let mut dice = ScriptedDice::new();
        dice.chance(0.5);
    }

    #[test]
    fn duel_fleets_face_each_other() {
        let (red, blue) = duel_fleets();
        assert_eq!(red.ships[0].heading, 0.0);
        assert_eq!(blue.ships[0].heading, 180.0);
        assert_eq!(red.ships[0].weapons.batteries.len(), 1);
    }
}
