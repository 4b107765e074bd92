//! End-of-battle summary.

use std::fmt;

use serde::Serialize;

use crate::entity::Ship;
use crate::fleet::{Fleets, Side};

/// How the battle ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// The other side has no ships left.
    Victory(Side),
    /// Neither side has ships left.
    MutualDestruction,
    /// The round limit was reached with both sides still fighting.
    Undecided,
}

impl Outcome {
    /// Determines the outcome from the current fleets.
    #[must_use]
    pub fn from_fleets(fleets: &Fleets) -> Self {
        match (fleets.a.is_defeated(), fleets.b.is_defeated()) {
            (true, true) => Self::MutualDestruction,
            (false, true) => Self::Victory(Side::A),
            (true, false) => Self::Victory(Side::B),
            (false, false) => Self::Undecided,
        }
    }

    /// The winning side, if any.
    #[must_use]
    pub fn winner(self) -> Option<Side> {
        match self {
            Self::Victory(side) => Some(side),
            Self::MutualDestruction | Self::Undecided => None,
        }
    }
}

/// Final state of one ship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipStatus {
    /// Side the ship fought on.
    pub side: Side,
    /// Ship name.
    pub name: String,
    /// Class label.
    pub class_name: String,
    /// Remaining hull.
    pub hull: u32,
    /// Missiles left in the magazine.
    pub missiles: u32,
}

impl ShipStatus {
    fn new(side: Side, ship: &Ship) -> Self {
        Self {
            side,
            name: ship.name.clone(),
            class_name: ship.class_name.clone(),
            hull: ship.hull,
            missiles: ship.weapons.missiles,
        }
    }

    /// Returns true if the ship was destroyed.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.hull == 0
    }
}

impl fmt::Display for ShipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_destroyed() {
            write!(f, "{}: DESTROYED", self.name)
        } else {
            write!(f, "{}: Hull {}", self.name, self.hull)
        }
    }
}

/// Summary of a finished (or interrupted) battle.
///
/// `Display` renders the closing banner followed by one line per ship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattleReport {
    /// Rounds actually fought.
    pub rounds_fought: u32,
    /// How it ended.
    pub outcome: Outcome,
    /// Name of fleet A.
    pub fleet_a: String,
    /// Name of fleet B.
    pub fleet_b: String,
    /// Every ship, fleet A first; survivors before wrecks within a fleet.
    pub ships: Vec<ShipStatus>,
}

impl BattleReport {
    /// Builds a report from the fleets as they stand.
    #[must_use]
    pub fn from_fleets(fleets: &Fleets, rounds_fought: u32) -> Self {
        let ships = [Side::A, Side::B]
            .into_iter()
            .flat_map(|side| {
                fleets
                    .fleet(side)
                    .all_ships()
                    .map(move |ship| ShipStatus::new(side, ship))
            })
            .collect();
        Self {
            rounds_fought,
            outcome: Outcome::from_fleets(fleets),
            fleet_a: fleets.a.name.clone(),
            fleet_b: fleets.b.name.clone(),
            ships,
        }
    }

    /// Ships still afloat.
    pub fn survivors(&self) -> impl Iterator<Item = &ShipStatus> {
        self.ships.iter().filter(|ship| !ship.is_destroyed())
    }

    /// Name of the winning fleet, if any.
    #[must_use]
    pub fn winner_name(&self) -> Option<&str> {
        self.outcome.winner().map(|side| match side {
            Side::A => self.fleet_a.as_str(),
            Side::B => self.fleet_b.as_str(),
        })
    }
}

impl fmt::Display for BattleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Battle Over ---")?;
        for ship in &self.ships {
            writeln!(f, "{ship}")?;
        }
        match self.outcome {
            Outcome::Victory(_) => {
                let winner = self.winner_name().unwrap_or_default();
                write!(f, "{winner} is victorious after {} rounds", self.rounds_fought)
            }
            Outcome::MutualDestruction => write!(f, "Both fleets destroyed"),
            Outcome::Undecided => write!(
                f,
                "No victor after {} rounds",
                self.rounds_fought
            ),
        }
    }
}
