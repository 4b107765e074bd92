//! Fleets: the two sides of a battle.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::Ship;

/// Which side of the battle a fleet fights on.
///
/// Side A always acts first within a phase.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// First fleet.
    A,
    /// Second fleet.
    B,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// A named, ordered group of ships.
///
/// `ships` holds the ships still in the fight, in roster order. Destroyed
/// ships are moved to the wreck list by [`prune_destroyed`](Self::prune_destroyed)
/// so the final report can still account for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    /// Fleet name.
    pub name: String,
    /// Ships still in the fight.
    pub ships: Vec<Ship>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    wrecks: Vec<Ship>,
}

impl Fleet {
    /// Creates a fleet from a roster.
    #[must_use]
    pub fn new(name: impl Into<String>, ships: Vec<Ship>) -> Self {
        Self {
            name: name.into(),
            ships,
            wrecks: Vec::new(),
        }
    }

    /// Returns true if no ship in the fleet can still act.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.ships.iter().all(Ship::is_destroyed)
    }

    /// Number of ships that can still act.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.ships.iter().filter(|ship| !ship.is_destroyed()).count()
    }

    /// Destroyed ships removed so far, in the order they were removed.
    #[must_use]
    pub fn wrecks(&self) -> &[Ship] {
        &self.wrecks
    }

    /// Moves destroyed ships to the wreck list, keeping survivors in order.
    ///
    /// Returns how many ships were removed.
    pub fn prune_destroyed(&mut self) -> usize {
        let (wrecked, alive): (Vec<Ship>, Vec<Ship>) = std::mem::take(&mut self.ships)
            .into_iter()
            .partition(Ship::is_destroyed);
        self.ships = alive;
        let pruned = wrecked.len();
        self.wrecks.extend(wrecked);
        pruned
    }

    /// Every ship in the fleet: survivors first, then wrecks.
    pub fn all_ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter().chain(self.wrecks.iter())
    }
}

/// Both sides of a battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fleets {
    /// Side A.
    pub a: Fleet,
    /// Side B.
    pub b: Fleet,
}

impl Fleets {
    /// Pairs two fleets.
    #[must_use]
    pub fn new(a: Fleet, b: Fleet) -> Self {
        Self { a, b }
    }

    /// The fleet on `side`.
    #[must_use]
    pub fn fleet(&self, side: Side) -> &Fleet {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    /// All ships in the fight, side A first.
    pub fn ships(&self) -> impl Iterator<Item = &Ship> {
        self.a.ships.iter().chain(self.b.ships.iter())
    }

    /// All ships in the fight, side A first, mutably.
    pub fn ships_mut(&mut self) -> impl Iterator<Item = &mut Ship> {
        self.a.ships.iter_mut().chain(self.b.ships.iter_mut())
    }

    /// Attacker and defender rosters for `attacker`'s turn in a phase.
    pub fn engagement(&mut self, attacker: Side) -> (&mut [Ship], &mut [Ship]) {
        match attacker {
            Side::A => (self.a.ships.as_mut_slice(), self.b.ships.as_mut_slice()),
            Side::B => (self.b.ships.as_mut_slice(), self.a.ships.as_mut_slice()),
        }
    }

    /// Returns true once either side has nothing left that can act.
    #[must_use]
    pub fn either_defeated(&self) -> bool {
        self.a.is_defeated() || self.b.is_defeated()
    }

    /// Prunes destroyed ships from both fleets; returns the total removed.
    pub fn prune_destroyed(&mut self) -> usize {
        self.a.prune_destroyed() + self.b.prune_destroyed()
    }
}
