//! Ship state model.
//!
//! - [`Ship`]: a combatant with hull, shields, weapons, subsystems and a pose
//! - [`Subsystem`]: an efficiency-tracked ship system
//! - [`WeaponBattery`] / [`WeaponSystem`]: guns and the missile magazine
//!
//! Ships are built once by whoever assembles the fleets and then mutated in
//! place for the rest of the battle. A ship is destroyed when its hull reaches
//! zero; from then on every phase ignores it, and its fleet moves it to the
//! wreck list at the end of the round.
//!
//! # Example
//!
//! ```
//! use voidclash_core::entity::{Ship, Subsystem, WeaponBattery};
//!
//! let mut ship = Ship::builder("Gadfly")
//!     .hull(12)
//!     .battery(WeaponBattery::new("Gun", 1))
//!     .subsystem("engines", Subsystem::default())
//!     .build();
//!
//! assert!(!ship.is_destroyed());
//! assert!(ship.take_damage(20));
//! assert_eq!(ship.hull, 0);
//! ```

pub mod components;

use std::collections::BTreeMap;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::orders::Order;

pub use components::{
    Subsystem, SubsystemStatus, WeaponBattery, WeaponSystem, DEFAULT_CRITICAL_THRESHOLD,
    MAX_EFFICIENCY,
};

/// A combat starship.
///
/// Stat fields are public: they are plain data consumed by the resolvers.
/// `hull` is unsigned, so it can never go negative; use
/// [`take_damage`](Self::take_damage) to reduce it.
///
/// Subsystems are keyed by name in a `BTreeMap` so that random picks over
/// them iterate in a stable order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    /// Display name, unique within a battle by convention.
    pub name: String,
    /// Class label such as "Light Cruiser".
    #[serde(default = "default_class_name")]
    pub class_name: String,
    /// Structural health; 0 means destroyed.
    pub hull: u32,
    /// Defence threshold against gunnery rolls.
    pub shield: i32,
    /// Batteries and missiles.
    #[serde(default)]
    pub weapons: WeaponSystem,
    /// Crew rating.
    #[serde(default)]
    pub crew: u32,
    /// Leadership rating.
    #[serde(default)]
    pub leadership: u32,
    /// Used on both sides of a boarding action.
    #[serde(default)]
    pub boarding_strength: i32,
    /// Distance moved per round.
    #[serde(default = "default_speed")]
    pub speed: u32,
    /// Maneuver rating.
    #[serde(default = "default_maneuver")]
    pub maneuver: u32,
    /// Subsystems by name.
    #[serde(default)]
    pub systems: BTreeMap<String, Subsystem>,
    /// Personality label; not used in resolution.
    #[serde(default)]
    pub ai: String,
    /// Order chosen this round.
    #[serde(default)]
    pub order: Option<Order>,
    /// Position in space.
    #[serde(default)]
    pub position: DVec3,
    /// Yaw in degrees.
    #[serde(default)]
    pub heading: f64,
    /// Pitch in degrees.
    #[serde(default)]
    pub pitch: f64,
    /// Attack modifier for this round.
    #[serde(default)]
    pub attack_mod: i32,
    /// Defence modifier for this round.
    #[serde(default)]
    pub defense_mod: i32,
    /// Whether repairs are guaranteed this round.
    #[serde(default)]
    pub repair_priority: bool,
}

fn default_class_name() -> String {
    "Frigate".to_string()
}

fn default_speed() -> u32 {
    20
}

fn default_maneuver() -> u32 {
    1
}

impl Ship {
    /// Starts building a ship with frigate defaults.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ShipBuilder {
        ShipBuilder::new(name)
    }

    /// Returns `true` once hull has reached zero.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.hull == 0
    }

    /// Reduces hull by `amount`, flooring at zero.
    ///
    /// Returns `true` if this call destroyed the ship.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = !self.is_destroyed();
        self.hull = self.hull.saturating_sub(amount);
        was_alive && self.is_destroyed()
    }

    /// Clears the per-round modifiers and repair priority.
    pub fn reset_modifiers(&mut self) {
        self.attack_mod = 0;
        self.defense_mod = 0;
        self.repair_priority = false;
    }

    /// Looks up a subsystem by name.
    #[must_use]
    pub fn subsystem(&self, name: &str) -> Option<&Subsystem> {
        self.systems.get(name)
    }

    /// Looks up a subsystem by name for mutation.
    #[must_use]
    pub fn subsystem_mut(&mut self, name: &str) -> Option<&mut Subsystem> {
        self.systems.get_mut(name)
    }

    /// Names of subsystems that are not operational, in key order.
    #[must_use]
    pub fn damaged_subsystems(&self) -> Vec<&str> {
        self.systems
            .iter()
            .filter(|(_, system)| !system.is_operational())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Builder for [`Ship`].
///
/// Defaults describe a minimal frigate: hull 10, shield 5, crew, leadership
/// and boarding strength 1, speed 20, maneuver 1, no weapons or subsystems,
/// at the origin facing +X.
#[derive(Debug, Clone)]
pub struct ShipBuilder {
    ship: Ship,
}

impl ShipBuilder {
    /// Creates a builder for a ship called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            ship: Ship {
                name: name.into(),
                class_name: default_class_name(),
                hull: 10,
                shield: 5,
                weapons: WeaponSystem::default(),
                crew: 1,
                leadership: 1,
                boarding_strength: 1,
                speed: default_speed(),
                maneuver: default_maneuver(),
                systems: BTreeMap::new(),
                ai: String::new(),
                order: None,
                position: DVec3::ZERO,
                heading: 0.0,
                pitch: 0.0,
                attack_mod: 0,
                defense_mod: 0,
                repair_priority: false,
            },
        }
    }

    /// Sets the class label.
    #[must_use]
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.ship.class_name = class_name.into();
        self
    }

    /// Sets hull points.
    #[must_use]
    pub fn hull(mut self, hull: u32) -> Self {
        self.ship.hull = hull;
        self
    }

    /// Sets the shield threshold.
    #[must_use]
    pub fn shield(mut self, shield: i32) -> Self {
        self.ship.shield = shield;
        self
    }

    /// Replaces the whole weapon system.
    #[must_use]
    pub fn weapons(mut self, weapons: WeaponSystem) -> Self {
        self.ship.weapons = weapons;
        self
    }

    /// Appends a battery.
    #[must_use]
    pub fn battery(mut self, battery: WeaponBattery) -> Self {
        self.ship.weapons.add_battery(battery);
        self
    }

    /// Sets the missile count.
    #[must_use]
    pub fn missiles(mut self, missiles: u32) -> Self {
        self.ship.weapons.missiles = missiles;
        self
    }

    /// Sets the crew rating.
    #[must_use]
    pub fn crew(mut self, crew: u32) -> Self {
        self.ship.crew = crew;
        self
    }

    /// Sets the leadership rating.
    #[must_use]
    pub fn leadership(mut self, leadership: u32) -> Self {
        self.ship.leadership = leadership;
        self
    }

    /// Sets the boarding strength.
    #[must_use]
    pub fn boarding_strength(mut self, boarding_strength: i32) -> Self {
        self.ship.boarding_strength = boarding_strength;
        self
    }

    /// Sets the speed.
    #[must_use]
    pub fn speed(mut self, speed: u32) -> Self {
        self.ship.speed = speed;
        self
    }

    /// Sets the maneuver rating.
    #[must_use]
    pub fn maneuver(mut self, maneuver: u32) -> Self {
        self.ship.maneuver = maneuver;
        self
    }

    /// Adds (or replaces) a named subsystem.
    #[must_use]
    pub fn subsystem(mut self, name: impl Into<String>, subsystem: Subsystem) -> Self {
        self.ship.systems.insert(name.into(), subsystem);
        self
    }

    /// Sets the personality label.
    #[must_use]
    pub fn ai(mut self, ai: impl Into<String>) -> Self {
        self.ship.ai = ai.into();
        self
    }

    /// Sets the position.
    #[must_use]
    pub fn position(mut self, position: DVec3) -> Self {
        self.ship.position = position;
        self
    }

    /// Sets heading and pitch in degrees.
    #[must_use]
    pub fn facing(mut self, heading: f64, pitch: f64) -> Self {
        self.ship.heading = heading;
        self.ship.pitch = pitch;
        self
    }

    /// Finishes the ship.
    #[must_use]
    pub fn build(self) -> Ship {
        self.ship
    }
}
