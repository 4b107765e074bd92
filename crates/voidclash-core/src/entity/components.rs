//! Ship components: subsystems and weapon batteries.
//!
//! These are owned by a [`Ship`](super::Ship) and mutated in place by the
//! hazard, combat and repair phases.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dice::DiceExpr;
use crate::geometry::{FiringArc, RangeBand};

/// Highest efficiency a subsystem can reach.
pub const MAX_EFFICIENCY: u32 = 100;

/// Default efficiency below which a subsystem counts as degraded.
pub const DEFAULT_CRITICAL_THRESHOLD: u32 = 50;

// =============================================================================
// Subsystems
// =============================================================================

/// Operating state of a [`Subsystem`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SubsystemStatus {
    /// Working at or above its critical threshold.
    #[default]
    Operational,
    /// Below its critical threshold.
    Degraded,
    /// Efficiency reached zero. Cannot be repaired in battle.
    Offline,
}

impl fmt::Display for SubsystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operational => write!(f, "Operational"),
            Self::Degraded => write!(f, "Degraded"),
            Self::Offline => write!(f, "Offline"),
        }
    }
}

/// A ship subsystem such as engines, shields or a reactor.
///
/// # Invariants
///
/// - `efficiency` is always in `0..=100`
/// - `efficiency == 0` implies [`SubsystemStatus::Offline`]
/// - an offline subsystem ignores [`repair`](Self::repair)
///
/// # Example
///
/// ```
/// use voidclash_core::entity::{Subsystem, SubsystemStatus};
///
/// let mut engines = Subsystem::new(60, 50);
/// engines.damage(20);
/// assert_eq!(engines.status, SubsystemStatus::Degraded);
///
/// engines.repair(10);
/// assert_eq!(engines.efficiency, 50);
/// assert_eq!(engines.status, SubsystemStatus::Operational);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SubsystemRecord")]
pub struct Subsystem {
    /// Current operating state.
    pub status: SubsystemStatus,
    /// Current efficiency, `0..=100`.
    pub efficiency: u32,
    /// Efficiency below which the subsystem is degraded.
    pub critical_threshold: u32,
    /// Display-only description of what failure means for the ship.
    pub effect: String,
}

impl Subsystem {
    /// Creates a subsystem whose status is derived from `efficiency`.
    ///
    /// Both values are clamped to `0..=100`.
    #[must_use]
    pub fn new(efficiency: u32, critical_threshold: u32) -> Self {
        let efficiency = efficiency.min(MAX_EFFICIENCY);
        let critical_threshold = critical_threshold.min(MAX_EFFICIENCY);
        let status = if efficiency == 0 {
            SubsystemStatus::Offline
        } else if efficiency < critical_threshold {
            SubsystemStatus::Degraded
        } else {
            SubsystemStatus::Operational
        };
        Self {
            status,
            efficiency,
            critical_threshold,
            effect: String::new(),
        }
    }

    /// Sets the display-only effect description.
    #[must_use]
    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.effect = effect.into();
        self
    }

    /// Lowers efficiency by `amount` (floored at 0).
    ///
    /// Reaching zero takes the subsystem offline; dropping below the critical
    /// threshold degrades it. Damage never promotes a subsystem back to
    /// operational.
    pub fn damage(&mut self, amount: u32) {
        self.efficiency = self.efficiency.saturating_sub(amount);
        if self.efficiency == 0 {
            self.status = SubsystemStatus::Offline;
        } else if self.efficiency < self.critical_threshold {
            self.status = SubsystemStatus::Degraded;
        }
    }

    /// Raises efficiency by `amount` (capped at 100) unless offline.
    ///
    /// Returns `false` if the subsystem was offline and nothing changed.
    /// Repair only ever promotes to operational; it never sets degraded.
    pub fn repair(&mut self, amount: u32) -> bool {
        if self.is_offline() {
            return false;
        }
        self.efficiency = self.efficiency.saturating_add(amount).min(MAX_EFFICIENCY);
        if self.efficiency >= self.critical_threshold {
            self.status = SubsystemStatus::Operational;
        }
        true
    }

    /// Returns `true` if the subsystem is operational.
    #[must_use]
    pub fn is_operational(&self) -> bool {
        self.status == SubsystemStatus::Operational
    }

    /// Returns `true` if the subsystem is offline.
    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.status == SubsystemStatus::Offline
    }
}

impl Default for Subsystem {
    fn default() -> Self {
        Self::new(MAX_EFFICIENCY, DEFAULT_CRITICAL_THRESHOLD)
    }
}

/// Wire form of a subsystem; status is always re-derived on load.
#[derive(Deserialize)]
struct SubsystemRecord {
    #[serde(default = "default_efficiency")]
    efficiency: u32,
    #[serde(default = "default_threshold")]
    critical_threshold: u32,
    #[serde(default)]
    effect: String,
}

fn default_efficiency() -> u32 {
    MAX_EFFICIENCY
}

fn default_threshold() -> u32 {
    DEFAULT_CRITICAL_THRESHOLD
}

impl From<SubsystemRecord> for Subsystem {
    fn from(record: SubsystemRecord) -> Self {
        Self::new(record.efficiency, record.critical_threshold).with_effect(record.effect)
    }
}

// =============================================================================
// Weapons
// =============================================================================

/// A named weapon emplacement with its own arc, range and damage profile.
///
/// `rating` only feeds [`WeaponSystem::rating`]; it plays no part in
/// resolution. `special` is carried for display and is not resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponBattery {
    /// Display name.
    pub name: String,
    /// Contribution to the aggregate weapon rating.
    pub rating: u32,
    /// Added to the gunnery attack roll.
    #[serde(default)]
    pub accuracy: i32,
    /// Firing arc.
    #[serde(default)]
    pub arc: FiringArc,
    /// Damage rolled on a hit.
    #[serde(default = "default_damage_dice")]
    pub damage_dice: DiceExpr,
    /// Maximum engagement band.
    #[serde(default)]
    pub range: RangeBand,
    /// Optional tag such as `"area"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<String>,
}

fn default_damage_dice() -> DiceExpr {
    DiceExpr::D6
}

impl WeaponBattery {
    /// Creates a fore-arc, standard-range `1d6` battery.
    #[must_use]
    pub fn new(name: impl Into<String>, rating: u32) -> Self {
        Self {
            name: name.into(),
            rating,
            accuracy: 0,
            arc: FiringArc::Fore,
            damage_dice: DiceExpr::D6,
            range: RangeBand::Standard,
            special: None,
        }
    }

    /// Sets the accuracy modifier.
    #[must_use]
    pub fn with_accuracy(mut self, accuracy: i32) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Sets the firing arc.
    #[must_use]
    pub fn with_arc(mut self, arc: FiringArc) -> Self {
        self.arc = arc;
        self
    }

    /// Sets the damage dice.
    #[must_use]
    pub fn with_damage(mut self, damage_dice: DiceExpr) -> Self {
        self.damage_dice = damage_dice;
        self
    }

    /// Sets the range band.
    #[must_use]
    pub fn with_range(mut self, range: RangeBand) -> Self {
        self.range = range;
        self
    }

    /// Sets the special tag.
    #[must_use]
    pub fn with_special(mut self, special: impl Into<String>) -> Self {
        self.special = Some(special.into());
        self
    }
}

/// Ordered batteries plus the missile magazine.
///
/// Battery order is firing order during the shooting phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponSystem {
    /// Batteries in firing order.
    #[serde(default)]
    pub batteries: Vec<WeaponBattery>,
    /// Missiles remaining.
    #[serde(default)]
    pub missiles: u32,
}

impl WeaponSystem {
    /// Creates a weapon system from batteries and a missile count.
    #[must_use]
    pub fn new(batteries: Vec<WeaponBattery>, missiles: u32) -> Self {
        Self { batteries, missiles }
    }

    /// Appends a battery after the existing ones.
    pub fn add_battery(&mut self, battery: WeaponBattery) {
        self.batteries.push(battery);
    }

    /// Aggregate rating of all batteries.
    #[must_use]
    pub fn rating(&self) -> u32 {
        self.batteries.iter().map(|b| b.rating).sum()
    }

    /// Removes one missile if any remain. Returns whether one was available.
    pub fn expend_missile(&mut self) -> bool {
        if self.missiles == 0 {
            return false;
        }
        self.missiles -= 1;
        true
    }
}
