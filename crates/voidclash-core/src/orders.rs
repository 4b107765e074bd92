//! Battle orders and environmental hazards.
//!
//! At the start of every round each ship draws one [`Order`] uniformly from
//! [`Order::ALL`]; the order sets the ship's attack and defence modifiers for
//! the round. Then every ship that carries subsystems may run into a
//! [`Hazard`] with probability [`HAZARD_CHANCE`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dice::DiceExpr;
use crate::entity::Ship;
use crate::error::ParseNameError;
use crate::narration::{BattleEvent, DestructionCause};
use crate::resolver::PhaseContext;

/// Probability that a ship with subsystems meets a hazard each round.
pub const HAZARD_CHANCE: f64 = 0.10;

/// Efficiency lost by the subsystem hit by [`Hazard::SystemFailure`].
pub const SYSTEM_FAILURE_DAMAGE: u32 = 10;

/// Efficiency lost by every subsystem in a [`Hazard::RadiationBurst`].
pub const RADIATION_DAMAGE: u32 = 5;

/// Damage dice for [`Hazard::Minefield`].
pub const MINE_DAMAGE: DiceExpr = DiceExpr::D6;

// ============================================================================
// Orders
// ============================================================================

/// A tactical order for one round.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    /// Defence +2.
    #[serde(rename = "Brace for Impact")]
    BraceForImpact,
    /// Attack +2.
    #[serde(rename = "Lock On")]
    LockOn,
    /// Defence +1.
    #[serde(rename = "All Power to Shields")]
    AllPowerToShields,
    /// No modifiers.
    #[serde(rename = "Reload Ordnance")]
    ReloadOrdnance,
    /// No modifiers.
    #[serde(rename = "Boarding Party")]
    BoardingParty,
    /// Attack +1.
    #[serde(rename = "Fire Everything")]
    FireEverything,
    /// Defence +1 and guaranteed repairs.
    #[serde(rename = "Combat Repairs")]
    CombatRepairs,
    /// Attack -2, defence +1.
    #[serde(rename = "Disengage")]
    Disengage,
    /// Attack +1, defence -1.
    #[serde(rename = "Offensive Maneuvers")]
    OffensiveManeuvers,
    /// Attack -1, defence +1.
    #[serde(rename = "Run Silent")]
    RunSilent,
}

/// Modifiers an order applies for the round.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct OrderEffect {
    /// Added to attack rolls.
    pub attack_mod: i32,
    /// Added to the defence threshold.
    pub defense_mod: i32,
    /// Whether damaged subsystems are always repaired.
    pub repair_priority: bool,
}

impl Order {
    /// The order catalog, in draw order.
    pub const ALL: [Self; 10] = [
        Self::BraceForImpact,
        Self::LockOn,
        Self::AllPowerToShields,
        Self::ReloadOrdnance,
        Self::BoardingParty,
        Self::FireEverything,
        Self::CombatRepairs,
        Self::Disengage,
        Self::OffensiveManeuvers,
        Self::RunSilent,
    ];

    /// Modifiers this order grants.
    #[must_use]
    pub const fn effect(self) -> OrderEffect {
        let (attack_mod, defense_mod, repair_priority) = match self {
            Self::BraceForImpact => (0, 2, false),
            Self::LockOn => (2, 0, false),
            Self::AllPowerToShields => (0, 1, false),
            Self::ReloadOrdnance | Self::BoardingParty => (0, 0, false),
            Self::FireEverything => (1, 0, false),
            Self::CombatRepairs => (0, 1, true),
            Self::Disengage => (-2, 1, false),
            Self::OffensiveManeuvers => (1, -1, false),
            Self::RunSilent => (-1, 1, false),
        };
        OrderEffect {
            attack_mod,
            defense_mod,
            repair_priority,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BraceForImpact => "Brace for Impact",
            Self::LockOn => "Lock On",
            Self::AllPowerToShields => "All Power to Shields",
            Self::ReloadOrdnance => "Reload Ordnance",
            Self::BoardingParty => "Boarding Party",
            Self::FireEverything => "Fire Everything",
            Self::CombatRepairs => "Combat Repairs",
            Self::Disengage => "Disengage",
            Self::OffensiveManeuvers => "Offensive Maneuvers",
            Self::RunSilent => "Run Silent",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Order {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseNameError {
                kind: "order",
                value: s.to_string(),
            })
    }
}

/// Gives `ship` a fresh `order`, replacing last round's modifiers.
pub fn apply_order(ship: &mut Ship, order: Order) {
    let effect = order.effect();
    ship.reset_modifiers();
    ship.order = Some(order);
    ship.attack_mod += effect.attack_mod;
    ship.defense_mod += effect.defense_mod;
    ship.repair_priority = effect.repair_priority;
}

/// Draws an order for every ship that is still in the fight.
pub fn select_orders<'a>(
    ships: impl IntoIterator<Item = &'a mut Ship>,
    ctx: &mut PhaseContext<'_>,
) {
    for ship in ships {
        if ship.is_destroyed() {
            continue;
        }
        let order = Order::ALL[ctx.dice.pick(Order::ALL.len())];
        apply_order(ship, order);
        ctx.narrator.narrate(&BattleEvent::OrderSelected {
            ship: ship.name.clone(),
            order,
        });
    }
}

// ============================================================================
// Hazards
// ============================================================================

/// An environmental hazard.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hazard {
    /// One random subsystem loses efficiency.
    SystemFailure,
    /// Attack and defence -1.
    GravityWell,
    /// Hull damage.
    Minefield,
    /// Attack -1.
    Nebula,
    /// Every subsystem loses efficiency.
    RadiationBurst,
}

impl Hazard {
    /// The hazard catalog, in draw order.
    pub const ALL: [Self; 5] = [
        Self::SystemFailure,
        Self::GravityWell,
        Self::Minefield,
        Self::Nebula,
        Self::RadiationBurst,
    ];

    /// Display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SystemFailure => "System Failure",
            Self::GravityWell => "Gravity Well",
            Self::Minefield => "Minefield",
            Self::Nebula => "Nebula",
            Self::RadiationBurst => "Radiation Burst",
        }
    }

    /// Flavour text describing the hazard.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::SystemFailure => "Random system takes damage",
            Self::GravityWell => "Attack and defense rolls suffer -1",
            Self::Minefield => "Ship suffers explosive hull damage",
            Self::Nebula => "Sensors obscured, -1 attack",
            Self::RadiationBurst => "All systems lose efficiency",
        }
    }
}

impl fmt::Display for Hazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rolls for a hazard on every live ship that has subsystems.
///
/// Ships without subsystems never draw, so they consume no randomness here.
pub fn resolve_hazards<'a>(
    ships: impl IntoIterator<Item = &'a mut Ship>,
    ctx: &mut PhaseContext<'_>,
) {
    for ship in ships {
        if ship.is_destroyed() || ship.systems.is_empty() {
            continue;
        }
        if !ctx.dice.chance(HAZARD_CHANCE) {
            continue;
        }
        let hazard = Hazard::ALL[ctx.dice.pick(Hazard::ALL.len())];
        ctx.narrator.narrate(&BattleEvent::HazardEncountered {
            ship: ship.name.clone(),
            hazard,
        });
        apply_hazard(ship, hazard, ctx);
    }
}

/// Applies the effect of `hazard` to `ship`.
///
/// A system failure on a ship with no subsystems does nothing.
pub fn apply_hazard(ship: &mut Ship, hazard: Hazard, ctx: &mut PhaseContext<'_>) {
    match hazard {
        Hazard::SystemFailure => {
            if ship.systems.is_empty() {
                return;
            }
            let index = ctx.dice.pick(ship.systems.len());
            if let Some((name, system)) = ship.systems.iter_mut().nth(index) {
                system.damage(SYSTEM_FAILURE_DAMAGE);
                ctx.narrator.narrate(&BattleEvent::SystemFailure {
                    ship: ship.name.clone(),
                    subsystem: name.clone(),
                    efficiency: system.efficiency,
                });
            }
        }
        Hazard::GravityWell => {
            ship.attack_mod -= 1;
            ship.defense_mod -= 1;
            ctx.narrator.narrate(&BattleEvent::GravityWell {
                ship: ship.name.clone(),
            });
        }
        Hazard::Minefield => {
            let damage = ctx.dice.roll_dice(&MINE_DAMAGE);
            let destroyed = ship.take_damage(damage);
            ctx.narrator.narrate(&BattleEvent::MineStrike {
                ship: ship.name.clone(),
                damage,
                hull: ship.hull,
            });
            if destroyed {
                ctx.narrator.narrate(&BattleEvent::ShipDestroyed {
                    ship: ship.name.clone(),
                    cause: DestructionCause::Mine,
                });
            }
        }
        Hazard::Nebula => {
            ship.attack_mod -= 1;
            ctx.narrator.narrate(&BattleEvent::NebulaEntered {
                ship: ship.name.clone(),
            });
        }
        Hazard::RadiationBurst => {
            for system in ship.systems.values_mut() {
                system.damage(RADIATION_DAMAGE);
            }
            ctx.narrator.narrate(&BattleEvent::RadiationBurst {
                ship: ship.name.clone(),
            });
        }
    }
}
