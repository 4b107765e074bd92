//! Phase resolvers.
//!
//! A battle round is a fixed pipeline of phases. Each phase is implemented by
//! a [`Resolver`] that mutates the fleets in place, drawing randomness from the
//! dice service and reporting what happened to the narrator, both reached
//! through a [`PhaseContext`].
//!
//! # Invariants
//!
//! - Ships with hull 0 never act, and are never chosen as targets
//! - Within a phase, fleet A acts before fleet B, and ships act in roster order
//! - Resolvers draw randomness only from `ctx.dice`, so a round is
//!   reproducible from the dice sequence alone
//!
//! # Available Resolvers
//!
//! - [`OrdersResolver`] and [`HazardResolver`]: round preparation
//! - [`MovementResolver`]: advance along facing
//! - [`ShootingResolver`], [`MissileResolver`], [`BoardingResolver`]: combat
//! - [`RepairResolver`]: damage control

mod combat;
mod movement;
mod repair;
mod tactical;

pub use combat::{
    boarding_phase, missile_phase, nearest_live_target, shooting_phase, BoardingResolver,
    MissileResolver, ShootingResolver, ATTACK_ROLL, BOARDING_CHANCE, BOARDING_DAMAGE,
    BOARDING_RANGE, BOARDING_ROLL, MISSILE_DAMAGE, MISSILE_RANGE,
};
pub use movement::MovementResolver;
pub use repair::{repair_phase, RepairResolver, PRIORITY_REPAIR_CHANCE, REPAIR_AMOUNT, REPAIR_CHANCE};
pub use tactical::{HazardResolver, OrdersResolver};

use std::fmt;

use crate::dice::DiceService;
use crate::entity::Ship;
use crate::fleet::{Fleets, Side};
use crate::narration::Narrator;

/// A step of the round pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Draw orders.
    Orders,
    /// Roll hazards.
    Hazards,
    /// Advance ships.
    Movement,
    /// Battery fire.
    Shooting,
    /// Missile launches.
    Missiles,
    /// Boarding actions.
    Boarding,
    /// Damage control.
    Repairs,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Orders => "orders",
            Self::Hazards => "hazards",
            Self::Movement => "movement",
            Self::Shooting => "shooting",
            Self::Missiles => "missiles",
            Self::Boarding => "boarding",
            Self::Repairs => "repairs",
        };
        f.write_str(name)
    }
}

/// Services a resolver may use while running its phase.
pub struct PhaseContext<'a> {
    /// Source of all randomness.
    pub dice: &'a mut dyn DiceService,
    /// Receives every event the phase produces.
    pub narrator: &'a mut dyn Narrator,
}

impl<'a> PhaseContext<'a> {
    /// Bundles a dice service and a narrator.
    pub fn new(dice: &'a mut dyn DiceService, narrator: &'a mut dyn Narrator) -> Self {
        Self { dice, narrator }
    }
}

/// Resolver runs one phase of a round against both fleets.
///
/// # Example
///
/// ```
/// use voidclash_core::fleet::Fleets;
/// use voidclash_core::resolver::{Phase, PhaseContext, Resolver};
///
/// struct Idle;
///
/// impl Resolver for Idle {
///     fn phase(&self) -> Phase {
///         Phase::Movement
///     }
///
///     fn resolve(&self, _fleets: &mut Fleets, _ctx: &mut PhaseContext<'_>) {}
/// }
/// ```
pub trait Resolver {
    /// The phase this resolver implements.
    fn phase(&self) -> Phase;

    /// Applies the phase to the fleets.
    fn resolve(&self, fleets: &mut Fleets, ctx: &mut PhaseContext<'_>);
}

/// The standard round pipeline, in execution order.
#[must_use]
pub fn default_resolvers() -> Vec<Box<dyn Resolver>> {
    vec![
        Box::new(OrdersResolver),
        Box::new(HazardResolver),
        Box::new(MovementResolver),
        Box::new(ShootingResolver),
        Box::new(MissileResolver),
        Box::new(BoardingResolver),
        Box::new(RepairResolver),
    ]
}

/// Runs `engage` for fleet A attacking fleet B, then for B attacking A.
pub(crate) fn each_engagement(
    fleets: &mut Fleets,
    mut engage: impl FnMut(&mut [Ship], &mut [Ship]),
) {
    for side in [Side::A, Side::B] {
        let (attackers, defenders) = fleets.engagement(side);
        engage(attackers, defenders);
    }
}

/// Converts a die total to a signed modifier-compatible value.
pub(crate) fn signed(total: u32) -> i32 {
    i32::try_from(total).unwrap_or(i32::MAX)
}
