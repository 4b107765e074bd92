//! Round preparation: orders and hazards.

use crate::fleet::Fleets;
use crate::orders::{resolve_hazards, select_orders};

use super::{Phase, PhaseContext, Resolver};

/// Draws a fresh order for every live ship.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrdersResolver;

impl Resolver for OrdersResolver {
    fn phase(&self) -> Phase {
        Phase::Orders
    }

    fn resolve(&self, fleets: &mut Fleets, ctx: &mut PhaseContext<'_>) {
        select_orders(fleets.ships_mut(), ctx);
    }
}

/// Rolls hazards for every live ship with subsystems.
///
/// Runs after [`OrdersResolver`], so hazard penalties stack on top of the
/// round's order modifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct HazardResolver;

impl Resolver for HazardResolver {
    fn phase(&self) -> Phase {
        Phase::Hazards
    }

    fn resolve(&self, fleets: &mut Fleets, ctx: &mut PhaseContext<'_>) {
        resolve_hazards(fleets.ships_mut(), ctx);
    }
}
