//! Movement resolver.
//!
//! Every live ship advances `speed` units along its facing vector. Headings
//! never change, so the facing computed from heading and pitch is the same
//! every round.

use crate::fleet::Fleets;
use crate::geometry::advance;

use super::{Phase, PhaseContext, Resolver};

/// Resolver that moves every live ship along its facing.
///
/// Consumes no randomness and emits no events.
///
/// # Example
///
/// ```
/// use voidclash_core::resolver::{MovementResolver, Phase, Resolver};
///
/// assert_eq!(MovementResolver.phase(), Phase::Movement);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementResolver;

impl Resolver for MovementResolver {
    fn phase(&self) -> Phase {
        Phase::Movement
    }

    fn resolve(&self, fleets: &mut Fleets, _ctx: &mut PhaseContext<'_>) {
        for ship in fleets.ships_mut().filter(|ship| !ship.is_destroyed()) {
            advance(ship);
        }
    }
}
