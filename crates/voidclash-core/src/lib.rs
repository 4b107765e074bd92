//! # Voidclash Core
//!
//! Turn-based combat engine for two fleets of starships.
//!
//! Each round every ship draws a battle order, may run into an environmental
//! hazard, moves along its facing, then the fleets exchange battery fire,
//! missiles and boarding parties before damage control crews attempt repairs.
//! Destroyed ships are removed at the end of the round; the battle stops when
//! a fleet is wiped out or the round limit is reached.
//!
//! ## Architecture
//!
//! - **Entities** ([`entity`]): ships, subsystems and weapon batteries
//! - **Resolvers** ([`resolver`]): one per round phase, run in a fixed order
//! - **Battle** ([`battle`]): the round state machine that drives resolvers
//! - **Dice** ([`dice`]): the single source of randomness
//! - **Narration** ([`narration`]): typed events delivered to a narrator
//!
//! ## Usage
//!
//! ```
//! use voidclash_core::{Battle, EventLog, Fleet, Ship};
//!
//! let red = Fleet::new("Red", vec![Ship::builder("Kestrel").hull(20).build()]);
//! let blue = Fleet::new("Blue", vec![Ship::builder("Osprey").hull(20).build()]);
//!
//! let mut battle = Battle::builder(red, blue)
//!     .rounds(3)
//!     .seed(2024)
//!     .narrator(EventLog::new())
//!     .build()?;
//! let report = battle.run();
//! println!("{report}");
//! # Ok::<(), voidclash_core::BattleError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod battle;
pub mod config;
pub mod dice;
pub mod entity;
pub mod error;
pub mod fleet;
pub mod geometry;
pub mod narration;
pub mod orders;
pub mod report;
pub mod resolver;

pub use battle::{Battle, BattleBuilder, BattleState};
pub use config::BattleConfig;
pub use dice::{DiceExpr, DiceService, SeededDice};
pub use entity::{Ship, ShipBuilder, Subsystem, SubsystemStatus, WeaponBattery, WeaponSystem};
pub use error::{BattleError, ConfigError, DiceError, ParseNameError};
pub use fleet::{Fleet, Fleets, Side};
pub use geometry::{FiringArc, RangeBand};
pub use narration::{BattleEvent, EventLog, Narrator, TracingNarrator};
pub use orders::{Hazard, Order};
pub use report::{BattleReport, Outcome, ShipStatus};

#[cfg(test)]
mod tests;
