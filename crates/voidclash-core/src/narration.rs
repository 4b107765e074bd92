//! Battle narration: typed events and the sinks that consume them.
//!
//! Every phase reports what happened as a [`BattleEvent`]. The engine hands
//! events to a [`Narrator`] and never writes output itself, so the same battle
//! can be printed, logged through `tracing`, or captured for assertions.
//!
//! # Example
//!
//! ```
//! use voidclash_core::narration::{BattleEvent, EventLog, Narrator};
//!
//! let mut log = EventLog::new();
//! log.narrate(&BattleEvent::RoundStarted { round: 1 });
//!
//! let events = log.take_events();
//! assert_eq!(events[0].to_string(), "=== ROUND 1 ===");
//! assert!(log.is_empty());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::orders::{Hazard, Order};

/// What finished off a ship.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestructionCause {
    /// Battery fire.
    Gunfire,
    /// A missile strike.
    Missile,
    /// A boarding action.
    Boarding,
    /// A minefield hazard.
    Mine,
}

/// Something that happened during a battle.
///
/// Ships are referred to by name. `Display` renders the narration line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    /// A new round began.
    RoundStarted {
        /// 1-based round number
        round: u32,
    },
    /// A ship received its order for the round.
    OrderSelected {
        /// Ship name
        ship: String,
        /// Order drawn
        order: Order,
    },
    /// A ship ran into a hazard; its effect follows as a separate event.
    HazardEncountered {
        /// Ship name
        ship: String,
        /// Hazard drawn
        hazard: Hazard,
    },
    /// A random subsystem failed.
    SystemFailure {
        /// Ship name
        ship: String,
        /// Subsystem name
        subsystem: String,
        /// Efficiency after the failure
        efficiency: u32,
    },
    /// A gravity well penalised attack and defence.
    GravityWell {
        /// Ship name
        ship: String,
    },
    /// A mine damaged the hull.
    MineStrike {
        /// Ship name
        ship: String,
        /// Damage rolled
        damage: u32,
        /// Hull after the strike
        hull: u32,
    },
    /// A nebula penalised attack.
    NebulaEntered {
        /// Ship name
        ship: String,
    },
    /// Radiation degraded every subsystem.
    RadiationBurst {
        /// Ship name
        ship: String,
    },
    /// A battery hit.
    WeaponHit {
        /// Firing ship
        attacker: String,
        /// Ship hit
        target: String,
        /// Battery name
        battery: String,
        /// Damage rolled
        damage: u32,
        /// Target hull after the hit
        hull: u32,
    },
    /// A battery missed.
    WeaponMiss {
        /// Firing ship
        attacker: String,
        /// Ship aimed at
        target: String,
        /// Battery name
        battery: String,
    },
    /// A missile struck.
    MissileHit {
        /// Launching ship
        attacker: String,
        /// Ship struck
        target: String,
        /// Damage rolled
        damage: u32,
        /// Target hull after the strike
        hull: u32,
    },
    /// A boarding party got through.
    BoardingSucceeded {
        /// Boarding ship
        attacker: String,
        /// Ship boarded
        target: String,
        /// Damage rolled
        damage: u32,
        /// Target hull after the action
        hull: u32,
    },
    /// A boarding party was repelled.
    BoardingRepelled {
        /// Boarding ship
        attacker: String,
        /// Ship that held
        target: String,
    },
    /// A ship's hull reached zero.
    ShipDestroyed {
        /// Ship name
        ship: String,
        /// What finished it
        cause: DestructionCause,
    },
    /// A damaged subsystem was repaired.
    SubsystemRepaired {
        /// Ship name
        ship: String,
        /// Subsystem name
        subsystem: String,
        /// Display text of the subsystem's effect (may be empty)
        description: String,
        /// Efficiency after repair
        efficiency: u32,
    },
    /// Repair crews were sent to an offline subsystem and could do nothing.
    RepairFailed {
        /// Ship name
        ship: String,
        /// Subsystem name
        subsystem: String,
    },
    /// The battle is over.
    BattleEnded {
        /// Rounds actually fought
        rounds_fought: u32,
    },
}

impl BattleEvent {
    /// Name of the ship this event is primarily about, if any.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::RoundStarted { .. } | Self::BattleEnded { .. } => None,
            Self::OrderSelected { ship, .. }
            | Self::HazardEncountered { ship, .. }
            | Self::SystemFailure { ship, .. }
            | Self::GravityWell { ship }
            | Self::MineStrike { ship, .. }
            | Self::NebulaEntered { ship }
            | Self::RadiationBurst { ship }
            | Self::ShipDestroyed { ship, .. }
            | Self::SubsystemRepaired { ship, .. }
            | Self::RepairFailed { ship, .. } => Some(ship),
            Self::WeaponHit { attacker, .. }
            | Self::WeaponMiss { attacker, .. }
            | Self::MissileHit { attacker, .. }
            | Self::BoardingSucceeded { attacker, .. }
            | Self::BoardingRepelled { attacker, .. } => Some(attacker),
        }
    }
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundStarted { round } => write!(f, "=== ROUND {round} ==="),
            Self::OrderSelected { ship, order } => write!(f, "{ship} selects order: {order}"),
            Self::HazardEncountered { ship, hazard } => {
                write!(f, "{ship} encounters hazard: {hazard}")
            }
            Self::SystemFailure {
                ship,
                subsystem,
                efficiency,
            } => write!(f, "Hazard damages {ship}'s {subsystem}, now {efficiency}%"),
            Self::GravityWell { ship } => {
                write!(f, "{ship} caught in gravity well: -1 attack and defense")
            }
            Self::MineStrike { ship, damage, hull } => {
                write!(f, "{ship} strikes a mine for {damage} damage (hull {hull})")
            }
            Self::NebulaEntered { ship } => write!(f, "{ship} enters nebula: -1 attack this round"),
            Self::RadiationBurst { ship } => {
                write!(f, "{ship} hit by radiation burst: all systems degrade")
            }
            Self::WeaponHit {
                attacker,
                target,
                battery,
                damage,
                hull,
            } => write!(
                f,
                "{attacker} hits {target} with {battery} for {damage} (hull {hull})"
            ),
            Self::WeaponMiss {
                attacker,
                target,
                battery,
            } => write!(f, "{attacker} misses {target} with {battery}"),
            Self::MissileHit {
                attacker,
                target,
                damage,
                hull,
            } => write!(
                f,
                "{attacker} launches missile at {target} for {damage} (hull {hull})"
            ),
            Self::BoardingSucceeded {
                attacker,
                target,
                damage,
                hull,
            } => write!(
                f,
                "{attacker} boards {target} for {damage} damage (hull {hull})"
            ),
            Self::BoardingRepelled { attacker, target } => {
                write!(f, "{attacker} fails to board {target}")
            }
            Self::ShipDestroyed { ship, cause } => match cause {
                DestructionCause::Gunfire => write!(f, "{ship} destroyed!"),
                DestructionCause::Missile => write!(f, "{ship} destroyed by missile!"),
                DestructionCause::Boarding => write!(f, "{ship} captured and destroyed!"),
                DestructionCause::Mine => write!(f, "{ship} torn apart by a mine!"),
            },
            Self::SubsystemRepaired {
                ship,
                description,
                efficiency,
                ..
            } => {
                let what = if description.is_empty() {
                    "a system"
                } else {
                    description.as_str()
                };
                write!(f, "{ship} repairs {what} to {efficiency}%")
            }
            Self::RepairFailed { ship, subsystem } => {
                write!(f, "{ship} cannot repair {subsystem}: system offline")
            }
            Self::BattleEnded { .. } => write!(f, "--- Battle Over ---"),
        }
    }
}

/// Observer that receives every [`BattleEvent`] in the order it happened.
///
/// Any `FnMut(&BattleEvent)` closure is a narrator.
pub trait Narrator {
    /// Handles one event.
    fn narrate(&mut self, event: &BattleEvent);
}

impl<F: FnMut(&BattleEvent)> Narrator for F {
    fn narrate(&mut self, event: &BattleEvent) {
        self(event);
    }
}

/// Narrator that records events for later inspection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<BattleEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains and returns all recorded events, oldest first.
    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Discards all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Narration lines for the recorded events.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }
}

impl Narrator for EventLog {
    fn narrate(&mut self, event: &BattleEvent) {
        self.events.push(event.clone());
    }
}

/// Narrator that forwards each line to `tracing` at INFO level under the
/// `voidclash::narration` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNarrator;

impl Narrator for TracingNarrator {
    fn narrate(&mut self, event: &BattleEvent) {
        tracing::info!(target: "voidclash::narration", "{event}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod display_tests {
        use super::*;

        #[test]
        fn order_and_hazard_lines() {
            let order = BattleEvent::OrderSelected {
                ship: "Aurora".into(),
                order: Order::LockOn,
            };
            assert_eq!(order.to_string(), "Aurora selects order: Lock On");

            let hazard = BattleEvent::HazardEncountered {
                ship: "Aurora".into(),
                hazard: Hazard::GravityWell,
            };
            assert_eq!(hazard.to_string(), "Aurora encounters hazard: Gravity Well");
        }

        #[test]
        fn combat_lines() {
            let hit = BattleEvent::WeaponHit {
                attacker: "A".into(),
                target: "B".into(),
                battery: "Lance".into(),
                damage: 7,
                hull: 3,
            };
            assert_eq!(hit.to_string(), "A hits B with Lance for 7 (hull 3)");

            let miss = BattleEvent::WeaponMiss {
                attacker: "A".into(),
                target: "B".into(),
                battery: "Lance".into(),
            };
            assert_eq!(miss.to_string(), "A misses B with Lance");

            let boarded = BattleEvent::ShipDestroyed {
                ship: "B".into(),
                cause: DestructionCause::Boarding,
            };
            assert_eq!(boarded.to_string(), "B captured and destroyed!");
        }

        #[test]
        fn repair_line_falls_back_to_a_system() {
            let mut event = BattleEvent::SubsystemRepaired {
                ship: "A".into(),
                subsystem: "engines".into(),
                description: String::new(),
                efficiency: 50,
            };
            assert_eq!(event.to_string(), "A repairs a system to 50%");

            if let BattleEvent::SubsystemRepaired { description, .. } = &mut event {
                *description = "Speed halved when offline".into();
            }
            assert_eq!(event.to_string(), "A repairs Speed halved when offline to 50%");
        }
    }

    mod subject_tests {
        use super::*;

        #[test]
        fn subject_is_acting_ship() {
            let event = BattleEvent::MissileHit {
                attacker: "A".into(),
                target: "B".into(),
                damage: 1,
                hull: 1,
            };
            assert_eq!(event.subject(), Some("A"));
            assert_eq!(BattleEvent::RoundStarted { round: 2 }.subject(), None);
        }
    }

    mod sink_tests {
        use super::*;

        #[test]
        fn event_log_records_in_order() {
            let mut log = EventLog::new();
            log.narrate(&BattleEvent::RoundStarted { round: 1 });
            log.narrate(&BattleEvent::BattleEnded { rounds_fought: 1 });
            assert_eq!(log.len(), 2);
            assert_eq!(log.lines(), vec!["=== ROUND 1 ===", "--- Battle Over ---"]);

            let drained = log.take_events();
            assert_eq!(drained.len(), 2);
            assert!(log.is_empty());
        }

        #[test]
        fn clear_empties_log() {
            let mut log = EventLog::new();
            log.narrate(&BattleEvent::RoundStarted { round: 1 });
            log.clear();
            assert!(log.is_empty());
        }

        #[test]
        fn closures_are_narrators() {
            let mut lines = Vec::new();
            {
                let mut sink = |event: &BattleEvent| lines.push(event.to_string());
                sink.narrate(&BattleEvent::RoundStarted { round: 4 });
            }
            assert_eq!(lines, vec!["=== ROUND 4 ==="]);
        }

        #[test]
        fn events_serialize() {
            let event = BattleEvent::MineStrike {
                ship: "A".into(),
                damage: 2,
                hull: 8,
            };
            let json = serde_json::to_string(&event).unwrap();
            let back: BattleEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(back, event);
        }
    }
}
