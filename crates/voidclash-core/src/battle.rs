//! Battle orchestration: the round state machine.
//!
//! A [`Battle`] owns both fleets, the dice service, the narrator and the
//! resolver pipeline, and advances through a fixed sequence of states:
//!
//! ```text
//! RoundStart -> OrdersHazards -> Movement -> Shooting -> Missiles
//!            -> Boarding -> Repairs -> RoundEnd -> RoundStart | BattleOver
//! ```
//!
//! `RoundStart` ends the battle at once if either fleet has no ships left or
//! the round limit has been reached. `RoundEnd` prunes destroyed ships.
//!
//! # Determinism
//!
//! Given the same fleets and the same dice sequence, a battle produces the
//! same events and the same final state. All randomness flows through the
//! single dice service.
//!
//! # Example
//!
//! ```
//! use voidclash_core::battle::Battle;
//! use voidclash_core::entity::Ship;
//! use voidclash_core::fleet::Fleet;
//! use voidclash_core::narration::EventLog;
//!
//! let a = Fleet::new("Red", vec![Ship::builder("Kestrel").build()]);
//! let b = Fleet::new("Blue", vec![Ship::builder("Osprey").build()]);
//!
//! let mut battle = Battle::builder(a, b)
//!     .rounds(2)
//!     .seed(42)
//!     .narrator(EventLog::new())
//!     .build()
//!     .unwrap();
//!
//! let report = battle.run();
//! assert!(report.rounds_fought <= 2);
//! assert_eq!(battle.narrator().lines()[0], "=== ROUND 1 ===");
//! ```

use std::fmt;

use tracing::{debug, info, info_span};

use crate::config::BattleConfig;
use crate::dice::{DiceService, SeededDice};
use crate::error::{BattleError, Result};
use crate::fleet::{Fleet, Fleets};
use crate::narration::{BattleEvent, Narrator, TracingNarrator};
use crate::report::BattleReport;
use crate::resolver::{default_resolvers, Phase, PhaseContext, Resolver};

// =============================================================================
// BattleState
// =============================================================================

/// Position of a battle within its round cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BattleState {
    /// About to begin a round, or to end the battle.
    RoundStart,
    /// Orders drawn and hazards rolled.
    OrdersHazards,
    /// Ships advanced.
    Movement,
    /// Battery fire exchanged.
    Shooting,
    /// Missiles launched.
    Missiles,
    /// Boarding actions resolved.
    Boarding,
    /// Repairs attempted.
    Repairs,
    /// Destroyed ships pruned.
    RoundEnd,
    /// Terminal state.
    BattleOver,
}

impl BattleState {
    /// Resolver phases run when entering this state.
    #[must_use]
    pub const fn phases(self) -> &'static [Phase] {
        match self {
            Self::OrdersHazards => &[Phase::Orders, Phase::Hazards],
            Self::Movement => &[Phase::Movement],
            Self::Shooting => &[Phase::Shooting],
            Self::Missiles => &[Phase::Missiles],
            Self::Boarding => &[Phase::Boarding],
            Self::Repairs => &[Phase::Repairs],
            Self::RoundStart | Self::RoundEnd | Self::BattleOver => &[],
        }
    }

    /// Returns true for the terminal state.
    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, Self::BattleOver)
    }
}

// =============================================================================
// Battle
// =============================================================================

/// A battle between two fleets.
///
/// Built with [`Battle::builder`]. The narrator type `N` is kept concrete so
/// that callers can read back what it collected, e.g. an
/// [`EventLog`](crate::narration::EventLog).
pub struct Battle<N: Narrator = TracingNarrator> {
    fleets: Fleets,
    dice: Box<dyn DiceService>,
    narrator: N,
    resolvers: Vec<Box<dyn Resolver>>,
    config: BattleConfig,
    round: u32,
    state: BattleState,
}

impl<N: Narrator + fmt::Debug> fmt::Debug for Battle<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Battle")
            .field("fleets", &self.fleets)
            .field("narrator", &self.narrator)
            .field("resolvers", &format!("[{} resolvers]", self.resolvers.len()))
            .field("config", &self.config)
            .field("round", &self.round)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Battle<TracingNarrator> {
    /// Starts assembling a battle between fleet `a` and fleet `b`.
    ///
    /// Fleet A acts first in every phase.
    #[must_use]
    pub fn builder(a: Fleet, b: Fleet) -> BattleBuilder<TracingNarrator> {
        BattleBuilder::new(a, b)
    }
}

impl<N: Narrator> Battle<N> {
    /// Advances the battle by one state and returns the new state.
    ///
    /// Calling `step` on a finished battle is a no-op.
    pub fn step(&mut self) -> BattleState {
        let _span = info_span!("round", round = self.current_round()).entered();
        let next = match self.state {
            BattleState::RoundStart => {
                if self.should_end() {
                    self.finish()
                } else {
                    self.round += 1;
                    self.narrator
                        .narrate(&BattleEvent::RoundStarted { round: self.round });
                    self.enter(BattleState::OrdersHazards)
                }
            }
            BattleState::OrdersHazards => self.enter(BattleState::Movement),
            BattleState::Movement => self.enter(BattleState::Shooting),
            BattleState::Shooting => self.enter(BattleState::Missiles),
            BattleState::Missiles => self.enter(BattleState::Boarding),
            BattleState::Boarding => self.enter(BattleState::Repairs),
            BattleState::Repairs => {
                let pruned = self.fleets.prune_destroyed();
                debug!(
                    round = self.round,
                    pruned,
                    live_a = self.fleets.a.live_count(),
                    live_b = self.fleets.b.live_count(),
                    "round complete"
                );
                BattleState::RoundEnd
            }
            BattleState::RoundEnd => {
                if self.should_end() {
                    self.finish()
                } else {
                    BattleState::RoundStart
                }
            }
            BattleState::BattleOver => BattleState::BattleOver,
        };
        self.state = next;
        next
    }

    /// Runs until the current round is complete (or the battle ends).
    pub fn run_round(&mut self) -> BattleState {
        loop {
            let state = self.step();
            if matches!(state, BattleState::RoundStart | BattleState::BattleOver) {
                return state;
            }
        }
    }

    /// Runs the battle to completion and returns the final report.
    pub fn run(&mut self) -> BattleReport {
        while !self.step().is_over() {}
        let report = self.report();
        info!(
            rounds = report.rounds_fought,
            outcome = ?report.outcome,
            "battle over"
        );
        report
    }

    /// Report on the fleets as they currently stand.
    #[must_use]
    pub fn report(&self) -> BattleReport {
        BattleReport::from_fleets(&self.fleets, self.round)
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> BattleState {
        self.state
    }

    /// Rounds started so far.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Both fleets.
    #[must_use]
    pub fn fleets(&self) -> &Fleets {
        &self.fleets
    }

    /// Both fleets, mutably. Useful for scripted scenarios between steps.
    pub fn fleets_mut(&mut self) -> &mut Fleets {
        &mut self.fleets
    }

    /// The configuration the battle was built with.
    #[must_use]
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// The narrator.
    #[must_use]
    pub fn narrator(&self) -> &N {
        &self.narrator
    }

    /// The narrator, mutably (e.g. to drain an event log).
    pub fn narrator_mut(&mut self) -> &mut N {
        &mut self.narrator
    }

    /// Consumes the battle, returning the narrator.
    pub fn into_narrator(self) -> N {
        self.narrator
    }

    /// Appends a resolver to the pipeline. It runs in the state whose
    /// phases include its [`Resolver::phase`], after the built-in resolvers.
    pub fn add_resolver(&mut self, resolver: Box<dyn Resolver>) {
        self.resolvers.push(resolver);
    }

    /// The round the next step belongs to. Leaving `RoundStart` opens a new
    /// round unless the battle is about to end.
    fn current_round(&self) -> u32 {
        match self.state {
            BattleState::RoundStart if !self.should_end() => self.round + 1,
            _ => self.round,
        }
    }

    fn should_end(&self) -> bool {
        self.fleets.either_defeated() || self.round >= self.config.rounds
    }

    fn finish(&mut self) -> BattleState {
        self.narrator.narrate(&BattleEvent::BattleEnded {
            rounds_fought: self.round,
        });
        BattleState::BattleOver
    }

    /// Runs the resolvers for `state`'s phases and returns `state`.
    fn enter(&mut self, state: BattleState) -> BattleState {
        let phases = state.phases();
        let mut ctx = PhaseContext::new(self.dice.as_mut(), &mut self.narrator);
        for resolver in &self.resolvers {
            if phases.contains(&resolver.phase()) {
                debug!(phase = %resolver.phase(), "resolving");
                resolver.resolve(&mut self.fleets, &mut ctx);
            }
        }
        state
    }
}

// =============================================================================
// BattleBuilder
// =============================================================================

/// Builder for [`Battle`].
pub struct BattleBuilder<N: Narrator = TracingNarrator> {
    fleets: Fleets,
    config: BattleConfig,
    dice: Option<Box<dyn DiceService>>,
    narrator: N,
    resolvers: Vec<Box<dyn Resolver>>,
}

impl BattleBuilder<TracingNarrator> {
    fn new(a: Fleet, b: Fleet) -> Self {
        Self {
            fleets: Fleets::new(a, b),
            config: BattleConfig::default(),
            dice: None,
            narrator: TracingNarrator,
            resolvers: default_resolvers(),
        }
    }
}

impl<N: Narrator> BattleBuilder<N> {
    /// Replaces the whole configuration.
    #[must_use]
    pub fn config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the round limit.
    #[must_use]
    pub fn rounds(mut self, rounds: u32) -> Self {
        self.config.rounds = rounds;
        self
    }

    /// Uses [`SeededDice`] with `seed` unless explicit dice are supplied.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Supplies the dice service.
    #[must_use]
    pub fn dice(mut self, dice: impl DiceService + 'static) -> Self {
        self.dice = Some(Box::new(dice));
        self
    }

    /// Replaces the narrator.
    #[must_use]
    pub fn narrator<M: Narrator>(self, narrator: M) -> BattleBuilder<M> {
        BattleBuilder {
            fleets: self.fleets,
            config: self.config,
            dice: self.dice,
            narrator,
            resolvers: self.resolvers,
        }
    }

    /// Replaces the resolver pipeline.
    #[must_use]
    pub fn resolvers(mut self, resolvers: Vec<Box<dyn Resolver>>) -> Self {
        self.resolvers = resolvers;
        self
    }

    /// Finishes the battle. Ships that start with hull 0 are treated as
    /// already destroyed.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidConfig`] if the configuration is invalid,
    /// or [`BattleError::DiceServiceUnavailable`] if neither dice nor a seed
    /// were provided.
    pub fn build(self) -> Result<Battle<N>> {
        self.config.validate()?;
        let dice: Box<dyn DiceService> = match (self.dice, self.config.seed) {
            (Some(dice), _) => dice,
            (None, Some(seed)) => Box::new(SeededDice::new(seed)),
            (None, None) => return Err(BattleError::DiceServiceUnavailable),
        };
        let mut fleets = self.fleets;
        fleets.prune_destroyed();
        debug!(
            fleet_a = %fleets.a.name,
            fleet_b = %fleets.b.name,
            rounds = self.config.rounds,
            seed = ?self.config.seed,
            "battle assembled"
        );
        Ok(Battle {
            fleets,
            dice,
            narrator: self.narrator,
            resolvers: self.resolvers,
            config: self.config,
            round: 0,
            state: BattleState::RoundStart,
        })
    }
}
