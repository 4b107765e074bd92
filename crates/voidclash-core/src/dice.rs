//! Dice service: the single source of randomness for the combat engine.
//!
//! Every random decision in a battle (dice totals, percentage chances, uniform
//! picks from a catalog) goes through a [`DiceService`]. The engine never
//! touches a global RNG, so a battle is fully reproducible from the service it
//! was built with.
//!
//! # Example
//!
//! ```
//! use voidclash_core::dice::{DiceExpr, DiceService, SeededDice};
//!
//! let mut dice = SeededDice::new(7);
//! let total = dice.roll("2d6").unwrap();
//! assert!((2..=12).contains(&total));
//!
//! let d20: DiceExpr = "1d20".parse().unwrap();
//! assert_eq!(d20.max_total(), 20);
//! ```

use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::DiceError;

/// Most dice a single expression may roll.
pub const MAX_DICE: u32 = 100;

/// Most faces a single die may have.
pub const MAX_SIDES: u32 = 1000;

/// A parsed `NdS` dice expression: `count` dice with `sides` faces each.
///
/// Parsing happens once, when a weapon battery is built or a rule constant is
/// declared, so malformed expressions never surface mid-battle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceExpr {
    count: u32,
    sides: u32,
}

impl DiceExpr {
    /// `1d6`, minefield damage.
    pub const D6: Self = Self::new(1, 6);
    /// `1d10`, boarding damage.
    pub const D10: Self = Self::new(1, 10);
    /// `1d20`, boarding attack roll.
    pub const D20: Self = Self::new(1, 20);
    /// `2d20`, gunnery attack roll.
    pub const TWO_D20: Self = Self::new(2, 20);
    /// `3d6`, missile damage.
    pub const THREE_D6: Self = Self::new(3, 6);

    /// Creates an expression for `count` dice of `sides` faces.
    ///
    /// Callers must pass positive values; use [`str::parse`] for untrusted
    /// input.
    #[must_use]
    pub const fn new(count: u32, sides: u32) -> Self {
        Self { count, sides }
    }

    /// Number of dice rolled.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.count
    }

    /// Faces per die.
    #[must_use]
    pub const fn sides(self) -> u32 {
        self.sides
    }

    /// Smallest possible total (every die shows 1).
    #[must_use]
    pub const fn min_total(self) -> u32 {
        self.count
    }

    /// Largest possible total (every die shows its highest face).
    #[must_use]
    pub const fn max_total(self) -> u32 {
        self.count.saturating_mul(self.sides)
    }
}

impl FromStr for DiceExpr {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let Some((count, sides)) = trimmed.split_once(['d', 'D']) else {
            return Err(DiceError::invalid(s, "missing 'd' separator"));
        };
        if count.is_empty() {
            return Err(DiceError::invalid(s, "missing dice count"));
        }
        if sides.is_empty() {
            return Err(DiceError::invalid(s, "missing number of sides"));
        }
        let count: u32 = count
            .parse()
            .map_err(|_| DiceError::invalid(s, "dice count is not a number"))?;
        let sides: u32 = sides
            .parse()
            .map_err(|_| DiceError::invalid(s, "number of sides is not a number"))?;
        if count == 0 {
            return Err(DiceError::invalid(s, "dice count must be positive"));
        }
        if sides == 0 {
            return Err(DiceError::invalid(s, "number of sides must be positive"));
        }
        if count > MAX_DICE {
            return Err(DiceError::invalid(s, "too many dice"));
        }
        if sides > MAX_SIDES {
            return Err(DiceError::invalid(s, "too many sides"));
        }
        Ok(Self { count, sides })
    }
}

impl TryFrom<String> for DiceExpr {
    type Error = DiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiceExpr> for String {
    fn from(expr: DiceExpr) -> Self {
        expr.to_string()
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

/// Source of all randomness used during a battle.
///
/// Implementations must be deterministic for a given initial state so that
/// battles can be replayed. The engine only ever calls these three primitives.
pub trait DiceService {
    /// Rolls `expr.count()` independent dice, each uniform in `1..=expr.sides()`,
    /// and returns their sum.
    fn roll_dice(&mut self, expr: &DiceExpr) -> u32;

    /// Draws a uniform value in `[0, 1)` and returns whether it is below
    /// `probability`. Always consumes exactly one draw, even for 0.0 or 1.0.
    fn chance(&mut self, probability: f64) -> bool;

    /// Returns a uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize;

    /// Parses and rolls a textual expression such as `"3d6"`.
    ///
    /// # Errors
    ///
    /// Returns [`DiceError::InvalidExpression`] if `expression` is not `NdS`.
    fn roll(&mut self, expression: &str) -> Result<u32, DiceError> {
        let expr: DiceExpr = expression.parse()?;
        Ok(self.roll_dice(&expr))
    }
}

impl<T: DiceService + ?Sized> DiceService for Box<T> {
    fn roll_dice(&mut self, expr: &DiceExpr) -> u32 {
        (**self).roll_dice(expr)
    }

    fn chance(&mut self, probability: f64) -> bool {
        (**self).chance(probability)
    }

    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }
}

/// Deterministic dice backed by a seeded `ChaCha8Rng`.
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: ChaCha8Rng,
    seed: u64,
}

impl SeededDice {
    /// Creates dice seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates dice with a freshly drawn seed.
    ///
    /// The seed is still recorded and available via [`seed`](Self::seed), so
    /// the run can be replayed.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed these dice were created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl DiceService for SeededDice {
    fn roll_dice(&mut self, expr: &DiceExpr) -> u32 {
        let sides = expr.sides().max(1);
        let total = (0..expr.count())
            .map(|_| self.rng.gen_range(1..=sides))
            .fold(0u32, u32::saturating_add);
        tracing::trace!(dice = %expr, total, "rolled");
        total
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen::<f64>() < probability
    }

    fn pick(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "pick from an empty collection");
        self.rng.gen_range(0..len.max(1))
    }
}
