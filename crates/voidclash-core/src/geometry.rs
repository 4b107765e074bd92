//! Spatial geometry: distances, bearings, firing arcs, range bands, movement.
//!
//! Positions are [`DVec3`] in abstract distance units. Headings and pitches are
//! stored in degrees; they are converted to radians only inside [`advance`].
//!
//! Yaw is measured in the XY plane with `atan2(dy, dx)`, so heading 0° points
//! along +X and 90° along +Y. Pitch is elevation above the XY plane.

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::entity::{Ship, WeaponBattery};
use crate::error::ParseNameError;

// =============================================================================
// Firing arcs
// =============================================================================

/// Angular firing zone relative to a ship's facing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiringArc {
    /// Relative yaw within 45° of the bow.
    #[default]
    Fore,
    /// Relative yaw in `[135°, 225°]`.
    Aft,
    /// Relative yaw in `[45°, 135°]`.
    Port,
    /// Relative yaw in `[225°, 315°]`.
    Starboard,
    /// Relative pitch above +20°.
    Dorsal,
    /// Relative pitch below -20°.
    Ventral,
    /// Any direction.
    Omni,
}

/// Half-width of the dorsal/ventral cones, in degrees of relative pitch.
pub const VERTICAL_ARC_THRESHOLD: f64 = 20.0;

impl FiringArc {
    /// All arcs in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Fore,
        Self::Aft,
        Self::Port,
        Self::Starboard,
        Self::Dorsal,
        Self::Ventral,
        Self::Omni,
    ];

    /// Returns whether a target at the given relative yaw (normalised to
    /// `[0, 360)`) and relative pitch lies inside this arc.
    ///
    /// Horizontal arcs share their boundary angles, so every relative yaw
    /// belongs to at least one of fore/port/aft/starboard.
    #[must_use]
    pub fn contains(self, relative_yaw: f64, relative_pitch: f64) -> bool {
        match self {
            Self::Fore => relative_yaw <= 45.0 || relative_yaw >= 315.0,
            Self::Aft => (135.0..=225.0).contains(&relative_yaw),
            Self::Port => (45.0..=135.0).contains(&relative_yaw),
            Self::Starboard => (225.0..=315.0).contains(&relative_yaw),
            Self::Dorsal => relative_pitch > VERTICAL_ARC_THRESHOLD,
            Self::Ventral => relative_pitch < -VERTICAL_ARC_THRESHOLD,
            Self::Omni => true,
        }
    }

    /// Lowercase name as used in fleet files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fore => "fore",
            Self::Aft => "aft",
            Self::Port => "port",
            Self::Starboard => "starboard",
            Self::Dorsal => "dorsal",
            Self::Ventral => "ventral",
            Self::Omni => "omni",
        }
    }
}

impl fmt::Display for FiringArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FiringArc {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|arc| arc.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseNameError {
                kind: "firing arc",
                value: s.to_string(),
            })
    }
}

// =============================================================================
// Range bands
// =============================================================================

/// Named maximum-distance category for a weapon.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum RangeBand {
    /// Up to 5 units; also the boarding range.
    Point,
    /// Up to 10 units.
    Short,
    /// Up to 20 units.
    #[default]
    Standard,
    /// Up to 40 units; also the missile range.
    Long,
}

impl RangeBand {
    /// Maximum engagement distance for this band (inclusive).
    #[must_use]
    pub const fn max_distance(self) -> f64 {
        match self {
            Self::Point => 5.0,
            Self::Short => 10.0,
            Self::Standard => 20.0,
            Self::Long => 40.0,
        }
    }

    /// Parses a band name, falling back to [`RangeBand::Standard`] for
    /// anything unrecognised.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "point" => Self::Point,
            "short" => Self::Short,
            "long" => Self::Long,
            _ => Self::Standard,
        }
    }

    /// Lowercase name as used in fleet files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Short => "short",
            Self::Standard => "standard",
            Self::Long => "long",
        }
    }
}

impl From<String> for RangeBand {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<&str> for RangeBand {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl fmt::Display for RangeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Ship-to-ship queries
// =============================================================================

/// Euclidean distance between two ships.
#[must_use]
pub fn distance(a: &Ship, b: &Ship) -> f64 {
    a.position.distance(b.position)
}

/// Bearing from `ship` to `target` in degrees, normalised to `[0, 360)`.
#[must_use]
pub fn yaw_to_target(ship: &Ship, target: &Ship) -> f64 {
    let delta = target.position - ship.position;
    delta.y.atan2(delta.x).to_degrees().rem_euclid(360.0)
}

/// Elevation from `ship` to `target` in degrees.
#[must_use]
pub fn pitch_to_target(ship: &Ship, target: &Ship) -> f64 {
    let delta = target.position - ship.position;
    let horizontal = delta.x.hypot(delta.y);
    delta.z.atan2(horizontal).to_degrees()
}

/// Returns whether `target` lies inside `arc` as seen from `ship`'s facing.
#[must_use]
pub fn in_arc(ship: &Ship, target: &Ship, arc: FiringArc) -> bool {
    let relative_yaw = (yaw_to_target(ship, target) - ship.heading).rem_euclid(360.0);
    let relative_pitch = pitch_to_target(ship, target) - ship.pitch;
    arc.contains(relative_yaw, relative_pitch)
}

/// Returns whether `target` is within `band` of `ship`.
#[must_use]
pub fn in_range(ship: &Ship, target: &Ship, band: RangeBand) -> bool {
    distance(ship, target) <= band.max_distance()
}

/// Returns whether `battery` on `ship` can engage `target`: in range and in arc.
#[must_use]
pub fn can_fire(ship: &Ship, target: &Ship, battery: &WeaponBattery) -> bool {
    in_range(ship, target, battery.range) && in_arc(ship, target, battery.arc)
}

/// Unit vector for a heading/pitch pair given in degrees.
#[must_use]
pub fn facing_vector(heading: f64, pitch: f64) -> DVec3 {
    let yaw = heading.to_radians();
    let pitch = pitch.to_radians();
    DVec3::new(
        yaw.cos() * pitch.cos(),
        yaw.sin() * pitch.cos(),
        pitch.sin(),
    )
}

/// Moves `ship` one step of `speed` units along its heading and pitch.
pub fn advance(ship: &mut Ship) {
    ship.position += facing_vector(ship.heading, ship.pitch) * f64::from(ship.speed);
}
