//! Fleet sources: the built-in demo engagement and JSON fleet files.

use std::path::Path;

use anyhow::{Context, Result};
use glam::DVec3;
use serde::Deserialize;
use voidclash_core::{DiceExpr, Fleet, RangeBand, Ship, Subsystem, WeaponBattery};

/// Layout of a fleet file: `{"fleet_a": {...}, "fleet_b": {...}}`.
#[derive(Debug, Deserialize)]
struct FleetFile {
    fleet_a: Fleet,
    fleet_b: Fleet,
}

/// Loads both fleets from a JSON file.
pub fn load_fleets(path: &Path) -> Result<(Fleet, Fleet)> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read fleet file {}", path.display()))?;
    parse_fleets(&json).with_context(|| format!("invalid fleet file {}", path.display()))
}

fn parse_fleets(json: &str) -> Result<(Fleet, Fleet)> {
    let file: FleetFile = serde_json::from_str(json)?;
    tracing::debug!(
        fleet_a = %file.fleet_a.name,
        ships_a = file.fleet_a.ships.len(),
        fleet_b = %file.fleet_b.name,
        ships_b = file.fleet_b.ships.len(),
        "loaded fleets"
    );
    Ok((file.fleet_a, file.fleet_b))
}

/// The demo engagement: a light cruiser against a battleship, 20 units apart.
pub fn demo_fleets() -> (Fleet, Fleet) {
    let aurora = Ship::builder("Aurora Huntress")
        .class_name("Light Cruiser")
        .hull(80)
        .shield(65)
        .battery(
            WeaponBattery::new("Lance Battery", 3)
                .with_accuracy(1)
                .with_damage(DiceExpr::new(2, 6))
                .with_range(RangeBand::Long),
        )
        .battery(WeaponBattery::new("Macro Cannon", 2).with_damage(DiceExpr::new(3, 6)))
        .missiles(4)
        .crew(2)
        .leadership(7)
        .boarding_strength(1)
        .speed(25)
        .maneuver(2)
        .subsystem(
            "engines",
            Subsystem::new(85, 50).with_effect("Speed halved when offline"),
        )
        .subsystem("shields", Subsystem::new(70, 50).with_effect("Hull exposed"))
        .subsystem("targeting", Subsystem::new(90, 50).with_effect("Attack penalty"))
        .ai("Efficient and sarcastic")
        .position(DVec3::new(-10.0, 0.0, 0.0))
        .facing(90.0, 0.0)
        .build();

    let warden = Ship::builder("Celestial Warden")
        .class_name("Battleship")
        .hull(100)
        .shield(80)
        .battery(
            WeaponBattery::new("Plasma Broadside", 4)
                .with_accuracy(-1)
                .with_damage(DiceExpr::new(4, 6))
                .with_range(RangeBand::Long)
                .with_special("area"),
        )
        .missiles(6)
        .crew(4)
        .leadership(9)
        .boarding_strength(3)
        .speed(18)
        .maneuver(1)
        .subsystem("engines", Subsystem::new(90, 50).with_effect("Ship immobilised"))
        .subsystem("shields", Subsystem::new(80, 50).with_effect("Hull exposed"))
        .subsystem(
            "reactor",
            Subsystem::new(100, 50).with_effect("Catastrophic explosion on failure"),
        )
        .ai("Formal and calculating")
        .position(DVec3::new(10.0, 0.0, 0.0))
        .facing(270.0, 0.0)
        .build();

    (
        Fleet::new("Fleet A", vec![aurora]),
        Fleet::new("Fleet B", vec![warden]),
    )
}
