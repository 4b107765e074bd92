//! Determinism verification tests.
//!
//! A battle is a pure function of its fleets and its dice sequence. These
//! tests check that:
//! - The same seed produces the same events and the same final fleets
//! - Different seeds diverge
//! - Stepping state by state is equivalent to running to completion

use proptest::prelude::*;

use crate::battle::BattleState;
use crate::narration::BattleEvent;
use crate::report::BattleReport;

use super::helpers::{duel_fleets, seeded_battle, skirmish_fleets};

fn battle_transcript(seed: u64, rounds: u32) -> (Vec<BattleEvent>, String, BattleReport) {
    let (a, b) = skirmish_fleets();
    let mut battle = seeded_battle(a, b, seed, rounds);
    let report = battle.run();
    let fleets = serde_json::to_string(battle.fleets()).expect("fleets serialize");
    let events = battle.into_narrator().take_events();
    (events, fleets, report)
}

#[test]
fn same_seed_same_battle() {
    let first = battle_transcript(42, 6);
    let second = battle_transcript(42, 6);
    assert_eq!(first, second);
}

#[test]
fn different_seeds_diverge() {
    let transcripts: Vec<_> = (0..8).map(|seed| battle_transcript(seed, 6).0).collect();
    let distinct = transcripts
        .iter()
        .enumerate()
        .filter(|(i, t)| transcripts[..*i].iter().all(|other| other != *t))
        .count();
    assert!(distinct > 1, "eight seeds produced identical battles");
}

#[test]
fn stepping_matches_running() {
    let (a, b) = duel_fleets();
    let mut stepped = seeded_battle(a, b, 99, 5);
    while stepped.step() != BattleState::BattleOver {}

    let (a, b) = duel_fleets();
    let mut ran = seeded_battle(a, b, 99, 5);
    ran.run();

    assert_eq!(stepped.narrator().events(), ran.narrator().events());
    assert_eq!(stepped.fleets(), ran.fleets());
}

#[test]
fn round_by_round_matches_running() {
    let (a, b) = skirmish_fleets();
    let mut rounds = seeded_battle(a, b, 5, 4);
    while rounds.run_round() != BattleState::BattleOver {}

    let (a, b) = skirmish_fleets();
    let mut ran = seeded_battle(a, b, 5, 4);
    ran.run();

    assert_eq!(rounds.report(), ran.report());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn any_seed_is_reproducible(seed in any::<u64>()) {
        prop_assert_eq!(battle_transcript(seed, 3), battle_transcript(seed, 3));
    }
}
