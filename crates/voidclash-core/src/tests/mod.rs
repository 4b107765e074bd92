//! Crate-level tests.
//!
//! - `determinism.rs`: same seed and fleets produce the same battle
//! - `integration.rs`: full battles through the public API
//! - `helpers.rs`: scripted dice and fleet factories shared by unit tests

mod determinism;
pub(crate) mod helpers;
