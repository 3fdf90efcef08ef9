//! Lycan rules engine library.
//!
//! Exposes the game representation, role dealing, rules resolution, the
//! engine itself, the line protocol, and the simulation harness for use by
//! integration tests and the binary entry points.

pub mod distribution;
pub mod engine;
pub mod error;
pub mod game;
pub mod protocol;
pub mod random;
pub mod resolve;
pub mod rules;
pub mod simulate;
