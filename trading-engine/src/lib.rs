//! Line-oriented front end for the matching engine
//!
//! Reads order instructions, hands them to a [`matching_engine::MatchingEngine`]
//! one at a time, prints every trade as it happens and dumps the resting book
//! once the input ends.

pub mod config;
pub mod ingest;
pub mod render;
pub mod runner;

pub use config::{Args, EngineConfig, OutputFormat};
pub use runner::{run, RunSummary};
