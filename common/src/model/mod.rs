//! Domain models for the matching engine

pub mod instrument;
pub mod order;
pub mod fill;
pub mod trade;
