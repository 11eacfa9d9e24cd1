//! Common types and utilities for the matching engine
//!
//! This library contains the value types shared by the matching core and the
//! surrounding ingestion and rendering layers: instruments, orders, fills,
//! trades, the decimal aliases used for prices, and a unified error type.

pub mod error;
pub mod model;
pub mod decimal;

/// Re-export important types
pub use error::{Error, ParseFailure, Result};
pub use decimal::*;
