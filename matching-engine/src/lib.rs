mod instrument_engine;
mod order_book;
pub mod engine;

pub use engine::{MatchingEngine, MatchingEngineSystem};
pub use instrument_engine::InstrumentMatchingEngine;
pub use order_book::{BookSide, OrderBook};
