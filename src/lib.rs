// This is a metapackage for tests
// Re-export crates as modules

pub use common;
pub use matching_engine;
pub use trading_engine;
