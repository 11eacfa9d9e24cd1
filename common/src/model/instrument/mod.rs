//! Tradable instruments

use std::fmt;

use serde::{Deserialize, Serialize};

/// A tradable symbol, ordered lexicographically by symbol
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Instrument {
    /// Upper-cased symbol (e.g., "ETHUSD")
    pub symbol: String,
}

impl Instrument {
    /// Create an instrument, normalizing the symbol to upper case
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self {
            symbol: symbol.as_ref().to_uppercase(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}
