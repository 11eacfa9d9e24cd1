//! Numeric types for prices and quantities

use std::str::FromStr;

use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;

/// Price type with exact decimal precision
pub type Price = Decimal;

/// Quantity type; orders trade in whole units
pub type Quantity = u64;

/// Parse a textual price, accepting plain and scientific notation
pub fn parse_price(text: &str) -> Result<Price, rust_decimal::Error> {
    Decimal::from_str(text).or_else(|err| Decimal::from_scientific(text).map_err(|_| err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_plain_and_scientific() {
        assert_eq!(parse_price("100").unwrap(), dec!(100));
        assert_eq!(parse_price("99.5").unwrap(), dec!(99.5));
        assert_eq!(parse_price("1e2").unwrap(), dec!(100));
        assert!(parse_price("abc").is_err());
    }
}
