//! Order models and related types

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Price, Quantity};
use crate::error::{Error, ParseFailure, Result};
use crate::model::fill::OrderFill;
use crate::model::instrument::Instrument;
use crate::model::trade::Trade;

/// Order side (buy or sell)
///
/// Buy sorts before Sell, so the buy book precedes the sell book when
/// orders of one instrument are sorted together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side an order of this side trades against
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    fn sign(self) -> Decimal {
        match self {
            Side::Buy => Decimal::NEGATIVE_ONE,
            Side::Sell => Decimal::ONE,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("BUY"),
            Side::Sell => f.write_str("SELL"),
        }
    }
}

impl FromStr for Side {
    type Err = ParseFailure;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("BUY") {
            Ok(Side::Buy)
        } else if s.eq_ignore_ascii_case("SELL") {
            Ok(Side::Sell)
        } else {
            Err(ParseFailure::Side(s.to_string()))
        }
    }
}

/// Sort key of an order inside a book
///
/// Ascending order on this key is best-first for both sides: the signed
/// price is negated for bids, so the highest bid and the lowest ask come
/// first, and earlier arrivals win ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Priority<'a> {
    instrument: &'a Instrument,
    side: Side,
    signed_price: Price,
    timestamp: DateTime<Utc>,
}

/// A single limit order instruction
///
/// Orders are values. Filling never changes an order in place; it derives
/// new orders with the reduced quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    order_id: String,
    side: Side,
    instrument: Instrument,
    quantity: Quantity,
    price: Price,
    timestamp: DateTime<Utc>,
}

impl Order {
    /// Create a new order, rejecting non-positive prices
    pub fn new(
        order_id: impl Into<String>,
        side: Side,
        instrument: Instrument,
        quantity: Quantity,
        price: Price,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        let order_id = order_id.into();
        if price <= Decimal::ZERO {
            return Err(Error::InvalidOrder(format!(
                "order {} price must be positive, got {}",
                order_id, price
            )));
        }

        Ok(Self {
            order_id,
            side,
            instrument,
            quantity,
            price,
            timestamp,
        })
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Check if nothing is left to trade
    pub fn is_filled(&self) -> bool {
        self.quantity == 0
    }

    /// Copy of this order carrying a different quantity
    pub fn with_quantity(&self, quantity: Quantity) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    /// Price negated for bids so that one ascending sort serves both sides
    pub fn signed_price(&self) -> Price {
        self.side.sign() * self.price
    }

    /// Book ordering key
    pub fn priority(&self) -> Priority<'_> {
        Priority {
            instrument: &self.instrument,
            side: self.side,
            signed_price: self.signed_price(),
            timestamp: self.timestamp,
        }
    }

    /// Compare two orders by book priority
    pub fn cmp_priority(&self, other: &Order) -> Ordering {
        self.priority().cmp(&other.priority())
    }

    /// Whether this order's price is compatible with a resting contra order
    pub fn crosses(&self, contra: &Order) -> bool {
        match self.side {
            Side::Buy => contra.price <= self.price,
            Side::Sell => contra.price >= self.price,
        }
    }

    /// Fill this order against a contra order
    ///
    /// Returns both orders unchanged and no trade when the sides match,
    /// either quantity is zero, or the prices do not cross. Otherwise both
    /// quantities drop by the matched amount and the trade is priced at the
    /// contra order's price.
    pub fn fill(&self, contra: &Order) -> Result<OrderFill> {
        if self.side == contra.side || self.quantity == 0 || contra.quantity == 0 {
            return Ok(OrderFill::unfilled(self.clone(), contra.clone()));
        }

        if !self.crosses(contra) {
            return Ok(OrderFill::unfilled(self.clone(), contra.clone()));
        }

        let matched = self.quantity.min(contra.quantity);
        let trade = Trade::new(self.with_quantity(matched), contra.with_quantity(matched))?;

        Ok(OrderFill {
            new_order: self.with_quantity(self.quantity - matched),
            new_contra_order: contra.with_quantity(contra.quantity - matched),
            trade: Some(trade),
        })
    }
}
