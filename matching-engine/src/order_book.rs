//! Order book implementation for price-time priority matching

use std::cmp::Ordering;

use common::decimal::{Price, Quantity};
use common::model::instrument::Instrument;
use common::model::order::{Order, Side};

/// One side of an instrument's book
///
/// Orders are kept in a vector sorted best-first by [`Order::cmp_priority`]:
/// highest bid or lowest ask first, earlier arrival first at equal prices.
/// Filled orders are purged after every matching pass, so a side never holds
/// a zero-quantity order between passes.
#[derive(Debug, Clone)]
pub struct BookSide {
    side: Side,
    orders: Vec<Order>,
}

impl BookSide {
    /// Create a new empty side
    pub fn new(side: Side) -> Self {
        Self {
            side,
            orders: Vec::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Insert an order at the position that keeps the side sorted
    ///
    /// Binary search for the first order ranked strictly after the new one,
    /// so an order whose key ties an existing one queues behind it.
    pub fn insert(&mut self, order: Order) {
        debug_assert_eq!(order.side(), self.side);
        let position = self
            .orders
            .partition_point(|resting| resting.cmp_priority(&order) != Ordering::Greater);
        self.orders.insert(position, order);
    }

    /// Remove every order with nothing left to trade, keeping survivors in order
    pub fn purge_filled(&mut self) -> usize {
        let before = self.orders.len();
        self.orders.retain(|order| !order.is_filled());
        before - self.orders.len()
    }

    /// Resting orders, best first
    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Order> {
        self.orders.iter_mut()
    }

    /// Resting orders, best first
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// The order matched first against an incoming contra order
    pub fn best(&self) -> Option<&Order> {
        self.orders.first()
    }

    pub fn best_price(&self) -> Option<Price> {
        self.best().map(Order::price)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Total resting quantity on this side
    pub fn total_quantity(&self) -> Quantity {
        self.orders.iter().map(Order::quantity).sum()
    }

    /// Aggregated quantity per price level, best level first
    pub fn price_levels(&self, limit: usize) -> Vec<(Price, Quantity)> {
        let mut levels: Vec<(Price, Quantity)> = Vec::new();
        for order in &self.orders {
            match levels.last_mut() {
                Some((price, quantity)) if *price == order.price() => *quantity += order.quantity(),
                _ => {
                    if levels.len() == limit {
                        break;
                    }
                    levels.push((order.price(), order.quantity()));
                }
            }
        }
        levels
    }

    /// Find a resting order by ID
    pub fn find(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|order| order.order_id() == order_id)
    }

    /// Whether the side is sorted best-first
    pub fn is_sorted(&self) -> bool {
        self.orders
            .windows(2)
            .all(|pair| pair[0].cmp_priority(&pair[1]) != Ordering::Greater)
    }
}

/// Order book for a single instrument
#[derive(Debug, Clone)]
pub struct OrderBook {
    /// Instrument this book trades
    instrument: Instrument,
    /// Buy side (bids)
    bids: BookSide,
    /// Sell side (asks)
    asks: BookSide,
}

impl OrderBook {
    /// Create a new empty order book for the given instrument
    pub fn new(instrument: Instrument) -> Self {
        Self {
            instrument,
            bids: BookSide::new(Side::Buy),
            asks: BookSide::new(Side::Sell),
        }
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    /// Add a resting order to its own side
    pub fn add_order(&mut self, order: Order) {
        self.side_mut(order.side()).insert(order);
    }

    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    // Get a reference to the bids side
    pub fn bids(&self) -> &BookSide {
        &self.bids
    }

    /// Get a reference to the asks side
    pub fn asks(&self) -> &BookSide {
        &self.asks
    }

    /// Get the best bid price
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Get the best ask price
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Get the current spread
    pub fn spread(&self) -> Option<Price> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Whether the best bid reaches the best ask, i.e. a match was missed
    pub fn is_crossed(&self) -> bool {
        matches!((self.best_bid(), self.best_ask()), (Some(bid), Some(ask)) if bid >= ask)
    }

    /// Get bid price levels with quantities (for market data)
    pub fn bid_levels(&self, limit: usize) -> Vec<(Price, Quantity)> {
        self.bids.price_levels(limit)
    }

    /// Get ask price levels with quantities (for market data)
    pub fn ask_levels(&self, limit: usize) -> Vec<(Price, Quantity)> {
        self.asks.price_levels(limit)
    }
}
