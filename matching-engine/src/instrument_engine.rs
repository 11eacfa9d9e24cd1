//! Matching engine for a single instrument

use common::decimal::{Price, Quantity};
use common::error::{Error, Result};
use common::model::instrument::Instrument;
use common::model::order::Order;
use common::model::trade::Trade;
use parking_lot::RwLock;
use tracing::{debug, error};

use crate::engine::MatchingEngine;
use crate::order_book::{BookSide, OrderBook};

/// Matches orders of one instrument against its two-sided book
///
/// A new sell walks the bids from the highest price down, a new buy walks
/// the asks from the lowest price up, each until it is filled or the next
/// resting order no longer crosses. Any remainder rests on its own side.
///
/// The whole pass (walk, purge, insert) runs under the book's write lock, so
/// two orders for the same instrument never interleave.
pub struct InstrumentMatchingEngine {
    instrument: Instrument,
    book: RwLock<OrderBook>,
}

impl InstrumentMatchingEngine {
    /// Create an engine with an empty book
    pub fn new(instrument: Instrument) -> Self {
        let book = OrderBook::new(instrument.clone());
        Self {
            instrument,
            book: RwLock::new(book),
        }
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    /// Copy of both sides taken under one lock
    pub fn snapshot(&self) -> OrderBook {
        self.book.read().clone()
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.book.read().best_bid()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.book.read().best_ask()
    }

    /// Bid and ask price levels, best first
    pub fn depth(&self, limit: usize) -> (Vec<(Price, Quantity)>, Vec<(Price, Quantity)>) {
        let book = self.book.read();
        (book.bid_levels(limit), book.ask_levels(limit))
    }

    /// Find a resting order by ID on either side
    pub fn find_order(&self, order_id: &str) -> Option<Order> {
        let book = self.book.read();
        book.bids()
            .find(order_id)
            .or_else(|| book.asks().find(order_id))
            .cloned()
    }

    /// Walk the contra side best-first, filling the order as far as it crosses
    ///
    /// Stops at the first resting order that leaves the aggressor unchanged:
    /// the side is sorted, so nothing behind it can cross either. Returns the
    /// unfilled remainder and the trades in execution order.
    fn fill_order(mut order: Order, contra_side: &mut BookSide) -> Result<(Order, Vec<Trade>)> {
        let mut trades = Vec::new();

        for resting in contra_side.iter_mut() {
            let fill = order.fill(resting)?;
            if fill.filled_quantity() == 0 {
                break;
            }

            if let Some(trade) = fill.trade {
                debug!(
                    instrument = %trade.instrument(),
                    aggressor = trade.aggressor().order_id(),
                    contra = trade.contra().order_id(),
                    quantity = trade.quantity(),
                    price = %trade.price(),
                    "Filled"
                );
                trades.push(trade);
            }
            order = fill.new_order;
            *resting = fill.new_contra_order;
        }

        let purged = contra_side.purge_filled();
        if purged > 0 {
            debug!("Removed {} filled {} orders", purged, contra_side.side());
        }

        Ok((order, trades))
    }
}

impl MatchingEngine for InstrumentMatchingEngine {
    fn match_order(&self, order: Order) -> Result<Vec<Trade>> {
        if order.instrument() != &self.instrument {
            error!(
                "Order {} for {} reached the {} engine",
                order.order_id(),
                order.instrument(),
                self.instrument
            );
            return Err(Error::InstrumentMismatch {
                expected: self.instrument.clone(),
                actual: order.instrument().clone(),
            });
        }

        // Get exclusive access to the order book
        let mut book = self.book.write();

        let contra_side = book.side_mut(order.side().opposite());
        let (remaining, trades) = Self::fill_order(order, contra_side)?;

        // Keep the unmatched remainder
        if !remaining.is_filled() {
            debug!(
                "Resting {} {} {} @ {}",
                remaining.order_id(),
                remaining.side(),
                remaining.quantity(),
                remaining.price()
            );
            book.add_order(remaining);
        }

        Ok(trades)
    }

    fn buy_orders(&self) -> Vec<Order> {
        self.book.read().bids().orders().to_vec()
    }

    fn sell_orders(&self) -> Vec<Order> {
        self.book.read().asks().orders().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use common::model::order::Side;
    use rust_decimal_macros::dec;

    struct Clock(i64);

    impl Clock {
        fn order(&mut self, id: &str, side: Side, quantity: Quantity, price: Price) -> Order {
            self.0 += 1;
            Order::new(
                id,
                side,
                Instrument::new("ETHUSD"),
                quantity,
                price,
                DateTime::<Utc>::UNIX_EPOCH + Duration::milliseconds(self.0),
            )
            .unwrap()
        }
    }

    fn engine() -> InstrumentMatchingEngine {
        InstrumentMatchingEngine::new(Instrument::new("ETHUSD"))
    }

    #[test]
    fn test_partial_fill_rests_remainder() {
        let engine = engine();
        let mut clock = Clock(0);
        let resting = engine.match_order(clock.order("S1", Side::Sell, 4, dec!(100))).unwrap();
        assert!(resting.is_empty());

        let trades = engine.match_order(clock.order("B1", Side::Buy, 10, dec!(100))).unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity(), 4);
        assert_eq!(trades[0].price(), dec!(100));
        assert!(engine.sell_orders().is_empty());
        let bids = engine.buy_orders();
        assert_eq!(bids.len(), 1);
        assert_eq!(bids[0].order_id(), "B1");
        assert_eq!(bids[0].quantity(), 6);
        assert_eq!(bids[0].price(), dec!(100));
    }

    #[test]
    fn test_multi_level_fill() {
        let engine = engine();
        let mut clock = Clock(0);
        engine.match_order(clock.order("S1", Side::Sell, 5, dec!(99))).unwrap();
        engine.match_order(clock.order("S2", Side::Sell, 5, dec!(100))).unwrap();

        let trades = engine.match_order(clock.order("B1", Side::Buy, 8, dec!(100))).unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!((trades[0].quantity(), trades[0].price()), (5, dec!(99)));
        assert_eq!(trades[0].contra().order_id(), "S1");
        assert_eq!((trades[1].quantity(), trades[1].price()), (3, dec!(100)));
        assert_eq!(trades[1].contra().order_id(), "S2");

        assert!(engine.buy_orders().is_empty());
        let asks = engine.sell_orders();
        assert_eq!(asks.len(), 1);
        assert_eq!(asks[0].order_id(), "S2");
        assert_eq!(asks[0].quantity(), 2);
    }

    #[test]
    fn test_no_match_rests_order() {
        let engine = engine();
        let mut clock = Clock(0);
        engine.match_order(clock.order("S1", Side::Sell, 5, dec!(100))).unwrap();

        let trades = engine.match_order(clock.order("B1", Side::Buy, 5, dec!(90))).unwrap();

        assert!(trades.is_empty());
        assert_eq!(engine.sell_orders()[0].quantity(), 5);
        assert_eq!(engine.buy_orders()[0].order_id(), "B1");
        assert_eq!(engine.best_bid(), Some(dec!(90)));
        assert_eq!(engine.best_ask(), Some(dec!(100)));
    }

    #[test]
    fn test_walk_stops_at_first_non_crossing_level() {
        let engine = engine();
        let mut clock = Clock(0);
        engine.match_order(clock.order("B1", Side::Buy, 2, dec!(101))).unwrap();
        engine.match_order(clock.order("B2", Side::Buy, 2, dec!(100))).unwrap();
        engine.match_order(clock.order("B3", Side::Buy, 2, dec!(98))).unwrap();

        let trades = engine.match_order(clock.order("S1", Side::Sell, 10, dec!(99))).unwrap();

        let contras: Vec<_> = trades.iter().map(|t| t.contra().order_id()).collect();
        assert_eq!(contras, ["B1", "B2"]);
        assert_eq!(trades[0].price(), dec!(101));
        assert_eq!(trades[1].price(), dec!(100));

        let bids = engine.buy_orders();
        assert_eq!(bids.len(), 1);
        assert_eq!(bids[0].order_id(), "B3");
        let asks = engine.sell_orders();
        assert_eq!(asks[0].quantity(), 6);
        assert!(!engine.snapshot().is_crossed());
    }

    #[test]
    fn test_time_priority_at_equal_price() {
        let engine = engine();
        let mut clock = Clock(0);
        engine.match_order(clock.order("S1", Side::Sell, 1, dec!(100))).unwrap();
        engine.match_order(clock.order("S2", Side::Sell, 1, dec!(100))).unwrap();

        let trades = engine.match_order(clock.order("B1", Side::Buy, 1, dec!(100))).unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].contra().order_id(), "S1");
        assert_eq!(engine.sell_orders()[0].order_id(), "S2");
    }

    #[test]
    fn test_exact_fill_consumes_both() {
        let engine = engine();
        let mut clock = Clock(0);
        engine.match_order(clock.order("B1", Side::Buy, 3, dec!(50))).unwrap();
        let trades = engine.match_order(clock.order("S1", Side::Sell, 3, dec!(50))).unwrap();

        assert_eq!(trades.len(), 1);
        assert!(engine.buy_orders().is_empty());
        assert!(engine.sell_orders().is_empty());
    }

    #[test]
    fn test_zero_quantity_order_is_discarded() {
        let engine = engine();
        let mut clock = Clock(0);
        engine.match_order(clock.order("S1", Side::Sell, 3, dec!(50))).unwrap();
        let trades = engine.match_order(clock.order("B0", Side::Buy, 0, dec!(60))).unwrap();

        assert!(trades.is_empty());
        assert!(engine.buy_orders().is_empty());
        assert_eq!(engine.sell_orders()[0].quantity(), 3);
    }

    #[test]
    fn test_rejects_order_for_other_instrument() {
        let engine = engine();
        let order =
            Order::new("X", Side::Buy, Instrument::new("BTCUSD"), 1, dec!(1), Utc::now()).unwrap();

        let result = engine.match_order(order);

        assert!(matches!(result, Err(Error::InstrumentMismatch { .. })));
        assert!(engine.buy_orders().is_empty());
        assert!(engine.sell_orders().is_empty());
    }

    #[test]
    fn test_depth_and_find_order() {
        let engine = engine();
        let mut clock = Clock(0);
        engine.match_order(clock.order("B1", Side::Buy, 1, dec!(99))).unwrap();
        engine.match_order(clock.order("B2", Side::Buy, 2, dec!(99))).unwrap();
        engine.match_order(clock.order("S1", Side::Sell, 4, dec!(101))).unwrap();

        let (bids, asks) = engine.depth(5);
        assert_eq!(bids, vec![(dec!(99), 3)]);
        assert_eq!(asks, vec![(dec!(101), 4)]);
        assert_eq!(engine.find_order("B2").map(|o| o.quantity()), Some(2));
        assert!(engine.find_order("missing").is_none());
    }
}
