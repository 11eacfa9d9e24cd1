use std::sync::Arc;

use common::decimal::{Price, Quantity};
use common::error::Result;
use common::model::instrument::Instrument;
use common::model::order::Order;
use common::model::trade::Trade;
use dashmap::DashMap;
use tracing::{debug, info};

use crate::instrument_engine::InstrumentMatchingEngine;

/// Capability shared by the per-instrument engines and the router over them
pub trait MatchingEngine: Send + Sync {
    /// Match an order against the resting book and rest any remainder
    ///
    /// Blocks until matching completes and returns every trade the order
    /// produced, in execution order.
    fn match_order(&self, order: Order) -> Result<Vec<Trade>>;

    /// Resting buy orders
    fn buy_orders(&self) -> Vec<Order>;

    /// Resting sell orders
    fn sell_orders(&self) -> Vec<Order>;
}

/// Routes orders to one engine per instrument
///
/// Engines are created on the first order for an instrument and live as
/// long as the system. Orders for different instruments match in parallel;
/// orders for the same instrument are serialized by that engine's book lock.
pub struct MatchingEngineSystem {
    /// Map of instruments to their engines
    engines: DashMap<Instrument, Arc<InstrumentMatchingEngine>>,
}

impl Default for MatchingEngineSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingEngineSystem {
    /// Create a new matching engine system
    pub fn new() -> Self {
        Self {
            engines: DashMap::new(),
        }
    }

    /// Get the engine for an instrument, creating it if this is the first sight
    ///
    /// Creation goes through the map entry, which holds the shard lock, so
    /// two callers racing on a new instrument end up sharing one engine.
    fn engine_for(&self, instrument: &Instrument) -> Arc<InstrumentMatchingEngine> {
        if let Some(engine) = self.engines.get(instrument) {
            return engine.value().clone();
        }

        self.engines
            .entry(instrument.clone())
            .or_insert_with(|| {
                info!("Creating matching engine for {}", instrument);
                Arc::new(InstrumentMatchingEngine::new(instrument.clone()))
            })
            .value()
            .clone()
    }

    /// Get the engine for an instrument if one exists
    pub fn engine(&self, instrument: &Instrument) -> Option<Arc<InstrumentMatchingEngine>> {
        self.engines.get(instrument).map(|engine| engine.value().clone())
    }

    /// Instruments seen so far, sorted by symbol
    pub fn instruments(&self) -> Vec<Instrument> {
        let mut instruments: Vec<_> = self.engines.iter().map(|e| e.key().clone()).collect();
        instruments.sort();
        instruments
    }

    /// Get market depth for an instrument
    pub fn depth(
        &self,
        instrument: &Instrument,
        limit: usize,
    ) -> Option<(Vec<(Price, Quantity)>, Vec<(Price, Quantity)>)> {
        self.engine(instrument).map(|engine| engine.depth(limit))
    }

    /// Find a resting order by ID across every instrument
    pub fn find_order(&self, order_id: &str) -> Option<Order> {
        self.engines()
            .iter()
            .find_map(|engine| engine.find_order(order_id))
    }

    // Engines are collected first so no map shard stays locked while books are read
    fn engines(&self) -> Vec<Arc<InstrumentMatchingEngine>> {
        self.engines.iter().map(|e| e.value().clone()).collect()
    }
}

impl MatchingEngine for MatchingEngineSystem {
    fn match_order(&self, order: Order) -> Result<Vec<Trade>> {
        debug!("Routing order {} to {}", order.order_id(), order.instrument());
        let engine = self.engine_for(order.instrument());
        engine.match_order(order)
    }

    /// Resting buy orders of every instrument
    ///
    /// Each instrument's orders appear best-first and are read under that
    /// instrument's lock. The relative order of instruments is unspecified,
    /// and different instruments may be observed at different moments.
    fn buy_orders(&self) -> Vec<Order> {
        self.engines()
            .iter()
            .flat_map(|engine| engine.buy_orders())
            .collect()
    }

    /// Resting sell orders of every instrument, with the same guarantees as
    /// [`MatchingEngine::buy_orders`]
    fn sell_orders(&self) -> Vec<Order> {
        self.engines()
            .iter()
            .flat_map(|engine| engine.sell_orders())
            .collect()
    }
}
