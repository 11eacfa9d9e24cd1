//! Trade models and related types

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::decimal::{Price, Quantity};
use crate::error::{Error, Result};
use crate::model::instrument::Instrument;
use crate::model::order::Order;

/// One matched slice between an aggressor and a resting order
///
/// Both legs carry the matched quantity. The trade executes at the resting
/// (contra) order's price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    /// Unique trade ID
    id: Uuid,
    /// The incoming order, sized to the matched quantity
    aggressor: Order,
    /// The resting order, sized to the matched quantity
    contra: Order,
    /// Timestamp when the trade occurred
    executed_at: DateTime<Utc>,
}

impl Trade {
    /// Create a trade from the two filled legs
    pub fn new(aggressor: Order, contra: Order) -> Result<Self> {
        if aggressor.quantity() == 0 || contra.quantity() == 0 {
            return Err(Error::InvalidTrade(format!(
                "trade between {} and {} must have a positive quantity",
                aggressor.order_id(),
                contra.order_id()
            )));
        }
        if aggressor.quantity() != contra.quantity() {
            return Err(Error::InvalidTrade(format!(
                "order {} quantity {} differs from contra order {} quantity {}",
                aggressor.order_id(),
                aggressor.quantity(),
                contra.order_id(),
                contra.quantity()
            )));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            aggressor,
            contra,
            executed_at: Utc::now(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn aggressor(&self) -> &Order {
        &self.aggressor
    }

    pub fn contra(&self) -> &Order {
        &self.contra
    }

    pub fn executed_at(&self) -> DateTime<Utc> {
        self.executed_at
    }

    pub fn instrument(&self) -> &Instrument {
        self.aggressor.instrument()
    }

    /// Matched quantity
    pub fn quantity(&self) -> Quantity {
        self.aggressor.quantity()
    }

    /// Execution price, always the resting order's price
    pub fn price(&self) -> Price {
        self.contra.price()
    }
}
