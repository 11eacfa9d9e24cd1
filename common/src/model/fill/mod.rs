//! Result of a single fill attempt

use crate::decimal::Quantity;
use crate::model::order::Order;
use crate::model::trade::Trade;

/// Post-fill state of an aggressor and a contra order
///
/// Transient: produced by [`Order::fill`] and consumed by the matching loop.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderFill {
    /// The aggressor after this step
    pub new_order: Order,
    /// The contra order after this step
    pub new_contra_order: Order,
    /// The matched slice, if the orders crossed
    pub trade: Option<Trade>,
}

impl OrderFill {
    /// A fill attempt that matched nothing
    pub fn unfilled(order: Order, contra: Order) -> Self {
        Self {
            new_order: order,
            new_contra_order: contra,
            trade: None,
        }
    }

    /// Quantity matched in this step
    pub fn filled_quantity(&self) -> Quantity {
        self.trade.as_ref().map_or(0, Trade::quantity)
    }
}
