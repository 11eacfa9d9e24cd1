//! Output formatting for trades and resting orders

use std::fmt;
use std::io::Write;

use common::error::Result;
use common::model::order::Order;
use common::model::trade::Trade;

use crate::config::OutputFormat;

/// A trade as one tab-separated line:
/// `TRADE`, symbol, aggressor ID, contra ID, quantity, price
pub struct TradeLine<'a>(pub &'a Trade);

impl fmt::Display for TradeLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trade = self.0;
        write!(
            f,
            "TRADE\t{}\t{}\t{}\t{}\t{}",
            trade.instrument(),
            trade.aggressor().order_id(),
            trade.contra().order_id(),
            trade.quantity(),
            trade.price()
        )
    }
}

/// A resting order as one tab-separated line:
/// ID, side, symbol, quantity, price
pub struct OrderLine<'a>(pub &'a Order);

impl fmt::Display for OrderLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = self.0;
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            order.order_id(),
            order.side(),
            order.instrument(),
            order.quantity(),
            order.price()
        )
    }
}

pub fn write_trade<W: Write>(out: &mut W, trade: &Trade, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "{}", TradeLine(trade))?,
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, trade)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

pub fn write_order<W: Write>(out: &mut W, order: &Order, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "{}", OrderLine(order))?,
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, order)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
