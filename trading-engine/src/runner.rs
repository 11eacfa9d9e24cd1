//! The instruction loop

use std::io::{BufRead, Write};

use common::error::{Error, Result};
use matching_engine::MatchingEngine;
use tracing::{info, warn};

use crate::config::OutputFormat;
use crate::ingest::Instructions;
use crate::render::{write_order, write_trade};

/// Counters for one run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Orders handed to the engine
    pub accepted: usize,
    /// Malformed lines skipped
    pub rejected: usize,
    /// Trades produced
    pub trades: usize,
}

/// Feed every instruction to the engine, then dump the resting book
///
/// Trades are written to `out` as they happen. Malformed lines are reported
/// on `err` and skipped. Once input ends the resting book is written: all
/// sell orders, then all buy orders. The book is written even when reading
/// the input failed; that failure is returned afterwards. Errors from the
/// engine itself abort the run immediately.
pub fn run<E, R, W, X>(
    engine: &E,
    input: R,
    out: &mut W,
    err: &mut X,
    format: OutputFormat,
) -> Result<RunSummary>
where
    E: MatchingEngine + ?Sized,
    R: BufRead,
    W: Write,
    X: Write,
{
    let mut summary = RunSummary::default();
    let mut read_failure = None;

    for instruction in Instructions::new(input) {
        let order = match instruction {
            Ok(order) => order,
            Err(e) if e.is_recoverable() => {
                warn!("{}", e);
                writeln!(err, "{}", e)?;
                summary.rejected += 1;
                continue;
            }
            Err(e) => {
                writeln!(err, "{}", e)?;
                read_failure = Some(e);
                break;
            }
        };

        summary.accepted += 1;
        let trades = engine.match_order(order)?;
        for trade in &trades {
            write_trade(out, trade, format)?;
        }
        summary.trades += trades.len();
    }

    for order in engine.sell_orders() {
        write_order(out, &order, format)?;
    }
    for order in engine.buy_orders() {
        write_order(out, &order, format)?;
    }
    out.flush()?;

    info!(
        "Processed {} orders, rejected {} lines, produced {} trades",
        summary.accepted, summary.rejected, summary.trades
    );

    match read_failure {
        Some(e) => Err(e),
        None => Ok(summary),
    }
}

/// Whether a run error came from the input rather than the engine
pub fn is_input_failure(error: &Error) -> bool {
    matches!(error, Error::Io(_))
}
