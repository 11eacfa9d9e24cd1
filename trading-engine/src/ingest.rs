//! Turns raw instruction lines into orders
//!
//! An instruction is one line of five whitespace-separated fields:
//! order ID, side (`BUY`/`SELL`, any case), instrument symbol, integer
//! quantity and a positive price. A blank line or the end of input ends the
//! stream. Malformed lines surface as recoverable [`Error::Parse`] values and
//! do not end it.

use std::io::BufRead;

use chrono::{DateTime, Duration, Utc};
use common::decimal::{parse_price, Quantity};
use common::error::{Error, ParseFailure, Result};
use common::model::instrument::Instrument;
use common::model::order::{Order, Side};

/// Hands out strictly increasing arrival timestamps
///
/// Two instructions read within one tick of the system clock would otherwise
/// share a timestamp and lose their relative time priority.
#[derive(Debug, Default)]
pub struct ArrivalClock {
    last: Option<DateTime<Utc>>,
}

impl ArrivalClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next arrival time, later than every earlier one
    pub fn next(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last {
            Some(last) if now <= last => last + Duration::nanoseconds(1),
            _ => now,
        };
        self.last = Some(stamp);
        stamp
    }
}

/// Build an order from one instruction line
pub fn parse_order(line: &str, timestamp: DateTime<Utc>) -> Result<Order> {
    let reject = |cause: ParseFailure| Error::Parse {
        line: line.to_string(),
        cause,
    };

    let fields: Vec<&str> = line.split_whitespace().collect();
    let [order_id, side, symbol, quantity, price] = fields[..] else {
        return Err(reject(ParseFailure::FieldCount(fields.len())));
    };

    let side: Side = side.parse().map_err(reject)?;
    let quantity: Quantity = quantity
        .parse()
        .map_err(|e| reject(ParseFailure::Quantity(e)))?;
    let price = parse_price(price).map_err(|e| reject(ParseFailure::Price(e)))?;

    Order::new(order_id, side, Instrument::new(symbol), quantity, price, timestamp)
        .map_err(|e| reject(ParseFailure::Rejected(Box::new(e))))
}

/// Stream of orders read from a line source
///
/// Yields `Err(Error::Parse { .. })` for a malformed line, including one that
/// is not valid UTF-8, and keeps going; yields `Err(Error::Io(..))` once and
/// stops if reading fails.
pub struct Instructions<R> {
    reader: R,
    clock: ArrivalClock,
    buf: Vec<u8>,
    finished: bool,
}

impl<R: BufRead> Instructions<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            clock: ArrivalClock::new(),
            buf: Vec::new(),
            finished: false,
        }
    }
}

impl<R: BufRead> Iterator for Instructions<R> {
    type Item = Result<Order>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(_) => {
                let line = match std::str::from_utf8(&self.buf) {
                    Ok(line) => line,
                    Err(e) => {
                        let lossy = String::from_utf8_lossy(&self.buf);
                        return Some(Err(Error::Parse {
                            line: lossy.trim_end_matches(['\n', '\r']).to_string(),
                            cause: ParseFailure::Encoding(e),
                        }));
                    }
                };
                let text = line.trim_end_matches(['\n', '\r']);
                if text.trim().is_empty() {
                    self.finished = true;
                    return None;
                }
                let timestamp = self.clock.next();
                Some(parse_order(text, timestamp))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(Error::Io(e)))
            }
        }
    }
}
