//! Candle and time series storage.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::TradesmithError;

/// A single price bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

impl Candle {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> Decimal {
        (self.high + self.low + self.close) / Decimal::from(3)
    }
}

/// An ordered, append-only sequence of candles.
///
/// Candles must be added in strictly chronological order. Once built, a series
/// is shared read-only with indicators; nothing in the engine mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    candles: Vec<Candle>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_candles(candles: Vec<Candle>) -> Result<Self, TradesmithError> {
        let mut series = Self::new();
        for candle in candles {
            series.add_candle(candle)?;
        }
        Ok(series)
    }

    /// Append a candle. Rejects candles that are not strictly after the last.
    pub fn add_candle(&mut self, candle: Candle) -> Result<(), TradesmithError> {
        if let Some(last) = self.candles.last() {
            if candle.timestamp <= last.timestamp {
                return Err(TradesmithError::NonChronologicalCandle {
                    candle: candle.timestamp,
                    last: last.timestamp,
                });
            }
        }
        self.candles.push(candle);
        Ok(())
    }

    /// The candle at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`, as with slice indexing; an out-of-range
    /// index is a caller bug, not a recoverable condition.
    pub fn candle(&self, index: usize) -> &Candle {
        &self.candles[index]
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn last_candle(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
}
