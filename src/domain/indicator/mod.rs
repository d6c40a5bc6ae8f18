//! Indicators: pure functions from a bar index to a decimal value.
//!
//! An indicator is defined for every index of its underlying series and holds
//! no per-run state, so indicators can be shared read-only across runs.
//! Composite indicators recompute from their inputs on every call rather
//! than caching.

pub mod ema;
pub mod sma;

use std::sync::Arc;

use rust_decimal::Decimal;

use super::series::TimeSeries;

pub use ema::ExponentialMovingAverage;
pub use sma::SimpleMovingAverage;

pub trait Indicator {
    /// The indicator's value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range for the underlying series, as with
    /// slice indexing.
    fn value(&self, index: usize) -> Decimal;
}

/// Close price of the candle at each index.
#[derive(Debug, Clone)]
pub struct ClosePriceIndicator {
    series: Arc<TimeSeries>,
}

impl ClosePriceIndicator {
    pub fn new(series: Arc<TimeSeries>) -> Self {
        Self { series }
    }
}

impl Indicator for ClosePriceIndicator {
    fn value(&self, index: usize) -> Decimal {
        self.series.candle(index).close
    }
}

/// (high + low + close) / 3 of the candle at each index.
#[derive(Debug, Clone)]
pub struct TypicalPriceIndicator {
    series: Arc<TimeSeries>,
}

impl TypicalPriceIndicator {
    pub fn new(series: Arc<TimeSeries>) -> Self {
        Self { series }
    }
}

impl Indicator for TypicalPriceIndicator {
    fn value(&self, index: usize) -> Decimal {
        self.series.candle(index).typical_price()
    }
}

/// Traded volume of the candle at each index.
#[derive(Debug, Clone)]
pub struct VolumeIndicator {
    series: Arc<TimeSeries>,
}

impl VolumeIndicator {
    pub fn new(series: Arc<TimeSeries>) -> Self {
        Self { series }
    }
}

impl Indicator for VolumeIndicator {
    fn value(&self, index: usize) -> Decimal {
        self.series.candle(index).volume
    }
}

/// The same value at every index. Used to compare an indicator against a
/// threshold.
#[derive(Debug, Clone)]
pub struct ConstantIndicator {
    value: Decimal,
}

impl ConstantIndicator {
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }
}

impl Indicator for ConstantIndicator {
    fn value(&self, _index: usize) -> Decimal {
        self.value
    }
}

/// Explicit per-index values.
#[derive(Debug, Clone)]
pub struct FixedIndicator {
    values: Vec<Decimal>,
}

impl FixedIndicator {
    pub fn new(values: Vec<Decimal>) -> Self {
        Self { values }
    }
}

impl Indicator for FixedIndicator {
    fn value(&self, index: usize) -> Decimal {
        self.values[index]
    }
}
