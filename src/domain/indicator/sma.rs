//! Simple moving average.
//!
//! Mean of the trailing `window` values of the wrapped indicator. The window
//! is truncated at the start of the series, so index 0 averages a single
//! value and the indicator is defined at every index.

use rust_decimal::Decimal;

use super::Indicator;
use crate::domain::error::TradesmithError;

#[derive(Debug, Clone)]
pub struct SimpleMovingAverage<I> {
    inner: I,
    window: usize,
}

impl<I: Indicator> SimpleMovingAverage<I> {
    pub fn new(inner: I, window: usize) -> Result<Self, TradesmithError> {
        if window == 0 {
            return Err(TradesmithError::ZeroWindow);
        }
        Ok(Self { inner, window })
    }
}

impl<I: Indicator> Indicator for SimpleMovingAverage<I> {
    fn value(&self, index: usize) -> Decimal {
        let start = (index + 1).saturating_sub(self.window);
        let mut sum = Decimal::ZERO;
        for i in start..=index {
            sum += self.inner.value(i);
        }
        sum / Decimal::from(index + 1 - start)
    }
}
