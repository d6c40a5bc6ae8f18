//! Exponential moving average.
//!
//! k = 2/(window+1), seeded with the value at index 0, then
//! EMA[i] = v[i]*k + EMA[i-1]*(1-k). Recomputed from the start of the series
//! on every call so the value is a pure function of the index.

use rust_decimal::Decimal;

use super::Indicator;
use crate::domain::error::TradesmithError;

#[derive(Debug, Clone)]
pub struct ExponentialMovingAverage<I> {
    inner: I,
    window: usize,
}

impl<I: Indicator> ExponentialMovingAverage<I> {
    pub fn new(inner: I, window: usize) -> Result<Self, TradesmithError> {
        if window == 0 {
            return Err(TradesmithError::ZeroWindow);
        }
        Ok(Self { inner, window })
    }

    fn smoothing(&self) -> Decimal {
        Decimal::from(2) / Decimal::from(self.window + 1)
    }
}

impl<I: Indicator> Indicator for ExponentialMovingAverage<I> {
    fn value(&self, index: usize) -> Decimal {
        let k = self.smoothing();
        let mut ema = self.inner.value(0);
        for i in 1..=index {
            ema = self.inner.value(i) * k + ema * (Decimal::ONE - k);
        }
        ema
    }
}
