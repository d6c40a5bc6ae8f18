//! Position-protecting exit rules.
//!
//! Both rules read the record's current position on every call; nothing about
//! the entry is cached between calls.

use std::sync::Arc;

use rust_decimal::Decimal;

use super::Rule;
use crate::domain::indicator::{ClosePriceIndicator, Indicator};
use crate::domain::record::TradingRecord;
use crate::domain::series::TimeSeries;

/// Satisfied when the close price has fallen to or below the loss tolerance
/// relative to the entrance price.
///
/// `tolerance` is a fraction of the entrance price and is typically negative:
/// -0.05 triggers once the close is at or below 95% of the entrance price.
#[derive(Debug, Clone)]
pub struct StopLossRule {
    prices: ClosePriceIndicator,
    threshold: Decimal,
}

impl StopLossRule {
    pub fn new(series: Arc<TimeSeries>, tolerance: Decimal) -> Self {
        Self {
            prices: ClosePriceIndicator::new(series),
            threshold: Decimal::ONE + tolerance,
        }
    }
}

impl Rule for StopLossRule {
    fn is_satisfied(&self, index: usize, record: &TradingRecord) -> bool {
        let position = record.current_position();
        if !position.is_open() {
            return false;
        }
        let Some(entrance) = position.entrance_order() else {
            return false;
        };
        self.prices.value(index) / entrance.price <= self.threshold
    }
}

/// Satisfied when the close value of the position's amount has gained the
/// profit tolerance relative to the cost basis.
///
/// `tolerance` is typically positive: 0.1 triggers once the position is worth
/// at least 110% of what it cost. Normalizing by cost basis rather than raw
/// entrance price keeps the rule amount-aware.
#[derive(Debug, Clone)]
pub struct TakeProfitRule {
    prices: ClosePriceIndicator,
    threshold: Decimal,
}

impl TakeProfitRule {
    pub fn new(series: Arc<TimeSeries>, tolerance: Decimal) -> Self {
        Self {
            prices: ClosePriceIndicator::new(series),
            threshold: Decimal::ONE + tolerance,
        }
    }
}

impl Rule for TakeProfitRule {
    fn is_satisfied(&self, index: usize, record: &TradingRecord) -> bool {
        let position = record.current_position();
        if !position.is_open() {
            return false;
        }
        let Some(entrance) = position.entrance_order() else {
            return false;
        };
        let Ok(cost_basis) = position.cost_basis() else {
            return false;
        };
        self.prices.value(index) * entrance.amount / cost_basis >= self.threshold
    }
}
