//! Trading rules: boolean predicates over a bar index and a trading record.
//!
//! Rules are pure with respect to the index and the record's state at call
//! time, so they can be re-evaluated freely and in any order within a bar.

pub mod cross;
pub mod stops;

use super::indicator::Indicator;
use super::record::TradingRecord;

pub use cross::{CrossedDownRule, CrossedUpRule};
pub use stops::{StopLossRule, TakeProfitRule};

pub trait Rule {
    fn is_satisfied(&self, index: usize, record: &TradingRecord) -> bool;
}

impl Rule for Box<dyn Rule> {
    fn is_satisfied(&self, index: usize, record: &TradingRecord) -> bool {
        (**self).is_satisfied(index, record)
    }
}

/// Satisfied when the first indicator is strictly greater than the second.
#[derive(Debug, Clone)]
pub struct OverIndicatorRule<A, B> {
    first: A,
    second: B,
}

impl<A: Indicator, B: Indicator> OverIndicatorRule<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: Indicator, B: Indicator> Rule for OverIndicatorRule<A, B> {
    fn is_satisfied(&self, index: usize, _record: &TradingRecord) -> bool {
        self.first.value(index) > self.second.value(index)
    }
}

/// Satisfied when the first indicator is strictly less than the second.
#[derive(Debug, Clone)]
pub struct UnderIndicatorRule<A, B> {
    first: A,
    second: B,
}

impl<A: Indicator, B: Indicator> UnderIndicatorRule<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: Indicator, B: Indicator> Rule for UnderIndicatorRule<A, B> {
    fn is_satisfied(&self, index: usize, _record: &TradingRecord) -> bool {
        self.first.value(index) < self.second.value(index)
    }
}

/// Satisfied when both wrapped rules are satisfied.
#[derive(Debug, Clone)]
pub struct AndRule<A, B> {
    left: A,
    right: B,
}

impl<A: Rule, B: Rule> AndRule<A, B> {
    pub fn new(left: A, right: B) -> Self {
        Self { left, right }
    }
}

impl<A: Rule, B: Rule> Rule for AndRule<A, B> {
    fn is_satisfied(&self, index: usize, record: &TradingRecord) -> bool {
        self.left.is_satisfied(index, record) && self.right.is_satisfied(index, record)
    }
}

/// Satisfied when either wrapped rule is satisfied.
#[derive(Debug, Clone)]
pub struct OrRule<A, B> {
    left: A,
    right: B,
}

impl<A: Rule, B: Rule> OrRule<A, B> {
    pub fn new(left: A, right: B) -> Self {
        Self { left, right }
    }
}

impl<A: Rule, B: Rule> Rule for OrRule<A, B> {
    fn is_satisfied(&self, index: usize, record: &TradingRecord) -> bool {
        self.left.is_satisfied(index, record) || self.right.is_satisfied(index, record)
    }
}

/// Satisfied when the wrapped rule is not.
#[derive(Debug, Clone)]
pub struct NotRule<R> {
    inner: R,
}

impl<R: Rule> NotRule<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Rule> Rule for NotRule<R> {
    fn is_satisfied(&self, index: usize, record: &TradingRecord) -> bool {
        !self.inner.is_satisfied(index, record)
    }
}
