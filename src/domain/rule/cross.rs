//! Cross detection: the instant one indicator overtakes another.

use std::cmp::Ordering;

use super::Rule;
use crate::domain::indicator::Indicator;
use crate::domain::record::TradingRecord;

/// Satisfied at the first index where `lower` has moved strictly above
/// `upper`, having been strictly below it at some earlier index.
///
/// Runs of exact equality between the two indicators are inconclusive: the
/// backward confirmation scan skips over them. A history that is all ties
/// before the triggering index confirms no cross.
#[derive(Debug, Clone)]
pub struct CrossedUpRule<U, L> {
    upper: U,
    lower: L,
}

impl<U: Indicator, L: Indicator> CrossedUpRule<U, L> {
    pub fn new(upper: U, lower: L) -> Self {
        Self { upper, lower }
    }
}

impl<U: Indicator, L: Indicator> Rule for CrossedUpRule<U, L> {
    fn is_satisfied(&self, index: usize, _record: &TradingRecord) -> bool {
        crossed(&self.lower, &self.upper, Ordering::Greater, index)
    }
}

/// The mirror of [`CrossedUpRule`]: satisfied at the first index where
/// `upper` has moved strictly below `lower`.
#[derive(Debug, Clone)]
pub struct CrossedDownRule<U, L> {
    upper: U,
    lower: L,
}

impl<U: Indicator, L: Indicator> CrossedDownRule<U, L> {
    pub fn new(upper: U, lower: L) -> Self {
        Self { upper, lower }
    }
}

impl<U: Indicator, L: Indicator> Rule for CrossedDownRule<U, L> {
    fn is_satisfied(&self, index: usize, _record: &TradingRecord) -> bool {
        crossed(&self.upper, &self.lower, Ordering::Less, index)
    }
}

/// A cross has completed at `index` when the three-way sign of
/// `moving.value(i) - reference.value(i)` equals `target` at `index`, and the
/// most recent non-tie sign before it was the opposite.
///
/// The sign at each scanned index is computed once and matched against all
/// three outcomes.
fn crossed<M, R>(moving: &M, reference: &R, target: Ordering, index: usize) -> bool
where
    M: Indicator,
    R: Indicator,
{
    if index == 0 {
        return false;
    }
    if moving.value(index).cmp(&reference.value(index)) != target {
        return false;
    }
    for i in (0..index).rev() {
        match moving.value(i).cmp(&reference.value(i)) {
            // The crossed state was already reached earlier: fire only once,
            // at the transition.
            sign if sign == target => return false,
            // Ties are inconclusive; keep scanning.
            Ordering::Equal => continue,
            // Opposite sign: the cross happened between here and `index`.
            _ => return true,
        }
    }
    false
}
