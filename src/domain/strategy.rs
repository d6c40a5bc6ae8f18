//! Strategy: an entry/exit rule pairing.

use super::record::TradingRecord;
use super::rule::Rule;

/// Pairs an entry rule with an exit rule and gates both behind an unstable
/// period: the number of initial bars on which indicators are not yet
/// meaningful and no trades should be taken.
#[derive(Debug, Clone)]
pub struct RuleStrategy<E, X> {
    entry_rule: E,
    exit_rule: X,
    unstable_period: usize,
}

impl<E: Rule, X: Rule> RuleStrategy<E, X> {
    pub fn new(entry_rule: E, exit_rule: X, unstable_period: usize) -> Self {
        Self {
            entry_rule,
            exit_rule,
            unstable_period,
        }
    }

    /// True when there is no open position and the entry rule fires.
    pub fn should_enter(&self, index: usize, record: &TradingRecord) -> bool {
        index >= self.unstable_period
            && record.current_position().is_new()
            && self.entry_rule.is_satisfied(index, record)
    }

    /// True when the current position is open and the exit rule fires.
    pub fn should_exit(&self, index: usize, record: &TradingRecord) -> bool {
        index >= self.unstable_period
            && record.current_position().is_open()
            && self.exit_rule.is_satisfied(index, record)
    }
}
