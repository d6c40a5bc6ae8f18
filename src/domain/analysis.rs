//! Trade analyses: fold a finished trading record into a summary number.
//!
//! Analyses accumulate in `Decimal` and convert to `f64` only at the
//! reporting boundary. Division never silently produces NaN or infinity;
//! a zero divisor surfaces as [`TradesmithError::DivisionByZero`].

use std::cell::RefCell;
use std::io::Write;
use std::sync::Arc;

use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::error::TradesmithError;
use super::order::{Order, OrderSide};
use super::position::Position;
use super::record::TradingRecord;
use super::series::TimeSeries;

pub trait Analysis {
    fn analyze(&self, record: &TradingRecord) -> Result<f64, TradesmithError>;
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Realized profit of a closed trade, sign-flipped for shorts.
fn realized_profit(trade: &Position) -> Result<Decimal, TradesmithError> {
    let gain = trade.exit_value()? - trade.cost_basis()?;
    if trade.is_short() {
        Ok(-gain)
    } else {
        Ok(gain)
    }
}

/// Whether a closed trade's exit price beat its entrance price, direction
/// aware.
fn is_winning(trade: &Position) -> bool {
    match (trade.entrance_order(), trade.exit_order()) {
        (Some(entrance), Some(exit)) => {
            (trade.is_long() && exit.price > entrance.price)
                || (trade.is_short() && exit.price < entrance.price)
        }
        _ => false,
    }
}

/// Sum of realized profit over all closed trades. Empty record analyzes to 0.
pub struct TotalProfitAnalysis;

impl Analysis for TotalProfitAnalysis {
    fn analyze(&self, record: &TradingRecord) -> Result<f64, TradesmithError> {
        let mut total = Decimal::ZERO;
        for trade in record.closed_trades() {
            total += realized_profit(trade)?;
        }
        Ok(to_f64(total))
    }
}

/// Gain of the last exit value relative to the first cost basis. Empty record
/// analyzes to 0.
pub struct PercentGainAnalysis;

impl Analysis for PercentGainAnalysis {
    fn analyze(&self, record: &TradingRecord) -> Result<f64, TradesmithError> {
        let trades = record.closed_trades();
        let (Some(first), Some(last)) = (trades.first(), trades.last()) else {
            return Ok(0.0);
        };
        let ratio = last
            .exit_value()?
            .checked_div(first.cost_basis()?)
            .ok_or(TradesmithError::DivisionByZero {
                context: "percent gain",
            })?;
        Ok(to_f64(ratio - Decimal::ONE))
    }
}

/// Number of completed trades.
pub struct NumTradesAnalysis;

impl Analysis for NumTradesAnalysis {
    fn analyze(&self, record: &TradingRecord) -> Result<f64, TradesmithError> {
        Ok(record.closed_trades().len() as f64)
    }
}

/// Number of completed trades whose exit value beat (long) or undercut
/// (short) their cost basis.
pub struct ProfitableTradesAnalysis;

impl Analysis for ProfitableTradesAnalysis {
    fn analyze(&self, record: &TradingRecord) -> Result<f64, TradesmithError> {
        let mut profitable = 0usize;
        for trade in record.closed_trades() {
            let cost_basis = trade.cost_basis()?;
            let exit_value = trade.exit_value()?;
            if (trade.is_long() && exit_value > cost_basis)
                || (trade.is_short() && exit_value < cost_basis)
            {
                profitable += 1;
            }
        }
        Ok(profitable as f64)
    }
}

/// Total profit divided by the number of completed trades. A record with no
/// trades errors rather than reporting zero.
pub struct AverageProfitAnalysis;

impl Analysis for AverageProfitAnalysis {
    fn analyze(&self, record: &TradingRecord) -> Result<f64, TradesmithError> {
        let trades = record.closed_trades().len();
        if trades == 0 {
            return Err(TradesmithError::DivisionByZero {
                context: "average profit",
            });
        }
        let total = TotalProfitAnalysis.analyze(record)?;
        Ok(total / trades as f64)
    }
}

/// Total profit per `period` span between the first entrance and the last
/// exit. Empty record analyzes to 0; a history shorter than one period is an
/// error.
pub struct PeriodProfitAnalysis {
    pub period: Duration,
}

impl Analysis for PeriodProfitAnalysis {
    fn analyze(&self, record: &TradingRecord) -> Result<f64, TradesmithError> {
        let trades = record.closed_trades();
        let (Some(first), Some(last)) = (trades.first(), trades.last()) else {
            return Ok(0.0);
        };
        let (Some(entrance), Some(exit)) = (first.entrance_order(), last.exit_order()) else {
            return Ok(0.0);
        };

        let period_seconds = self.period.num_seconds();
        if period_seconds == 0 {
            return Err(TradesmithError::DivisionByZero {
                context: "period profit",
            });
        }
        let periods = (exit.executed_at - entrance.executed_at).num_seconds() / period_seconds;
        if periods == 0 {
            return Err(TradesmithError::DivisionByZero {
                context: "period profit",
            });
        }

        let total = TotalProfitAnalysis.analyze(record)?;
        Ok(total / periods as f64)
    }
}

/// Profit of a hypothetical position bought at the first close and sold at
/// the last close, for comparison against the strategy's trades. Empty record
/// or empty series analyzes to 0.
pub struct BuyAndHoldAnalysis {
    pub series: Arc<TimeSeries>,
    pub starting_money: Decimal,
}

impl Analysis for BuyAndHoldAnalysis {
    fn analyze(&self, record: &TradingRecord) -> Result<f64, TradesmithError> {
        if record.closed_trades().is_empty() {
            return Ok(0.0);
        }
        let (Some(first), Some(last)) = (self.series.candles().first(), self.series.last_candle())
        else {
            return Ok(0.0);
        };

        let amount = self.starting_money.checked_div(first.close).ok_or(
            TradesmithError::DivisionByZero {
                context: "buy and hold",
            },
        )?;

        let mut position = Position::new();
        position.enter(Order {
            side: OrderSide::Buy,
            security: String::new(),
            price: first.close,
            amount,
            executed_at: first.timestamp,
        })?;
        position.exit(Order {
            side: OrderSide::Sell,
            security: String::new(),
            price: last.close,
            amount,
            executed_at: last.timestamp,
        })?;

        Ok(to_f64(position.exit_value()? - position.cost_basis()?))
    }
}

/// Total commission paid across all completed trades, at `rate_pct` percent
/// of each order's value. Empty record analyzes to 0.
pub struct CommissionAnalysis {
    pub rate_pct: Decimal,
}

impl Analysis for CommissionAnalysis {
    fn analyze(&self, record: &TradingRecord) -> Result<f64, TradesmithError> {
        let rate = self.rate_pct / Decimal::from(100);
        let mut total = Decimal::ZERO;
        for trade in record.closed_trades() {
            total += trade.cost_basis()? * rate;
            total += trade.exit_value()? * rate;
        }
        Ok(to_f64(total))
    }
}

/// Profit if the currently open position were closed at `current_price`.
/// Analyzes to 0 when no position is open.
pub struct OpenProfitAnalysis {
    pub current_price: Decimal,
}

impl Analysis for OpenProfitAnalysis {
    fn analyze(&self, record: &TradingRecord) -> Result<f64, TradesmithError> {
        let position = record.current_position();
        if !position.is_open() {
            return Ok(0.0);
        }
        let Some(entrance) = position.entrance_order() else {
            return Ok(0.0);
        };

        let market_value = self.current_price * entrance.amount;
        let profit = market_value - position.cost_basis()?;
        if position.is_short() {
            Ok(to_f64(-profit))
        } else {
            Ok(to_f64(profit))
        }
    }
}

/// Longest run of consecutive winning trades. Empty record analyzes to 0.
pub struct WinStreakAnalysis;

impl Analysis for WinStreakAnalysis {
    fn analyze(&self, record: &TradingRecord) -> Result<f64, TradesmithError> {
        Ok(longest_streak(record, true) as f64)
    }
}

/// Longest run of consecutive losing trades. Empty record analyzes to 0.
pub struct LoseStreakAnalysis;

impl Analysis for LoseStreakAnalysis {
    fn analyze(&self, record: &TradingRecord) -> Result<f64, TradesmithError> {
        Ok(longest_streak(record, false) as f64)
    }
}

fn longest_streak(record: &TradingRecord, winning: bool) -> usize {
    let mut longest = 0usize;
    let mut current = 0usize;
    for trade in record.closed_trades() {
        if is_winning(trade) == winning {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Largest single-trade profit. Empty record analyzes to 0.
pub struct MaxWinAnalysis;

impl Analysis for MaxWinAnalysis {
    fn analyze(&self, record: &TradingRecord) -> Result<f64, TradesmithError> {
        let mut best = Decimal::ZERO;
        for trade in record.closed_trades() {
            if is_winning(trade) {
                best = best.max(realized_profit(trade)?);
            }
        }
        Ok(to_f64(best))
    }
}

/// Largest single-trade loss, reported as a negative number. Empty record
/// analyzes to 0.
pub struct MaxLossAnalysis;

impl Analysis for MaxLossAnalysis {
    fn analyze(&self, record: &TradingRecord) -> Result<f64, TradesmithError> {
        let mut worst = Decimal::ZERO;
        for trade in record.closed_trades() {
            if !is_winning(trade) {
                worst = worst.min(realized_profit(trade)?);
            }
        }
        Ok(to_f64(worst))
    }
}

/// Mean profit over winning trades. Analyzes to 0 when there are none.
pub struct AverageWinAnalysis;

impl Analysis for AverageWinAnalysis {
    fn analyze(&self, record: &TradingRecord) -> Result<f64, TradesmithError> {
        average_over(record, true)
    }
}

/// Mean loss over losing trades, reported as a negative number. Analyzes to 0
/// when there are none.
pub struct AverageLossAnalysis;

impl Analysis for AverageLossAnalysis {
    fn analyze(&self, record: &TradingRecord) -> Result<f64, TradesmithError> {
        average_over(record, false)
    }
}

fn average_over(record: &TradingRecord, winning: bool) -> Result<f64, TradesmithError> {
    let mut sum = Decimal::ZERO;
    let mut count = 0usize;
    for trade in record.closed_trades() {
        if is_winning(trade) == winning {
            sum += realized_profit(trade)?;
            count += 1;
        }
    }
    if count == 0 {
        return Ok(0.0);
    }
    Ok(to_f64(sum / Decimal::from(count as u64)))
}

/// Writes one enter/exit/profit line triple per completed trade. Always
/// analyzes to 0.
pub struct LogTradesAnalysis<W> {
    writer: RefCell<W>,
}

impl<W: Write> LogTradesAnalysis<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: RefCell::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> Analysis for LogTradesAnalysis<W> {
    fn analyze(&self, record: &TradingRecord) -> Result<f64, TradesmithError> {
        let mut writer = self.writer.borrow_mut();
        for trade in record.closed_trades() {
            let (Some(entrance), Some(exit)) = (trade.entrance_order(), trade.exit_order()) else {
                continue;
            };
            writeln!(
                writer,
                "{} - enter with {} {} ({} @ ${})",
                entrance.executed_at.format("%Y-%m-%d %H:%M"),
                entrance.side,
                entrance.security,
                entrance.amount,
                entrance.price,
            )?;
            writeln!(
                writer,
                "{} - exit with {} {} ({} @ ${})",
                exit.executed_at.format("%Y-%m-%d %H:%M"),
                exit.side,
                exit.security,
                exit.amount,
                exit.price,
            )?;
            writeln!(writer, "profit: ${}", realized_profit(trade)?)?;
        }
        Ok(0.0)
    }
}
