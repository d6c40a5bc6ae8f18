//! Backtest driver: replays a series through a strategy, one bar at a time.

use rust_decimal::Decimal;

use super::error::TradesmithError;
use super::order::{Order, OrderSide};
use super::record::TradingRecord;
use super::rule::Rule;
use super::series::TimeSeries;
use super::strategy::RuleStrategy;

/// Direction of the positions a run takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeDirection {
    Long,
    Short,
}

impl TradeDirection {
    fn entry_side(self) -> OrderSide {
        match self {
            TradeDirection::Long => OrderSide::Buy,
            TradeDirection::Short => OrderSide::Sell,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub security: String,
    pub amount: Decimal,
    pub direction: TradeDirection,
}

/// Replay the series index by index, entering and exiting at the bar close
/// whenever the strategy says so, and return the resulting trade history.
///
/// The run is strictly sequential and deterministic; the record is owned by
/// this run alone.
pub fn run_backtest<E, X>(
    series: &TimeSeries,
    strategy: &RuleStrategy<E, X>,
    config: &BacktestConfig,
) -> Result<TradingRecord, TradesmithError>
where
    E: Rule,
    X: Rule,
{
    let mut record = TradingRecord::new();

    for index in 0..series.len() {
        let candle = series.candle(index);
        if strategy.should_enter(index, &record) {
            tracing::debug!(index, price = %candle.close, "entering position");
            record.enter(Order {
                side: config.direction.entry_side(),
                security: config.security.clone(),
                price: candle.close,
                amount: config.amount,
                executed_at: candle.timestamp,
            })?;
        } else if strategy.should_exit(index, &record) {
            tracing::debug!(index, price = %candle.close, "exiting position");
            record.exit(candle.close, candle.timestamp)?;
        }
    }

    tracing::debug!(
        trades = record.closed_trades().len(),
        open = record.current_position().is_open(),
        "backtest finished"
    );
    Ok(record)
}
