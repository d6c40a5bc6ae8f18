//! Integration tests.
//!
//! Cover the full pipeline: candles through a data port, series construction,
//! rule-driven backtest runs, analyses over the finished record, and the CSV
//! adapter end-to-end.

mod common;

use std::path::PathBuf;
use std::sync::Arc;

use approx::assert_relative_eq;
use common::*;
use rust_decimal_macros::dec;
use tradesmith::adapters::csv_adapter::CsvAdapter;
use tradesmith::domain::analysis::{
    Analysis, LoseStreakAnalysis, MaxLossAnalysis, NumTradesAnalysis, OpenProfitAnalysis,
    TotalProfitAnalysis, WinStreakAnalysis,
};
use tradesmith::domain::backtest::{BacktestConfig, TradeDirection, run_backtest};
use tradesmith::domain::error::TradesmithError;
use tradesmith::domain::indicator::{ClosePriceIndicator, ConstantIndicator, SimpleMovingAverage};
use tradesmith::domain::position::Position;
use tradesmith::domain::rule::{CrossedDownRule, CrossedUpRule, StopLossRule, TakeProfitRule};
use tradesmith::domain::strategy::RuleStrategy;
use tradesmith::ports::data_port::DataPort;

fn long_config(amount: rust_decimal::Decimal) -> BacktestConfig {
    BacktestConfig {
        security: "BHP".into(),
        amount,
        direction: TradeDirection::Long,
    }
}

mod full_pipeline {
    use super::*;

    #[test]
    fn threshold_cross_strategy_over_mock_port() {
        let candles = vec![
            make_candle(1, dec!(10)),
            make_candle(2, dec!(12)),
            make_candle(3, dec!(8)),
            make_candle(4, dec!(13)),
            make_candle(5, dec!(7)),
            make_candle(6, dec!(14)),
        ];
        let port = MockDataPort::new().with_candles("BHP", candles);

        let fetched = port
            .fetch_candles("BHP", "ASX", date(2024, 1, 1), date(2024, 1, 6))
            .unwrap();
        assert_eq!(fetched.len(), 6);

        let series = Arc::new(TimeSeries::from_candles(fetched).unwrap());
        let strategy = RuleStrategy::new(
            CrossedUpRule::new(
                ConstantIndicator::new(dec!(11)),
                ClosePriceIndicator::new(Arc::clone(&series)),
            ),
            CrossedDownRule::new(
                ClosePriceIndicator::new(Arc::clone(&series)),
                ConstantIndicator::new(dec!(9)),
            ),
            0,
        );

        let record = run_backtest(&series, &strategy, &long_config(dec!(1))).unwrap();

        // Entered at 12 and 13, stopped out at 8 and 7; a third entry at 14
        // is still open when the series ends.
        assert_eq!(record.closed_trades().len(), 2);
        assert!(record.closed_trades().iter().all(Position::is_closed));
        assert!(record.current_position().is_open());

        let first = &record.closed_trades()[0];
        assert_eq!(first.entrance_order().unwrap().price, dec!(12));
        assert_eq!(first.entrance_order().unwrap().executed_at, ts(2));
        assert_eq!(first.exit_order().unwrap().price, dec!(8));
        assert_eq!(first.exit_order().unwrap().executed_at, ts(3));

        assert_relative_eq!(NumTradesAnalysis.analyze(&record).unwrap(), 2.0);
        assert_relative_eq!(TotalProfitAnalysis.analyze(&record).unwrap(), -10.0);
        assert_relative_eq!(WinStreakAnalysis.analyze(&record).unwrap(), 0.0);
        assert_relative_eq!(LoseStreakAnalysis.analyze(&record).unwrap(), 2.0);
        assert_relative_eq!(MaxLossAnalysis.analyze(&record).unwrap(), -6.0);

        // The still-open entry at 14, marked at the last close of 14.
        let open = OpenProfitAnalysis {
            current_price: series.last_candle().unwrap().close,
        };
        assert_relative_eq!(open.analyze(&record).unwrap(), 0.0);
    }

    #[test]
    fn moving_average_cross_strategy() {
        // Fast SMA(1) against slow SMA(2): the fast average crosses above at
        // index 3 and back below at index 5.
        let series = make_series(&[
            dec!(12),
            dec!(11),
            dec!(10),
            dec!(14),
            dec!(14),
            dec!(6),
            dec!(6),
        ]);
        let fast = SimpleMovingAverage::new(ClosePriceIndicator::new(Arc::clone(&series)), 1).unwrap();
        let slow = SimpleMovingAverage::new(ClosePriceIndicator::new(Arc::clone(&series)), 2).unwrap();

        let strategy = RuleStrategy::new(
            CrossedUpRule::new(slow.clone(), fast.clone()),
            CrossedDownRule::new(fast, slow),
            0,
        );

        let record = run_backtest(&series, &strategy, &long_config(dec!(2))).unwrap();

        assert_eq!(record.closed_trades().len(), 1);
        assert!(record.current_position().is_new());

        let trade = &record.closed_trades()[0];
        assert_eq!(trade.entrance_order().unwrap().price, dec!(14));
        assert_eq!(trade.entrance_order().unwrap().executed_at, ts(4));
        assert_eq!(trade.exit_order().unwrap().price, dec!(6));
        assert_eq!(trade.exit_order().unwrap().executed_at, ts(6));
        // (6 - 14) * 2
        assert_relative_eq!(TotalProfitAnalysis.analyze(&record).unwrap(), -16.0);
    }

    #[test]
    fn stop_loss_closes_the_position() {
        // Entry when the close crosses above 11; exit only through the stop.
        // Entered at 12 with -10% tolerance: 10.8 is exactly at the stop.
        let series = make_series(&[dec!(10), dec!(12), dec!(11.5), dec!(10.8), dec!(11)]);
        let strategy = RuleStrategy::new(
            CrossedUpRule::new(
                ConstantIndicator::new(dec!(11)),
                ClosePriceIndicator::new(Arc::clone(&series)),
            ),
            StopLossRule::new(Arc::clone(&series), dec!(-0.10)),
            0,
        );

        let record = run_backtest(&series, &strategy, &long_config(dec!(1))).unwrap();

        assert_eq!(record.closed_trades().len(), 1);
        let trade = &record.closed_trades()[0];
        assert_eq!(trade.entrance_order().unwrap().price, dec!(12));
        assert_eq!(trade.exit_order().unwrap().price, dec!(10.8));
        assert_eq!(trade.exit_order().unwrap().executed_at, ts(4));
    }

    #[test]
    fn take_profit_closes_the_position() {
        // Entered at 12 with +10% tolerance: 13.2 is exactly at the target.
        let series = make_series(&[dec!(10), dec!(12), dec!(12.5), dec!(13.2)]);
        let strategy = RuleStrategy::new(
            CrossedUpRule::new(
                ConstantIndicator::new(dec!(11)),
                ClosePriceIndicator::new(Arc::clone(&series)),
            ),
            TakeProfitRule::new(Arc::clone(&series), dec!(0.10)),
            0,
        );

        let record = run_backtest(&series, &strategy, &long_config(dec!(5))).unwrap();

        assert_eq!(record.closed_trades().len(), 1);
        let trade = &record.closed_trades()[0];
        assert_eq!(trade.exit_order().unwrap().price, dec!(13.2));
        // (13.2 - 12) * 5
        assert_relative_eq!(TotalProfitAnalysis.analyze(&record).unwrap(), 6.0);
    }

    #[test]
    fn unstable_period_delays_the_first_entry() {
        let series = make_series(&[dec!(10), dec!(12), dec!(8), dec!(13)]);
        let entry = CrossedUpRule::new(
            ConstantIndicator::new(dec!(11)),
            ClosePriceIndicator::new(Arc::clone(&series)),
        );
        let exit = CrossedDownRule::new(
            ClosePriceIndicator::new(Arc::clone(&series)),
            ConstantIndicator::new(dec!(9)),
        );

        // The first cross at index 1 falls inside the unstable period; only
        // the one at index 3 trades.
        let strategy = RuleStrategy::new(entry, exit, 2);
        let record = run_backtest(&series, &strategy, &long_config(dec!(1))).unwrap();

        assert!(record.closed_trades().is_empty());
        assert_eq!(
            record.current_position().entrance_order().unwrap().price,
            dec!(13)
        );
    }
}

mod data_port {
    use super::*;

    #[test]
    fn mock_port_filters_by_date() {
        let port = MockDataPort::new().with_candles(
            "BHP",
            vec![
                make_candle(1, dec!(10)),
                make_candle(2, dec!(11)),
                make_candle(3, dec!(12)),
            ],
        );

        let fetched = port
            .fetch_candles("BHP", "ASX", date(2024, 1, 2), date(2024, 1, 2))
            .unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].close, dec!(11));
    }

    #[test]
    fn mock_port_surfaces_errors() {
        let port = MockDataPort::new().with_error("BHP", "backing store offline");
        let result = port.fetch_candles("BHP", "ASX", date(2024, 1, 1), date(2024, 1, 5));
        assert!(matches!(result, Err(TradesmithError::Data { .. })));
    }
}

mod csv_pipeline {
    use super::*;

    #[test]
    fn csv_candles_drive_a_backtest() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-01,10,10,10,10,1000\n\
            2024-01-02,12,12,12,12,1000\n\
            2024-01-03,8,8,8,8,1000\n";
        std::fs::write(dir.path().join("BHP_ASX.csv"), csv_content).unwrap();

        let adapter = CsvAdapter::new(PathBuf::from(dir.path()));
        let candles = adapter
            .fetch_candles("BHP", "ASX", date(2024, 1, 1), date(2024, 1, 3))
            .unwrap();
        let series = Arc::new(TimeSeries::from_candles(candles).unwrap());

        let strategy = RuleStrategy::new(
            CrossedUpRule::new(
                ConstantIndicator::new(dec!(11)),
                ClosePriceIndicator::new(Arc::clone(&series)),
            ),
            CrossedDownRule::new(
                ClosePriceIndicator::new(Arc::clone(&series)),
                ConstantIndicator::new(dec!(9)),
            ),
            0,
        );
        let record = run_backtest(&series, &strategy, &long_config(dec!(1))).unwrap();

        assert_eq!(record.closed_trades().len(), 1);
        let trade = &record.closed_trades()[0];
        assert_eq!(trade.entrance_order().unwrap().price, dec!(12));
        assert_eq!(trade.exit_order().unwrap().price, dec!(8));
        assert_relative_eq!(TotalProfitAnalysis.analyze(&record).unwrap(), -4.0);
    }
}
