//! CLI definition and dispatch.

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{
    Analysis, AverageProfitAnalysis, BuyAndHoldAnalysis, LogTradesAnalysis, LoseStreakAnalysis,
    MaxLossAnalysis, MaxWinAnalysis, NumTradesAnalysis, OpenProfitAnalysis, PercentGainAnalysis,
    ProfitableTradesAnalysis, TotalProfitAnalysis, WinStreakAnalysis,
};
use crate::domain::backtest::{BacktestConfig, TradeDirection, run_backtest};
use crate::domain::error::TradesmithError;
use crate::domain::indicator::{ClosePriceIndicator, SimpleMovingAverage};
use crate::domain::record::TradingRecord;
use crate::domain::rule::{
    CrossedDownRule, CrossedUpRule, OrRule, Rule, StopLossRule, TakeProfitRule,
};
use crate::domain::series::TimeSeries;
use crate::domain::strategy::RuleStrategy;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "tradesmith", about = "Rule-driven trading strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a moving-average cross backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        exchange: Option<String>,
    },
    /// List available symbols on an exchange
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        exchange: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            code,
            exchange,
        } => run_backtest_command(&config, code.as_deref(), exchange.as_deref()),
        Command::ListSymbols { config, exchange } => run_list_symbols(&config, &exchange),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            (&err).into()
        }
    }
}

fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, TradesmithError> {
    FileConfigAdapter::from_file(path).map_err(|e| TradesmithError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn read_date(
    adapter: &impl ConfigPort,
    key: &str,
    default: NaiveDate,
) -> Result<NaiveDate, TradesmithError> {
    match adapter.get_string("data", key) {
        Some(raw) => {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| TradesmithError::ConfigInvalid {
                section: "data".into(),
                key: key.into(),
                reason: e.to_string(),
            })
        }
        None => Ok(default),
    }
}

fn read_window(adapter: &impl ConfigPort, key: &str, default: i64) -> Result<usize, TradesmithError> {
    let value = adapter.get_int("strategy", key, default);
    usize::try_from(value)
        .ok()
        .filter(|w| *w > 0)
        .ok_or_else(|| TradesmithError::ConfigInvalid {
            section: "strategy".into(),
            key: key.into(),
            reason: format!("window must be a positive integer, got {value}"),
        })
}

fn read_tolerance(
    adapter: &impl ConfigPort,
    key: &str,
) -> Result<Option<Decimal>, TradesmithError> {
    match adapter.get_string("strategy", key) {
        Some(raw) => Decimal::from_str(raw.trim())
            .map(Some)
            .map_err(|e| TradesmithError::ConfigInvalid {
                section: "strategy".into(),
                key: key.into(),
                reason: e.to_string(),
            }),
        None => Ok(None),
    }
}

fn read_direction(adapter: &impl ConfigPort) -> Result<TradeDirection, TradesmithError> {
    let raw = adapter
        .get_string("strategy", "direction")
        .unwrap_or_else(|| "long".to_string());
    match raw.to_lowercase().as_str() {
        "long" => Ok(TradeDirection::Long),
        "short" => Ok(TradeDirection::Short),
        other => Err(TradesmithError::ConfigInvalid {
            section: "strategy".into(),
            key: "direction".into(),
            reason: format!("expected long or short, got {other}"),
        }),
    }
}

fn run_backtest_command(
    config_path: &PathBuf,
    code_override: Option<&str>,
    exchange_override: Option<&str>,
) -> Result<(), TradesmithError> {
    let adapter = load_config(config_path)?;

    let data_path = adapter
        .get_string("data", "path")
        .ok_or_else(|| TradesmithError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;
    let code = code_override
        .map(str::to_string)
        .or_else(|| adapter.get_string("data", "code"))
        .ok_or_else(|| TradesmithError::ConfigMissing {
            section: "data".into(),
            key: "code".into(),
        })?;
    let exchange = exchange_override
        .map(str::to_string)
        .or_else(|| adapter.get_string("data", "exchange"))
        .ok_or_else(|| TradesmithError::ConfigMissing {
            section: "data".into(),
            key: "exchange".into(),
        })?;
    let start_date = read_date(&adapter, "start_date", NaiveDate::MIN)?;
    let end_date = read_date(&adapter, "end_date", NaiveDate::MAX)?;

    let fast_window = read_window(&adapter, "fast_window", 5)?;
    let slow_window = read_window(&adapter, "slow_window", 10)?;
    if fast_window >= slow_window {
        return Err(TradesmithError::ConfigInvalid {
            section: "strategy".into(),
            key: "fast_window".into(),
            reason: format!("fast window {fast_window} must be less than slow window {slow_window}"),
        });
    }
    let direction = read_direction(&adapter)?;
    let stop_loss = read_tolerance(&adapter, "stop_loss")?;
    let take_profit = read_tolerance(&adapter, "take_profit")?;
    let unstable_period = adapter
        .get_int("strategy", "unstable_period", slow_window as i64)
        .max(0) as usize;

    let amount = adapter.get_decimal("backtest", "amount", dec!(1));
    if amount <= Decimal::ZERO {
        return Err(TradesmithError::ConfigInvalid {
            section: "backtest".into(),
            key: "amount".into(),
            reason: format!("amount must be positive, got {amount}"),
        });
    }
    let starting_money = adapter.get_decimal("backtest", "starting_money", dec!(1000));

    let data_port = CsvAdapter::new(PathBuf::from(&data_path));
    let candles = data_port.fetch_candles(&code, &exchange, start_date, end_date)?;
    if candles.is_empty() {
        return Err(TradesmithError::NoData {
            code,
            exchange,
        });
    }
    let minimum = slow_window + 1;
    if candles.len() < minimum {
        return Err(TradesmithError::InsufficientData {
            code,
            exchange,
            candles: candles.len(),
            minimum,
        });
    }

    let series = Arc::new(TimeSeries::from_candles(candles)?);
    tracing::info!(code = %code, exchange = %exchange, candles = series.len(), "running backtest");

    let fast = SimpleMovingAverage::new(
        ClosePriceIndicator::new(Arc::clone(&series)),
        fast_window,
    )?;
    let slow = SimpleMovingAverage::new(
        ClosePriceIndicator::new(Arc::clone(&series)),
        slow_window,
    )?;

    // Long runs trade the fast average crossing above the slow one; short
    // runs trade the mirror image.
    let entry_rule: Box<dyn Rule> = match direction {
        TradeDirection::Long => Box::new(CrossedUpRule::new(slow.clone(), fast.clone())),
        TradeDirection::Short => Box::new(CrossedDownRule::new(fast.clone(), slow.clone())),
    };
    let mut exit_rule: Box<dyn Rule> = match direction {
        TradeDirection::Long => Box::new(CrossedDownRule::new(fast, slow)),
        TradeDirection::Short => Box::new(CrossedUpRule::new(slow, fast)),
    };
    if let Some(tolerance) = stop_loss {
        exit_rule = Box::new(OrRule::new(
            exit_rule,
            StopLossRule::new(Arc::clone(&series), tolerance),
        ));
    }
    if let Some(tolerance) = take_profit {
        exit_rule = Box::new(OrRule::new(
            exit_rule,
            TakeProfitRule::new(Arc::clone(&series), tolerance),
        ));
    }

    let strategy = RuleStrategy::new(entry_rule, exit_rule, unstable_period);
    let config = BacktestConfig {
        security: code,
        amount,
        direction,
    };
    let record = run_backtest(&series, &strategy, &config)?;

    if adapter.get_bool("backtest", "log_trades", false) {
        LogTradesAnalysis::new(std::io::stdout()).analyze(&record)?;
    }
    print_summary(&record, &series, starting_money)
}

fn print_summary(
    record: &TradingRecord,
    series: &Arc<TimeSeries>,
    starting_money: Decimal,
) -> Result<(), TradesmithError> {
    println!("trades:            {}", NumTradesAnalysis.analyze(record)?);
    println!(
        "profitable trades: {}",
        ProfitableTradesAnalysis.analyze(record)?
    );
    println!(
        "total profit:      {:.2}",
        TotalProfitAnalysis.analyze(record)?
    );
    println!(
        "percent gain:      {:.2}%",
        PercentGainAnalysis.analyze(record)? * 100.0
    );
    match AverageProfitAnalysis.analyze(record) {
        Ok(average) => println!("average profit:    {average:.2}"),
        Err(TradesmithError::DivisionByZero { .. }) => {
            println!("average profit:    n/a (no closed trades)")
        }
        Err(err) => return Err(err),
    }
    println!("max win:           {:.2}", MaxWinAnalysis.analyze(record)?);
    println!("max loss:          {:.2}", MaxLossAnalysis.analyze(record)?);
    println!(
        "win streak:        {}",
        WinStreakAnalysis.analyze(record)?
    );
    println!(
        "lose streak:       {}",
        LoseStreakAnalysis.analyze(record)?
    );

    let buy_and_hold = BuyAndHoldAnalysis {
        series: Arc::clone(series),
        starting_money,
    };
    println!(
        "buy and hold:      {:.2}",
        buy_and_hold.analyze(record)?
    );

    if record.current_position().is_open() {
        if let Some(last) = series.last_candle() {
            let open_profit = OpenProfitAnalysis {
                current_price: last.close,
            };
            println!(
                "open position P/L: {:.2}",
                open_profit.analyze(record)?
            );
        }
    }
    Ok(())
}

fn run_list_symbols(config_path: &PathBuf, exchange: &str) -> Result<(), TradesmithError> {
    let adapter = load_config(config_path)?;
    let data_path = adapter
        .get_string("data", "path")
        .ok_or_else(|| TradesmithError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;

    let data_port = CsvAdapter::new(PathBuf::from(&data_path));
    for symbol in data_port.list_symbols(exchange)? {
        println!("{symbol}");
    }
    Ok(())
}
