//! Domain error types.

use chrono::{DateTime, Utc};

use crate::domain::order::OrderSide;
use crate::domain::position::Stage;

/// Top-level error type for tradesmith.
#[derive(Debug, thiserror::Error)]
pub enum TradesmithError {
    #[error("cannot enter a position that is {0}")]
    CannotEnter(Stage),

    #[error("cannot exit a position that is {0}")]
    CannotExit(Stage),

    #[error("exit side {exit} does not oppose entrance side {entrance}")]
    MismatchedExitSide { entrance: OrderSide, exit: OrderSide },

    #[error("cost basis is undefined before an entrance order exists")]
    UndefinedCostBasis,

    #[error("exit value is undefined while the position is {0}")]
    UndefinedExitValue(Stage),

    #[error("candle at {candle} is not after the previous candle at {last}")]
    NonChronologicalCandle {
        candle: DateTime<Utc>,
        last: DateTime<Utc>,
    },

    #[error("indicator window must be at least 1")]
    ZeroWindow,

    #[error("division by zero while computing {context}")]
    DivisionByZero { context: &'static str },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {code} on {exchange}")]
    NoData { code: String, exchange: String },

    #[error("insufficient data for {code} on {exchange}: have {candles} candles, need {minimum}")]
    InsufficientData {
        code: String,
        exchange: String,
        candles: usize,
        minimum: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradesmithError> for std::process::ExitCode {
    fn from(err: &TradesmithError) -> Self {
        let code: u8 = match err {
            TradesmithError::Io(_) => 1,
            TradesmithError::ConfigParse { .. }
            | TradesmithError::ConfigMissing { .. }
            | TradesmithError::ConfigInvalid { .. } => 2,
            TradesmithError::Data { .. }
            | TradesmithError::NoData { .. }
            | TradesmithError::InsufficientData { .. } => 3,
            TradesmithError::CannotEnter(_)
            | TradesmithError::CannotExit(_)
            | TradesmithError::MismatchedExitSide { .. }
            | TradesmithError::UndefinedCostBasis
            | TradesmithError::UndefinedExitValue(_)
            | TradesmithError::NonChronologicalCandle { .. }
            | TradesmithError::ZeroWindow
            | TradesmithError::DivisionByZero { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
