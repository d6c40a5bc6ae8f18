#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tradesmith::domain::error::TradesmithError;
pub use tradesmith::domain::series::{Candle, TimeSeries};
use tradesmith::ports::data_port::DataPort;

pub fn ts(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn make_candle(day: u32, close: Decimal) -> Candle {
    Candle {
        timestamp: ts(day),
        open: close,
        high: close,
        low: close,
        close,
        volume: dec!(1000),
    }
}

/// One flat candle per close, one day apart starting 2024-01-01.
pub fn make_series(closes: &[Decimal]) -> Arc<TimeSeries> {
    let candles = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_candle((i + 1) as u32, close))
        .collect();
    Arc::new(TimeSeries::from_candles(candles).unwrap())
}

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Candle>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_candles(mut self, code: &str, candles: Vec<Candle>) -> Self {
        self.data.insert(code.to_string(), candles);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_candles(
        &self,
        code: &str,
        _exchange: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Candle>, TradesmithError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(TradesmithError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(code)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|c| {
                let day = c.timestamp.date_naive();
                day >= start_date && day <= end_date
            })
            .collect())
    }

    fn list_symbols(&self, _exchange: &str) -> Result<Vec<String>, TradesmithError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}
