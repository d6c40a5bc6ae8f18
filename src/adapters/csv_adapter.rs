//! CSV file data adapter.
//!
//! Expects one `CODE_EXCHANGE.csv` file per symbol under the base path, with
//! a `date,open,high,low,close,volume` header and `%Y-%m-%d` dates. Dates map
//! to midnight UTC candle timestamps.

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use crate::domain::error::TradesmithError;
use crate::domain::series::Candle;
use crate::ports::data_port::DataPort;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str, exchange: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", code, exchange))
    }
}

fn parse_decimal(record: &csv::StringRecord, column: usize, name: &str) -> Result<Decimal, TradesmithError> {
    let field = record.get(column).ok_or_else(|| TradesmithError::Data {
        reason: format!("missing {} column", name),
    })?;
    Decimal::from_str(field.trim()).map_err(|e| TradesmithError::Data {
        reason: format!("invalid {} value: {}", name, e),
    })
}

impl DataPort for CsvAdapter {
    fn fetch_candles(
        &self,
        code: &str,
        exchange: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Candle>, TradesmithError> {
        let path = self.csv_path(code, exchange);
        let content = fs::read_to_string(&path).map_err(|e| TradesmithError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut candles = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| TradesmithError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| TradesmithError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                TradesmithError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            candles.push(Candle {
                timestamp: date.and_time(NaiveTime::MIN).and_utc(),
                open: parse_decimal(&record, 1, "open")?,
                high: parse_decimal(&record, 2, "high")?,
                low: parse_decimal(&record, 3, "low")?,
                close: parse_decimal(&record, 4, "close")?,
                volume: parse_decimal(&record, 5, "volume")?,
            });
        }

        candles.sort_by_key(|c| c.timestamp);
        Ok(candles)
    }

    fn list_symbols(&self, exchange: &str) -> Result<Vec<String>, TradesmithError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TradesmithError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let suffix = format!("_{}.csv", exchange);
        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| TradesmithError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if name_str.ends_with(&suffix) {
                let code = &name_str[..name_str.len() - suffix.len()];
                symbols.push(code.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
