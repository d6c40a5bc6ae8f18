//! Data access port trait.

use chrono::NaiveDate;

use crate::domain::error::TradesmithError;
use crate::domain::series::Candle;

pub trait DataPort {
    fn fetch_candles(
        &self,
        code: &str,
        exchange: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Candle>, TradesmithError>;

    fn list_symbols(&self, exchange: &str) -> Result<Vec<String>, TradesmithError>;
}
