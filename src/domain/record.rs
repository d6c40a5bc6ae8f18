//! Trade history for a single strategy run.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::TradesmithError;
use super::order::Order;
use super::position::{Position, Stage};

/// The ordered history of positions for one strategy run.
///
/// All positions in the closed list are closed; the current position is new
/// or open. Rules read the current position, analyses fold over the closed
/// trades. Each run owns its own record; there is no shared state between
/// runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradingRecord {
    closed: Vec<Position>,
    current: Position,
}

impl TradingRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// The position the next order applies to. A fresh record, or a record
    /// whose last trade just closed, reports a new position here.
    pub fn current_position(&self) -> &Position {
        &self.current
    }

    /// All completed trades, oldest first.
    pub fn closed_trades(&self) -> &[Position] {
        &self.closed
    }

    /// Open the current position with the given entrance order.
    pub fn enter(&mut self, order: Order) -> Result<(), TradesmithError> {
        self.current.enter(order)
    }

    /// Close the current position at `price`, then start a fresh one.
    ///
    /// The exit order's side, security, and amount are derived from the
    /// entrance order, so a mismatched exit cannot be constructed through the
    /// record.
    pub fn exit(
        &mut self,
        price: Decimal,
        executed_at: DateTime<Utc>,
    ) -> Result<(), TradesmithError> {
        if !self.current.is_open() {
            return Err(TradesmithError::CannotExit(self.current.stage()));
        }
        let order = match self.current.entrance_order() {
            Some(entrance) => Order {
                side: entrance.side.opposite(),
                security: entrance.security.clone(),
                price,
                amount: entrance.amount,
                executed_at,
            },
            None => return Err(TradesmithError::CannotExit(Stage::New)),
        };
        self.current.exit(order)?;
        self.closed.push(std::mem::take(&mut self.current));
        Ok(())
    }
}
