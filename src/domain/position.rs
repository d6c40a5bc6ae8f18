//! Position lifecycle: one round-trip trade.

use std::fmt;

use rust_decimal::Decimal;

use super::error::TradesmithError;
use super::order::{Order, OrderSide};

/// Lifecycle stage of a position. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    New,
    Open,
    Closed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::New => write!(f, "new"),
            Stage::Open => write!(f, "open"),
            Stage::Closed => write!(f, "closed"),
        }
    }
}

/// A single trade: an entrance order and, once closed, an exit order.
///
/// The entrance side is the position's direction: a buy entrance makes the
/// position long, a sell entrance makes it short.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Position {
    entrance_order: Option<Order>,
    exit_order: Option<Order>,
}

impl Position {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        match (&self.entrance_order, &self.exit_order) {
            (None, _) => Stage::New,
            (Some(_), None) => Stage::Open,
            (Some(_), Some(_)) => Stage::Closed,
        }
    }

    pub fn is_new(&self) -> bool {
        self.stage() == Stage::New
    }

    pub fn is_open(&self) -> bool {
        self.stage() == Stage::Open
    }

    pub fn is_closed(&self) -> bool {
        self.stage() == Stage::Closed
    }

    pub fn is_long(&self) -> bool {
        matches!(&self.entrance_order, Some(order) if order.side == OrderSide::Buy)
    }

    pub fn is_short(&self) -> bool {
        matches!(&self.entrance_order, Some(order) if order.side == OrderSide::Sell)
    }

    pub fn entrance_order(&self) -> Option<&Order> {
        self.entrance_order.as_ref()
    }

    pub fn exit_order(&self) -> Option<&Order> {
        self.exit_order.as_ref()
    }

    /// Record the entrance order. Only valid while the position is new.
    pub fn enter(&mut self, order: Order) -> Result<(), TradesmithError> {
        if self.entrance_order.is_some() {
            return Err(TradesmithError::CannotEnter(self.stage()));
        }
        self.entrance_order = Some(order);
        Ok(())
    }

    /// Record the exit order. Only valid while the position is open, and the
    /// exit side must oppose the entrance side.
    pub fn exit(&mut self, order: Order) -> Result<(), TradesmithError> {
        match (&self.entrance_order, &self.exit_order) {
            (Some(entrance), None) => {
                if order.side != entrance.side.opposite() {
                    return Err(TradesmithError::MismatchedExitSide {
                        entrance: entrance.side,
                        exit: order.side,
                    });
                }
                self.exit_order = Some(order);
                Ok(())
            }
            _ => Err(TradesmithError::CannotExit(self.stage())),
        }
    }

    /// Entrance price times entrance amount.
    pub fn cost_basis(&self) -> Result<Decimal, TradesmithError> {
        let order = self
            .entrance_order
            .as_ref()
            .ok_or(TradesmithError::UndefinedCostBasis)?;
        Ok(order.price * order.amount)
    }

    /// Exit price times exit amount. Defined only once the position is closed.
    pub fn exit_value(&self) -> Result<Decimal, TradesmithError> {
        match &self.exit_order {
            Some(order) => Ok(order.price * order.amount),
            None => Err(TradesmithError::UndefinedExitValue(self.stage())),
        }
    }
}
