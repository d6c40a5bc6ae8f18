//! tradesmith — rule-driven trading strategy backtester.
//!
//! Indicators map bar indices to decimal values, rules are boolean predicates
//! over an index and a trading record, and the record tracks the position
//! lifecycle that exit rules and trade analyses read.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
