//! Backtest Engine — event-driven backtest simulator for equity trading strategies.
//!
//! This crate contains the whole core:
//! - Domain types (bars, positions, closed trades, equity points, portfolio)
//! - A streaming indicator engine (SMA/EMA/WMA/RSI/MACD/Bollinger/Stochastic/
//!   ATR/Pivot/ROC/STDDEV/OBV/VWAP)
//! - A textual rule DSL: operand leaves, AST, recursive-descent parser, and a
//!   point-in-time evaluator with no look-ahead bias
//! - An execution model (commission, slippage, entries, exits, SL/TP sweep)
//! - Universe parsing, per-code validation, and timeline construction
//! - A per-code indicator cache shared across every rule that references it
//! - The bar-stepping backtest loop
//! - A performance metrics engine (trade stats, Sharpe/Sortino, drawdown)
//! - External ports (`DataPort`, `ConfigSource`, `ReportPort`) the core calls
//!   through but does not implement

pub mod backtest;
pub mod cache;
pub mod domain;
pub mod error;
pub mod execution;
pub mod indicators;
pub mod metrics;
pub mod ports;
pub mod rule;
pub mod strategy;
pub mod universe;

pub use error::{EngineError, Result};
pub use strategy::Strategy;
