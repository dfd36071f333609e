//! # Argus Analytics
//!
//! This crate holds the quantitative core of the dashboard: the APR
//! modelling table and the aggregate metrics derived from open positions.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `AprEngine` is a stateless calculator. It
//!   takes an in-memory price series as input and produces an `AprTable` as
//!   output. This makes it highly reliable and easy to test.
//!
//! ## Public API
//!
//! - `AprEngine`: annualized-return point, smoothed, and table calculations.
//! - `AprTable`: the N×K grid of smoothed annualized returns.
//! - `trailing_change`: percentage change over a trailing number of days.
//! - `PositionReport`: unrealized PnL and open-interest aggregates.
//! - `AnalyticsError`: the specific error types returned from this crate.

// Declare the modules that constitute this crate.
pub mod change;
pub mod engine;
pub mod error;
pub mod positions;
pub mod table;

// Re-export the key components to create a clean, public-facing API.
pub use change::trailing_change;
pub use engine::AprEngine;
pub use error::AnalyticsError;
pub use positions::{PairOpenInterest, PositionPnl, PositionReport};
pub use table::AprTable;
