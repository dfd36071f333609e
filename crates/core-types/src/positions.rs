use crate::enums::Side;
use serde::{Deserialize, Serialize};

/// One open perps position, after wire values have been converted to plain
/// numbers (collateral and notional in USD, prices in asset terms).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    /// The traded pair as a single symbol, e.g. "ETHUSD".
    pub pair: String,
    /// The trader's account address.
    pub trader: String,
    pub side: Side,
    pub collateral: f64,
    pub leverage: f64,
    pub notional: f64,
    pub trade_notional: f64,
    pub open_price: f64,
    /// Zero when the trader has not set a take-profit.
    pub take_profit_price: f64,
    /// Zero when the trader has not set a stop-loss.
    pub stop_loss_price: f64,
    pub funding: f64,
    pub rollover: f64,
}

/// The latest mid price for one pair, as reported by the price listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairQuote {
    pub pair: String,
    pub mid: f64,
}
