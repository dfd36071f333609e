use core_types::{OpenPosition, PairQuote, Side};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// One open position enriched with the latest quote for its pair.
///
/// `last_price` and `unrealized_pnl` stay `None` when the price listener has
/// no quote for the pair; such positions are listed but excluded from every
/// aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionPnl {
    pub position: OpenPosition,
    pub last_price: Option<f64>,
    pub unrealized_pnl: Option<f64>,
}

/// Buy and sell open-interest notional for one pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PairOpenInterest {
    pub buy_notional: f64,
    pub sell_notional: f64,
}

impl PairOpenInterest {
    /// Signed imbalance: positive when longs dominate, negative when shorts do.
    pub fn imbalance(&self) -> f64 {
        self.buy_notional - self.sell_notional
    }
}

/// Unrealized-PnL and open-interest aggregates over all open positions.
///
/// `BTreeMap` keys keep pair and trader groupings in a deterministic order
/// for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionReport {
    pub positions: Vec<PositionPnl>,
    pub total_unrealized_pnl: f64,
    pub pnl_by_pair: BTreeMap<String, f64>,
    pub pnl_by_trader: BTreeMap<String, f64>,
    pub open_interest_by_pair: BTreeMap<String, PairOpenInterest>,
}

/// Unrealized PnL of a single position against the latest price:
/// `sign * (last - open) / open * notional`.
pub fn unrealized_pnl(open_price: f64, last_price: f64, side: Side, notional: f64) -> f64 {
    side.sign() * (last_price - open_price) / open_price * notional
}

impl PositionReport {
    pub fn from_positions(positions: Vec<OpenPosition>, quotes: &[PairQuote]) -> Self {
        let quote_by_pair: BTreeMap<&str, f64> =
            quotes.iter().map(|q| (q.pair.as_str(), q.mid)).collect();

        let mut total_unrealized_pnl = 0.0;
        let mut pnl_by_pair: BTreeMap<String, f64> = BTreeMap::new();
        let mut pnl_by_trader: BTreeMap<String, f64> = BTreeMap::new();
        let mut open_interest_by_pair: BTreeMap<String, PairOpenInterest> = BTreeMap::new();

        let positions = positions
            .into_iter()
            .map(|position| {
                let open_interest = open_interest_by_pair
                    .entry(position.pair.clone())
                    .or_default();
                match position.side {
                    Side::Buy => open_interest.buy_notional += position.notional,
                    Side::Sell => open_interest.sell_notional += position.notional,
                }

                let last_price = quote_by_pair.get(position.pair.as_str()).copied();
                let pnl = last_price.map(|last| {
                    unrealized_pnl(position.open_price, last, position.side, position.notional)
                });

                if let Some(pnl) = pnl {
                    total_unrealized_pnl += pnl;
                    *pnl_by_pair.entry(position.pair.clone()).or_insert(0.0) += pnl;
                    *pnl_by_trader.entry(position.trader.clone()).or_insert(0.0) += pnl;
                } else {
                    warn!(pair = %position.pair, "no quote for pair, excluding position from PnL totals");
                }

                PositionPnl {
                    last_price,
                    unrealized_pnl: pnl,
                    position,
                }
            })
            .collect();

        Self {
            positions,
            total_unrealized_pnl,
            pnl_by_pair,
            pnl_by_trader,
            open_interest_by_pair,
        }
    }
}
