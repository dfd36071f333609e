use crate::error::ApiError;
use chrono::NaiveDate;
use core_types::{OpenPosition, PairQuote, PriceHistory, PricePoint, Side};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use std::str::FromStr;

// Fixed-point scales used on the wire: prices, funding and rollover carry 18
// decimals, collateral and notional 6 (USDC), leverage 2.
const PRICE_DECIMALS: u32 = 18;
const COLLATERAL_DECIMALS: u32 = 6;
const LEVERAGE_DECIMALS: u32 = 2;

/// The outer shape of every GraphQL response.
#[derive(Debug, Deserialize)]
pub struct GraphQlEnvelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlErrorMessage>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlErrorMessage {
    pub message: String,
}

/// `data` payload of the share-price query.
#[derive(Debug, Deserialize)]
pub struct SharePriceData {
    #[serde(rename = "shareToAssetsPriceDailies")]
    pub dailies: Vec<RawSharePriceDaily>,
}

/// One daily share price as the subgraph reports it: an 18-decimal
/// fixed-point string and a `%d-%m-%Y` day.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSharePriceDaily {
    pub share_price: String,
    pub day: String,
}

/// `data` payload of the open-trades query.
#[derive(Debug, Deserialize)]
pub struct TradesData {
    pub trades: Vec<RawTrade>,
}

#[derive(Debug, Deserialize)]
pub struct RawPair {
    pub from: String,
    pub to: String,
}

/// One open trade as the subgraph reports it. Every numeric field arrives as
/// a fixed-point integer string.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrade {
    pub pair: RawPair,
    pub trader: String,
    pub is_buy: bool,
    pub collateral: String,
    pub leverage: String,
    pub notional: String,
    pub trade_notional: String,
    pub open_price: String,
    pub take_profit_price: String,
    pub stop_loss_price: String,
    pub funding: String,
    pub rollover: String,
}

/// One latest-price record from the price listener.
#[derive(Debug, Deserialize)]
pub struct RawQuote {
    pub from: String,
    pub to: String,
    pub mid: f64,
}

/// Decodes the share-price GraphQL response into an ordered price history.
pub fn decode_share_price_history(raw: &str) -> Result<PriceHistory, ApiError> {
    let data: SharePriceData = decode_envelope(raw)?;

    let points = data
        .dailies
        .iter()
        .map(|daily| {
            Ok(PricePoint {
                day: parse_day(&daily.day)?,
                price: scaled_to_f64(&daily.share_price, PRICE_DECIMALS)?,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    PriceHistory::new(points).map_err(|e| ApiError::InvalidData(e.to_string()))
}

/// Decodes the open-trades GraphQL response into converted positions.
pub fn decode_open_positions(raw: &str) -> Result<Vec<OpenPosition>, ApiError> {
    let data: TradesData = decode_envelope(raw)?;
    data.trades.iter().map(convert_trade).collect()
}

/// Decodes the price-listener response into per-pair quotes.
pub fn decode_latest_quotes(raw: &str) -> Result<Vec<PairQuote>, ApiError> {
    let quotes: Vec<RawQuote> =
        serde_json::from_str(raw).map_err(|e| ApiError::Deserialization(e.to_string()))?;

    Ok(quotes
        .into_iter()
        .map(|quote| PairQuote {
            pair: join_pair(&quote.from, &quote.to),
            mid: quote.mid,
        })
        .collect())
}

fn decode_envelope<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, ApiError> {
    let envelope: GraphQlEnvelope<T> =
        serde_json::from_str(raw).map_err(|e| ApiError::Deserialization(e.to_string()))?;

    if !envelope.errors.is_empty() {
        let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
        return Err(ApiError::Subgraph(messages.join("; ")));
    }
    envelope
        .data
        .ok_or_else(|| ApiError::InvalidData("response carried neither data nor errors".to_string()))
}

fn convert_trade(trade: &RawTrade) -> Result<OpenPosition, ApiError> {
    Ok(OpenPosition {
        pair: join_pair(&trade.pair.from, &trade.pair.to),
        trader: trade.trader.clone(),
        side: if trade.is_buy { Side::Buy } else { Side::Sell },
        collateral: scaled_to_f64(&trade.collateral, COLLATERAL_DECIMALS)?,
        leverage: scaled_to_f64(&trade.leverage, LEVERAGE_DECIMALS)?,
        notional: scaled_to_f64(&trade.notional, COLLATERAL_DECIMALS)?,
        trade_notional: scaled_to_f64(&trade.trade_notional, PRICE_DECIMALS)?,
        open_price: scaled_to_f64(&trade.open_price, PRICE_DECIMALS)?,
        take_profit_price: scaled_to_f64(&trade.take_profit_price, PRICE_DECIMALS)?,
        stop_loss_price: scaled_to_f64(&trade.stop_loss_price, PRICE_DECIMALS)?,
        funding: scaled_to_f64(&trade.funding, PRICE_DECIMALS)?,
        rollover: scaled_to_f64(&trade.rollover, PRICE_DECIMALS)?,
    })
}

fn join_pair(from: &str, to: &str) -> String {
    format!("{from}{to}")
}

fn parse_day(day: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(day, "%d-%m-%Y")
        .map_err(|e| ApiError::InvalidData(format!("unparseable day '{day}': {e}")))
}

/// Converts a fixed-point integer string to `f64` by dividing through
/// `10^decimals` in exact decimal arithmetic first.
fn scaled_to_f64(raw: &str, decimals: u32) -> Result<f64, ApiError> {
    let value = Decimal::from_str(raw)
        .map_err(|e| ApiError::Deserialization(format!("unparseable number '{raw}': {e}")))?;
    let scaled = value / Decimal::from(10u64.pow(decimals));
    scaled
        .to_f64()
        .ok_or_else(|| ApiError::InvalidData(format!("number '{raw}' does not fit in f64")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_price_history_decodes_scaled_and_ordered() {
        let raw = r#"{
            "data": {
                "shareToAssetsPriceDailies": [
                    {"sharePrice": "1060186249627596400", "day": "02-03-2026"},
                    {"sharePrice": "1053684295316881500", "day": "01-03-2026"}
                ]
            }
        }"#;

        let history = decode_share_price_history(raw).unwrap();

        assert_eq!(history.len(), 2);
        let latest = history.latest().unwrap();
        assert_eq!(latest.day, "2026-03-02".parse().unwrap());
        assert!((latest.price - 1.0601862496275964).abs() < 1e-12);
        assert!((history.points()[1].price - 1.0536842953168815).abs() < 1e-12);
    }

    #[test]
    fn out_of_order_dailies_are_rejected() {
        let raw = r#"{
            "data": {
                "shareToAssetsPriceDailies": [
                    {"sharePrice": "1000000000000000000", "day": "01-03-2026"},
                    {"sharePrice": "1000000000000000000", "day": "02-03-2026"}
                ]
            }
        }"#;

        assert!(matches!(
            decode_share_price_history(raw),
            Err(ApiError::InvalidData(_))
        ));
    }

    #[test]
    fn graphql_errors_surface_as_subgraph_errors() {
        let raw = r#"{"data": null, "errors": [{"message": "rate limited"}]}"#;

        match decode_share_price_history(raw) {
            Err(ApiError::Subgraph(message)) => assert!(message.contains("rate limited")),
            other => panic!("expected Subgraph error, got {other:?}"),
        }
    }

    #[test]
    fn open_positions_decode_all_fixed_point_scales() {
        let raw = r#"{
            "data": {
                "trades": [{
                    "pair": {"from": "ETH", "to": "USD"},
                    "trader": "0xabc",
                    "isBuy": true,
                    "collateral": "250000000",
                    "leverage": "1000",
                    "notional": "2500000000",
                    "tradeNotional": "1250000000000000000",
                    "openPrice": "2000000000000000000000",
                    "takeProfitPrice": "2200000000000000000000",
                    "stopLossPrice": "1900000000000000000000",
                    "funding": "-1500000000000000000",
                    "rollover": "500000000000000000"
                }]
            }
        }"#;

        let positions = decode_open_positions(raw).unwrap();

        assert_eq!(positions.len(), 1);
        let position = &positions[0];
        assert_eq!(position.pair, "ETHUSD");
        assert_eq!(position.side, Side::Buy);
        assert!((position.collateral - 250.0).abs() < 1e-9);
        assert!((position.leverage - 10.0).abs() < 1e-9);
        assert!((position.notional - 2500.0).abs() < 1e-9);
        assert!((position.trade_notional - 1.25).abs() < 1e-9);
        assert!((position.open_price - 2000.0).abs() < 1e-9);
        assert!((position.take_profit_price - 2200.0).abs() < 1e-9);
        assert!((position.stop_loss_price - 1900.0).abs() < 1e-9);
        assert!((position.funding + 1.5).abs() < 1e-9);
        assert!((position.rollover - 0.5).abs() < 1e-9);
    }

    #[test]
    fn quotes_join_pairs_into_one_symbol() {
        let raw = r#"[
            {"from": "ETH", "to": "USD", "mid": 2010.5},
            {"from": "BTC", "to": "USD", "mid": 64000.0}
        ]"#;

        let quotes = decode_latest_quotes(raw).unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].pair, "ETHUSD");
        assert!((quotes[0].mid - 2010.5).abs() < 1e-9);
    }

    #[test]
    fn unparseable_numbers_and_days_fail_fast() {
        let bad_day = r#"{
            "data": {
                "shareToAssetsPriceDailies": [
                    {"sharePrice": "1000000000000000000", "day": "2026/03/01"}
                ]
            }
        }"#;
        assert!(matches!(
            decode_share_price_history(bad_day),
            Err(ApiError::InvalidData(_))
        ));

        let bad_number = r#"{
            "data": {
                "shareToAssetsPriceDailies": [
                    {"sharePrice": "not-a-number", "day": "01-03-2026"}
                ]
            }
        }"#;
        assert!(matches!(
            decode_share_price_history(bad_number),
            Err(ApiError::Deserialization(_))
        ));
    }
}
