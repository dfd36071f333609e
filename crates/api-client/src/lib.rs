use crate::error::ApiError;
use async_trait::async_trait;
use configuration::settings::ApiSettings;
use core_types::{OpenPosition, PairQuote, PriceHistory};
use tracing::info;

pub mod error;
pub mod responses;

// --- Public API ---
pub use responses::{decode_latest_quotes, decode_open_positions, decode_share_price_history};

/// A decoded response paired with the raw body it was decoded from, so the
/// caller can snapshot exactly what the wire returned.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub raw: String,
    pub value: T,
}

/// The generic, abstract interface to the vault's data endpoints.
/// This trait is the contract the dashboard consumes, allowing the
/// underlying implementation (live or mock) to be swapped out.
#[async_trait]
pub trait VaultDataSource: Send + Sync {
    /// Fetches the daily share-price history, most recent first.
    async fn share_price_history(&self) -> Result<Fetched<PriceHistory>, ApiError>;

    /// Fetches all currently open positions.
    async fn open_positions(&self) -> Result<Fetched<Vec<OpenPosition>>, ApiError>;

    /// Fetches the latest mid price per pair from the price listener.
    async fn latest_quotes(&self) -> Result<Fetched<Vec<PairQuote>>, ApiError>;
}

const SHARE_PRICE_QUERY: &str = r#"
query getPrice {
    shareToAssetsPriceDailies(
        first: 100,
        orderBy: timestamp,
        orderDirection: desc) {
        sharePrice
        day
    }
}
"#;

const OPEN_TRADES_QUERY: &str = r#"
query getTrades {
  trades(where: {isOpen: true}, first: 10000) {
    pair {
      from
      to
    }
    trader
    collateral
    leverage
    notional
    tradeNotional
    openPrice
    takeProfitPrice
    stopLossPrice
    isBuy
    funding
    rollover
  }
}
"#;

/// A concrete implementation of `VaultDataSource` backed by the exchange's
/// subgraph (GraphQL) and price listener (REST).
#[derive(Clone)]
pub struct SubgraphClient {
    client: reqwest::Client,
    subgraph_url: String,
    price_listener_url: String,
}

impl SubgraphClient {
    pub fn new(api: &ApiSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            subgraph_url: api.subgraph_url.clone(),
            price_listener_url: api.price_listener_url.clone(),
        }
    }

    /// POSTs a GraphQL query and returns the raw response body.
    async fn post_query(&self, query: &str) -> Result<String, ApiError> {
        let payload = serde_json::json!({ "query": query });

        let response = self
            .client
            .post(&self.subgraph_url)
            .json(&payload)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16(), text));
        }
        Ok(text)
    }
}

#[async_trait]
impl VaultDataSource for SubgraphClient {
    async fn share_price_history(&self) -> Result<Fetched<PriceHistory>, ApiError> {
        let raw = self.post_query(SHARE_PRICE_QUERY).await?;
        let value = responses::decode_share_price_history(&raw)?;
        info!(days = value.len(), "retrieved share price history");
        Ok(Fetched { raw, value })
    }

    async fn open_positions(&self) -> Result<Fetched<Vec<OpenPosition>>, ApiError> {
        let raw = self.post_query(OPEN_TRADES_QUERY).await?;
        let value = responses::decode_open_positions(&raw)?;
        info!(count = value.len(), "retrieved open positions");
        Ok(Fetched { raw, value })
    }

    async fn latest_quotes(&self) -> Result<Fetched<Vec<PairQuote>>, ApiError> {
        let response = self.client.get(&self.price_listener_url).send().await?;
        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16(), raw));
        }
        let value = responses::decode_latest_quotes(&raw)?;
        info!(pairs = value.len(), "retrieved latest prices");
        Ok(Fetched { raw, value })
    }
}
