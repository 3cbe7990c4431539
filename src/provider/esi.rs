//! ESI (EVE Swagger Interface) client implementation.

use super::{MarketSource, UpstreamError};
use crate::domain::{AdjustedPrice, MarketOrder, RegionId, SystemCostIndices, TypeId};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Public ESI root used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://esi.evetech.net/latest";

/// Per-request timeout; slow pages are retried rather than waited out.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
/// Total time budget across retries of one logical request.
const RETRY_BUDGET: Duration = Duration::from_secs(30);

/// Market data source backed by the public ESI API.
#[derive(Debug, Clone)]
pub struct EsiMarketSource {
    client: Client,
    base_url: String,
}

impl EsiMarketSource {
    /// Create a new ESI market source.
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn orders_url(&self, region: RegionId, type_id: TypeId) -> String {
        format!(
            "{}/markets/{}/orders/?order_type=all&page=1&type_id={}",
            self.base_url, region, type_id
        )
    }

    fn prices_url(&self) -> String {
        format!("{}/markets/prices/", self.base_url)
    }

    fn systems_url(&self) -> String {
        format!("{}/industry/systems/", self.base_url)
    }

    /// GET a JSON document with retry. Returns the parsed body and the
    /// page count the server reported (1 when the header is absent).
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<(T, u32), UpstreamError> {
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(RETRY_BUDGET),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self
                .client
                .get(url)
                .timeout(REQUEST_TIMEOUT)
                .send()
                .await
                .map_err(|e| {
                    backoff::Error::transient(UpstreamError::NetworkError(e.to_string()))
                })?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(UpstreamError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(UpstreamError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(UpstreamError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            let pages = response
                .headers()
                .get("x-pages")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(1);

            let body = response.json::<T>().await.map_err(|e| {
                backoff::Error::permanent(UpstreamError::ParseError(e.to_string()))
            })?;

            Ok((body, pages))
        })
        .await
    }
}

#[async_trait]
impl MarketSource for EsiMarketSource {
    async fn region_orders(
        &self,
        region: RegionId,
        type_id: TypeId,
    ) -> Result<Vec<MarketOrder>, UpstreamError> {
        debug!("Fetching order book for type={} in region={}", type_id, region);

        let url = self.orders_url(region, type_id);
        let (orders, pages): (Vec<MarketOrder>, u32) = self.get_json(&url).await?;
        if pages > 1 {
            warn!(
                "Order book for type {} in region {} spans {} pages; using page 1 only",
                type_id, region, pages
            );
        }
        Ok(orders)
    }

    async fn adjusted_prices(&self) -> Result<Vec<AdjustedPrice>, UpstreamError> {
        debug!("Fetching adjusted price table");

        let (prices, _) = self.get_json(&self.prices_url()).await?;
        Ok(prices)
    }

    async fn system_cost_indices(&self) -> Result<Vec<SystemCostIndices>, UpstreamError> {
        debug!("Fetching system cost indices");

        let (systems, _) = self.get_json(&self.systems_url()).await?;
        Ok(systems)
    }
}
