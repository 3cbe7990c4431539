//! Market data providers: live order books, adjusted prices, and system
//! cost indices from the upstream API.

use crate::domain::{AdjustedPrice, MarketOrder, RegionId, SystemCostIndices, TypeId};
use async_trait::async_trait;
use std::fmt;

pub mod cached;
pub mod esi;
pub mod mock;

pub use cached::CachedMarketSource;
pub use esi::EsiMarketSource;
pub use mock::MockMarketSource;

/// Source of market and industry data.
///
/// Implementations must handle retry/backoff and rate limiting.
#[async_trait]
pub trait MarketSource: Send + Sync + fmt::Debug {
    /// Fetch the live order book for one type in one region, both sides.
    async fn region_orders(
        &self,
        region: RegionId,
        type_id: TypeId,
    ) -> Result<Vec<MarketOrder>, UpstreamError>;

    /// Fetch the universe-wide adjusted price table.
    async fn adjusted_prices(&self) -> Result<Vec<AdjustedPrice>, UpstreamError>;

    /// Fetch cost indices for every solar system.
    async fn system_cost_indices(&self) -> Result<Vec<SystemCostIndices>, UpstreamError>;
}

/// Error type for upstream market data operations.
#[derive(Debug, Clone)]
pub enum UpstreamError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// HTTP error that survived retries (e.g., 4xx status)
    HttpError { status: u16, message: String },
    /// Parsing error (invalid JSON or malformed response)
    ParseError(String),
    /// Rate limit exceeded after backoff gave up
    RateLimited,
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            UpstreamError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            UpstreamError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            UpstreamError::RateLimited => write!(f, "Rate limited"),
        }
    }
}

impl std::error::Error for UpstreamError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_display() {
        let err = UpstreamError::NetworkError("connection timeout".to_string());
        assert_eq!(err.to_string(), "Network error: connection timeout");

        let err = UpstreamError::HttpError {
            status: 404,
            message: "type not found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 404: type not found");

        let err = UpstreamError::ParseError("invalid JSON".to_string());
        assert_eq!(err.to_string(), "Parse error: invalid JSON");

        let err = UpstreamError::RateLimited;
        assert_eq!(err.to_string(), "Rate limited");
    }
}
