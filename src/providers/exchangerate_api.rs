use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::core::rates::{RateFetchError, RateProvider, RateTable};

pub const DEFAULT_BASE_URL: &str = "https://api.exchangerate-api.com/v4/latest";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ExchangeRateApiProvider implementation for RateProvider
pub struct ExchangeRateApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("xconv/0.1")
            .timeout(timeout)
            .build()?;
        Ok(ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    date: Option<String>,
    rates: BTreeMap<String, serde_json::Value>,
}

fn parse_rates(base: &str, text: &str) -> Result<RateTable, RateFetchError> {
    let data: LatestRatesResponse =
        serde_json::from_str(text).map_err(|e| RateFetchError::Malformed {
            base: base.to_string(),
            reason: e.to_string(),
        })?;

    let mut rates = BTreeMap::new();
    for (code, value) in data.rates {
        match value.as_f64() {
            Some(rate) if rate.is_finite() && rate > 0.0 => {
                rates.insert(code, rate);
            }
            _ => warn!(%code, %value, "Skipping invalid rate"),
        }
    }

    if rates.is_empty() {
        return Err(RateFetchError::Malformed {
            base: base.to_string(),
            reason: "no usable rates in response".to_string(),
        });
    }

    Ok(RateTable::new(base, data.date, rates))
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(name = "RateFetch", skip(self), fields(base = %base))]
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, RateFetchError> {
        if base.is_empty() {
            return Err(RateFetchError::EmptyBase);
        }

        let url = format!("{}/{}", self.base_url, base);
        debug!("Requesting exchange rates from {}", url);

        let response =
            self.client
                .get(&url)
                .send()
                .await
                .map_err(|source| RateFetchError::Network {
                    base: base.to_string(),
                    source,
                })?;

        if !response.status().is_success() {
            return Err(RateFetchError::Status {
                base: base.to_string(),
                status: response.status(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|source| RateFetchError::Network {
                base: base.to_string(),
                source,
            })?;

        let table = parse_rates(base, &text)?;
        debug!(count = table.len(), "Received exchange rates");
        Ok(table)
    }
}
