//! Exchange rate tables and the provider abstraction that fetches them

use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

/// Rates for one base currency, as returned by a single fetch.
///
/// Each value is the number of units of that currency per one unit of `base`.
/// Codes are kept sorted so listings are stable across fetches.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    pub base: String,
    pub date: Option<String>,
    rates: BTreeMap<String, f64>,
}

/// Outcome of looking up a single currency in a [`RateTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairRate {
    Found(f64),
    Unavailable,
}

impl RateTable {
    pub fn new(base: &str, date: Option<String>, rates: BTreeMap<String, f64>) -> Self {
        RateTable {
            base: base.to_string(),
            date,
            rates,
        }
    }

    pub fn rate_for(&self, code: &str) -> PairRate {
        match self.rates.get(code) {
            Some(rate) => PairRate::Found(*rate),
            None => PairRate::Unavailable,
        }
    }

    pub fn codes(&self) -> Vec<String> {
        self.rates.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum RateFetchError {
    #[error("Base currency code cannot be empty")]
    EmptyBase,

    #[error("Request error for base currency {base}: {source}")]
    Network {
        base: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error: {status} for base currency: {base}")]
    Status {
        base: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed rate response for {base}: {reason}")]
    Malformed { base: String, reason: String },
}

impl RateFetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, RateFetchError::Network { source, .. } if source.is_timeout())
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, RateFetchError>;
}

/// Normalizes user input into a currency code: trimmed and upper-cased.
pub fn normalize_code(input: &str) -> String {
    input.trim().to_uppercase()
}
