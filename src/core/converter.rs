//! Converter state machine.
//!
//! The whole converter view is one [`ConverterState`] value. Every user action
//! and every fetch outcome goes through [`ConverterState::reduce`], which
//! returns the next state together with the fetch it wants issued, if any.

use super::history::{ConversionHistory, ConversionRecord};
use super::rates::{PairRate, RateFetchError, RateTable, normalize_code};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, PartialEq)]
pub enum ConvertError {
    #[error("Exchange rate for {from} is still loading")]
    RateNotReady { from: String },

    #[error("No exchange rate available for {from} → {to}")]
    MissingRateForPair { from: String, to: String },

    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("Invalid exchange rate: {0}")]
    InvalidRate(f64),

    #[error("Converted amount is too large")]
    Overflow,
}

/// Multiplies `amount` by `rate` and rounds to 2 decimal places, half away
/// from zero.
pub fn convert(amount: Decimal, rate: f64) -> Result<Decimal, ConvertError> {
    let rate = Decimal::from_f64(rate).ok_or(ConvertError::InvalidRate(rate))?;
    amount
        .checked_mul(rate)
        .map(|v| v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .ok_or(ConvertError::Overflow)
}

pub fn parse_amount(input: &str) -> Result<Decimal, ConvertError> {
    let amount = input
        .trim()
        .parse::<Decimal>()
        .map_err(|_| ConvertError::InvalidAmount(input.to_string()))?;
    if amount.is_sign_negative() {
        return Err(ConvertError::InvalidAmount(input.to_string()));
    }
    Ok(amount)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateStatus {
    /// No table for the current `from` currency has been applied yet.
    Awaiting,
    Ready(f64),
    /// The table for `from` is loaded but has no entry for `to`.
    Unavailable,
}

/// Result of one fetch, tagged with the sequence number it was issued under.
#[derive(Debug)]
pub struct FetchOutcome {
    pub seq: u64,
    pub base: String,
    pub result: Result<RateTable, RateFetchError>,
}

#[derive(Debug)]
pub enum Action {
    SetFrom(String),
    SetTo(String),
    SetAmount(String),
    Reverse,
    Refresh,
    Convert { at: DateTime<Utc> },
    RatesLoaded(FetchOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch { seq: u64, base: String },
}

#[derive(Debug)]
pub struct Transition {
    pub state: ConverterState,
    pub effect: Option<Effect>,
}

impl From<ConverterState> for Transition {
    fn from(state: ConverterState) -> Self {
        Transition {
            state,
            effect: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConverterState {
    from: String,
    to: String,
    amount: String,
    converted_amount: Option<Decimal>,
    status: RateStatus,
    rates: Option<RateTable>,
    currencies: Vec<String>,
    history: ConversionHistory,
    notice: Option<String>,
    latest_seq: u64,
    next_record_id: u64,
}

impl ConverterState {
    pub fn new(from: &str, to: &str, amount: &str, history_limit: Option<usize>) -> Self {
        ConverterState {
            from: normalize_code(from),
            to: normalize_code(to),
            amount: amount.to_string(),
            converted_amount: None,
            status: RateStatus::Awaiting,
            rates: None,
            currencies: Vec::new(),
            history: ConversionHistory::new(history_limit),
            notice: None,
            latest_seq: 0,
            next_record_id: 1,
        }
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn converted_amount(&self) -> Option<Decimal> {
        self.converted_amount
    }

    pub fn status(&self) -> RateStatus {
        self.status
    }

    pub fn rates(&self) -> Option<&RateTable> {
        self.rates.as_ref()
    }

    pub fn currencies(&self) -> &[String] {
        &self.currencies
    }

    pub fn history(&self) -> &ConversionHistory {
        &self.history
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Number of conversions completed in this session, independent of how
    /// many records the history still holds.
    pub fn conversions(&self) -> u64 {
        self.next_record_id - 1
    }

    pub fn reduce(self, action: Action) -> Transition {
        match action {
            Action::SetFrom(code) => self.set_from(code),
            Action::SetTo(code) => self.set_to(code).into(),
            Action::SetAmount(amount) => ConverterState { amount, ..self }.into(),
            Action::Reverse => self.reverse(),
            Action::Refresh => self.issue_fetch(),
            Action::Convert { at } => self.apply_convert(at).into(),
            Action::RatesLoaded(outcome) => self.apply_outcome(outcome).into(),
        }
    }

    fn set_from(mut self, code: String) -> Transition {
        let code = normalize_code(&code);
        if code.is_empty() {
            self.notice = Some("Currency code cannot be empty".to_string());
            return self.into();
        }
        if code == self.from {
            return self.into();
        }
        self.from = code;
        self.status = RateStatus::Awaiting;
        self.issue_fetch()
    }

    fn set_to(mut self, code: String) -> Self {
        let code = normalize_code(&code);
        if code.is_empty() {
            self.notice = Some("Currency code cannot be empty".to_string());
            return self;
        }
        self.to = code;
        self.status = self.lookup_status();
        self
    }

    fn reverse(mut self) -> Transition {
        std::mem::swap(&mut self.from, &mut self.to);
        self.status = RateStatus::Awaiting;
        self.issue_fetch()
    }

    fn issue_fetch(mut self) -> Transition {
        self.latest_seq += 1;
        let effect = Effect::Fetch {
            seq: self.latest_seq,
            base: self.from.clone(),
        };
        Transition {
            state: self,
            effect: Some(effect),
        }
    }

    fn lookup_status(&self) -> RateStatus {
        match &self.rates {
            Some(table) if table.base == self.from => match table.rate_for(&self.to) {
                PairRate::Found(rate) => RateStatus::Ready(rate),
                PairRate::Unavailable => RateStatus::Unavailable,
            },
            _ => RateStatus::Awaiting,
        }
    }

    fn apply_outcome(mut self, outcome: FetchOutcome) -> Self {
        if outcome.seq != self.latest_seq {
            debug!(
                seq = outcome.seq,
                latest = self.latest_seq,
                base = %outcome.base,
                "Discarding superseded rate response"
            );
            return self;
        }

        match outcome.result {
            Ok(table) => {
                debug!(base = %table.base, count = table.len(), "Applying rate table");
                self.currencies = table.codes();
                self.rates = Some(table);
                self.status = self.lookup_status();
                self.notice = None;
                if let RateStatus::Ready(rate) = self.status {
                    if let Ok(amount) = parse_amount(&self.amount) {
                        self.converted_amount = convert(amount, rate).ok();
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, base = %outcome.base, "Failed to fetch exchange rates");
                self.notice = Some(format!("Error fetching exchange rates: {e}"));
            }
        }
        self
    }

    fn apply_convert(mut self, at: DateTime<Utc>) -> Self {
        match self.build_record(at) {
            Ok(record) => {
                debug!(id = record.id, "Recorded conversion");
                self.converted_amount = Some(record.converted_amount);
                self.next_record_id += 1;
                self.notice = None;
                self.history.record(record);
            }
            Err(e) => {
                debug!(error = %e, "Conversion rejected");
                self.notice = Some(e.to_string());
            }
        }
        self
    }

    fn build_record(&self, at: DateTime<Utc>) -> Result<ConversionRecord, ConvertError> {
        let rate = match self.status {
            RateStatus::Ready(rate) => rate,
            RateStatus::Awaiting => {
                return Err(ConvertError::RateNotReady {
                    from: self.from.clone(),
                });
            }
            RateStatus::Unavailable => {
                return Err(ConvertError::MissingRateForPair {
                    from: self.from.clone(),
                    to: self.to.clone(),
                });
            }
        };
        let amount = parse_amount(&self.amount)?;
        let converted_amount = convert(amount, rate)?;

        Ok(ConversionRecord {
            id: self.next_record_id,
            created_at: at,
            from: self.from.clone(),
            to: self.to.clone(),
            amount: self.amount.clone(),
            converted_amount,
            exchange_rate: rate,
        })
    }
}
