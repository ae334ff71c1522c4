use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// A completed conversion. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRecord {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub from: String,
    pub to: String,
    pub amount: String,
    pub converted_amount: Decimal,
    pub exchange_rate: f64,
}

impl ConversionRecord {
    pub fn summary_line(&self) -> String {
        format!(
            "{} {} → {:.2} {}",
            self.amount, self.from, self.converted_amount, self.to
        )
    }

    pub fn rate_line(&self) -> String {
        format!(
            "Rate: 1 {} = {:.6} {}",
            self.from, self.exchange_rate, self.to
        )
    }
}

/// Conversions of the current session, newest first.
///
/// Unbounded unless a limit is given, in which case the oldest entries are
/// dropped once the limit is exceeded.
#[derive(Debug, Clone, Default)]
pub struct ConversionHistory {
    records: VecDeque<ConversionRecord>,
    limit: Option<usize>,
}

impl ConversionHistory {
    pub fn new(limit: Option<usize>) -> Self {
        ConversionHistory {
            records: VecDeque::new(),
            limit,
        }
    }

    pub fn record(&mut self, record: ConversionRecord) {
        self.records.push_front(record);
        if let Some(limit) = self.limit {
            self.records.truncate(limit);
        }
    }

    pub fn latest(&self) -> Option<&ConversionRecord> {
        self.records.front()
    }

    pub fn get(&self, index: usize) -> Option<&ConversionRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
