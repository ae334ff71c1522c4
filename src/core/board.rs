//! Rate board: a fixed list of currencies quoted against one base currency.

use super::rates::{PairRate, RateFetchError, RateTable};

pub const DEFAULT_BOARD_BASE: &str = "IDR";
pub const DEFAULT_BOARD_CURRENCIES: [&str; 5] = ["USD", "EUR", "JPY", "SGD", "CNY"];

/// The only three states the board can be rendered in.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardState {
    Loading,
    Failed(String),
    Loaded(RateTable),
}

impl From<Result<RateTable, RateFetchError>> for BoardState {
    fn from(result: Result<RateTable, RateFetchError>) -> Self {
        match result {
            Ok(table) => BoardState::Loaded(table),
            Err(e) => BoardState::Failed(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateRow {
    pub code: String,
    pub name: &'static str,
    pub symbol: &'static str,
    pub rate: f64,
    pub inverse: f64,
}

impl RateRow {
    pub fn amount_label(&self) -> String {
        format!("{}{:.6}", self.symbol, self.rate)
    }

    pub fn inverse_label(&self, base: &str) -> String {
        format!("1 {} = {} {}", self.code, self.inverse, base)
    }
}

/// Rows for each requested code present in `table`, in the requested order,
/// and the codes that were missing.
pub fn board_rows(table: &RateTable, codes: &[String]) -> (Vec<RateRow>, Vec<String>) {
    let mut rows = Vec::new();
    let mut missing = Vec::new();

    for code in codes {
        match table.rate_for(code) {
            PairRate::Found(rate) => rows.push(RateRow {
                code: code.clone(),
                name: currency_name(code),
                symbol: currency_symbol(code),
                rate,
                inverse: 1.0 / rate,
            }),
            PairRate::Unavailable => missing.push(code.clone()),
        }
    }

    (rows, missing)
}

/// Label for one unit of the base currency, e.g. `Rp 1`.
pub fn base_label(base: &str) -> String {
    format!("{}1", currency_symbol(base))
}

pub fn currency_name(code: &str) -> &'static str {
    match code {
        "IDR" => "Indonesian Rupiah",
        "USD" => "US Dollar",
        "EUR" => "Euro",
        "JPY" => "Japanese Yen",
        "SGD" => "Singapore Dollar",
        "CNY" => "Chinese Yuan",
        "GBP" => "British Pound",
        "AUD" => "Australian Dollar",
        "MYR" => "Malaysian Ringgit",
        "INR" => "Indian Rupee",
        _ => "",
    }
}

pub fn currency_symbol(code: &str) -> &'static str {
    match code {
        "IDR" => "Rp ",
        "USD" => "$",
        "EUR" => "€ ",
        "JPY" | "CNY" => "¥ ",
        "SGD" => "S$ ",
        "GBP" => "£ ",
        "AUD" => "A$ ",
        "MYR" => "RM ",
        "INR" => "₹ ",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn idr_table() -> RateTable {
        let rates = BTreeMap::from([
            ("USD".to_string(), 0.000065),
            ("EUR".to_string(), 0.00006),
        ]);
        RateTable::new("IDR", None, rates)
    }

    fn default_codes() -> Vec<String> {
        DEFAULT_BOARD_CURRENCIES
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    #[test]
    fn test_board_rows_for_present_codes() {
        let (rows, missing) = board_rows(&idr_table(), &default_codes());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].code, "USD");
        assert_eq!(rows[0].name, "US Dollar");
        assert_eq!(rows[0].amount_label(), "$0.000065");
        assert_eq!(rows[1].code, "EUR");
        assert_eq!(rows[1].amount_label(), "€ 0.000060");
        assert_eq!(missing, vec!["JPY", "SGD", "CNY"]);
    }

    #[test]
    fn test_inverse_is_computed_from_raw_rate() {
        let (rows, _) = board_rows(&idr_table(), &default_codes());
        let usd = &rows[0];

        assert_eq!(usd.inverse, 1.0 / 0.000065);
        assert!((usd.inverse - 15384.615384615).abs() < 1e-6);
        assert!(usd.inverse_label("IDR").starts_with("1 USD = 15384.615"));
        assert!(usd.inverse_label("IDR").ends_with(" IDR"));
    }

    #[test]
    fn test_board_state_from_result() {
        let loaded = BoardState::from(Ok::<_, RateFetchError>(idr_table()));
        assert_eq!(loaded, BoardState::Loaded(idr_table()));

        let failed = BoardState::from(Err::<RateTable, _>(RateFetchError::EmptyBase));
        assert_eq!(
            failed,
            BoardState::Failed("Base currency code cannot be empty".to_string())
        );
    }

    #[test]
    fn test_base_label() {
        assert_eq!(base_label("IDR"), "Rp 1");
        assert_eq!(base_label("XYZ"), "1");
    }
}
