use super::ui;
use crate::core::{Action, ConversionHistory, ConverterSession, ConverterState, RateProvider, RateStatus};
use anyhow::{Result, anyhow};
use chrono::Utc;
use comfy_table::Cell;
use std::sync::Arc;

/// The indicative rate line shown under the converter.
pub fn rate_line(state: &ConverterState) -> String {
    match state.status() {
        RateStatus::Ready(rate) => format!(
            "Indicative Exchange Rate: 1 {} = {:.6} {}",
            state.from(),
            rate,
            state.to()
        ),
        RateStatus::Awaiting => "Loading exchange rate...".to_string(),
        RateStatus::Unavailable => format!(
            "Exchange rate unavailable for {} → {}",
            state.from(),
            state.to()
        ),
    }
}

pub fn conversion_line(state: &ConverterState) -> String {
    let converted = state
        .converted_amount()
        .map_or("-".to_string(), |v| format!("{v:.2}"));
    format!(
        "{} {} = {} {}",
        state.amount(),
        state.from(),
        ui::style_text(&converted, ui::StyleType::Value),
        state.to()
    )
}

pub fn history_table(history: &ConversionHistory) -> String {
    if history.is_empty() {
        return ui::style_text("No conversions yet.", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Time"),
        ui::header_cell("Conversion"),
        ui::header_cell("Rate"),
    ]);
    for record in history.iter() {
        table.add_row(vec![
            Cell::new(record.id),
            Cell::new(record.created_at.format("%H:%M:%S")),
            Cell::new(record.summary_line()),
            ui::subtle_cell(&record.rate_line()),
        ]);
    }
    table.to_string()
}

/// Converts a single amount and prints the result.
pub async fn run(
    provider: Arc<dyn RateProvider>,
    from: &str,
    to: &str,
    amount: &str,
    history_limit: Option<usize>,
) -> Result<()> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let mut session =
        ConverterSession::start(provider, ConverterState::new(from, to, amount, history_limit));
    session.settle().await;
    pb.finish_and_clear();

    let before = session.state().conversions();
    session.dispatch(Action::Convert { at: Utc::now() });
    let state = session.state();

    if state.conversions() == before {
        let notice = state.notice().unwrap_or("Conversion failed");
        println!("{}", ui::style_text(notice, ui::StyleType::Error));
        return Err(anyhow!("{notice}"));
    }

    println!("{}", conversion_line(state));
    println!("{}", ui::style_text(&rate_line(state), ui::StyleType::Subtle));
    println!("\n{}", ui::style_text("History", ui::StyleType::Label));
    println!("{}", history_table(state.history()));
    Ok(())
}
