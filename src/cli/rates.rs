use super::ui;
use crate::core::RateProvider;
use crate::core::board::{self, BoardState};
use anyhow::{Result, bail};
use comfy_table::Cell;
use tracing::debug;

pub fn render_board(state: &BoardState, codes: &[String]) -> String {
    let table = match state {
        BoardState::Loading => return "Loading...".to_string(),
        BoardState::Failed(e) => {
            return format!(
                "{}\n{}",
                ui::style_text("Error loading data.", ui::StyleType::Error),
                ui::style_text(e, ui::StyleType::Subtle)
            );
        }
        BoardState::Loaded(table) => table,
    };

    let date = table
        .date
        .clone()
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());

    let mut output = format!(
        "{}  {}\n\n",
        ui::style_text("CURRENCY CONVERTER", ui::StyleType::Title),
        ui::style_text(&date, ui::StyleType::Subtle)
    );

    let mut grid = ui::new_styled_table();
    grid.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Code"),
        ui::header_cell("Amount"),
        ui::header_cell(&format!("Rate ({})", table.base)),
    ]);

    grid.add_row(vec![
        Cell::new(board::currency_name(&table.base)),
        Cell::new(&table.base),
        ui::amount_cell(&board::base_label(&table.base)),
        ui::subtle_cell(""),
    ]);

    let (rows, missing) = board::board_rows(table, codes);
    for row in &rows {
        grid.add_row(vec![
            Cell::new(row.name),
            Cell::new(&row.code),
            ui::amount_cell(&row.amount_label()),
            ui::subtle_cell(&row.inverse_label(&table.base)),
        ]);
    }
    output.push_str(&grid.to_string());

    if !missing.is_empty() {
        output.push_str(&format!(
            "\n\n{}",
            ui::style_text(
                &format!("No rate available for: {}", missing.join(", ")),
                ui::StyleType::Subtle
            )
        ));
    }

    output
}

pub async fn run(provider: &dyn RateProvider, base: &str, codes: &[String]) -> Result<()> {
    debug!(%base, ?codes, "Rendering rate board");

    let pb = ui::new_spinner(&render_board(&BoardState::Loading, codes));
    let state: BoardState = provider.fetch_rates(base).await.into();
    pb.finish_and_clear();

    println!("{}", render_board(&state, codes));

    if let BoardState::Failed(e) = state {
        bail!("Error loading data: {e}");
    }
    Ok(())
}
