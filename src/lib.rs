pub mod cli;
pub mod core;
pub mod providers;

use crate::core::RateProvider;
use crate::core::rates::normalize_code;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Rates {
        base: Option<String>,
    },
    Convert {
        amount: Option<String>,
        from: Option<String>,
        to: Option<String>,
    },
    Session,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("xconv starting...");

    let config = match config_path {
        Some(path) => crate::core::config::AppConfig::load_from_path(path)?,
        None => crate::core::config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let api = &config.providers.exchangerate;
    let provider: Arc<dyn RateProvider> = Arc::new(
        providers::ExchangeRateApiProvider::new(&api.base_url, api.timeout())?,
    );

    let converter = &config.converter;
    match command {
        AppCommand::Rates { base } => {
            let base = normalize_code(base.as_deref().unwrap_or(&config.board.base));
            let codes: Vec<String> = config
                .board
                .currencies
                .iter()
                .map(|c| normalize_code(c))
                .collect();
            cli::rates::run(provider.as_ref(), &base, &codes).await
        }
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(
                provider,
                from.as_deref().unwrap_or(&converter.from),
                to.as_deref().unwrap_or(&converter.to),
                amount.as_deref().unwrap_or(&converter.amount),
                converter.history_limit,
            )
            .await
        }
        AppCommand::Session => {
            cli::session::run(
                provider,
                &converter.from,
                &converter.to,
                &converter.amount,
                converter.history_limit,
            )
            .await
        }
    }
}
