use super::{convert, ui};
use crate::core::{Action, ConverterSession, ConverterState, RateProvider};
use anyhow::{Result, bail};
use chrono::Utc;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  from <CODE>    set the currency to convert from (re-fetches rates)
  to <CODE>      set the currency to convert to
  amount <N>     set the amount
  swap           swap from and to
  convert        convert the amount and add it to history
  history        show past conversions
  list           show available currencies
  refresh        fetch rates again
  help           show this help
  quit           leave the session";

#[derive(Debug, PartialEq)]
pub enum Command {
    From(String),
    To(String),
    Amount(String),
    Swap,
    Convert,
    History,
    List,
    Refresh,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command> {
    let mut parts = line.split_whitespace();
    let Some(name) = parts.next() else {
        bail!("Empty command");
    };
    let arg = parts.next();

    let command = match (name.to_lowercase().as_str(), arg) {
        ("from", Some(code)) => Command::From(code.to_string()),
        ("to", Some(code)) => Command::To(code.to_string()),
        ("amount", Some(amount)) => Command::Amount(amount.to_string()),
        ("from" | "to" | "amount", None) => bail!("Missing argument for '{name}'"),
        ("swap" | "reverse", _) => Command::Swap,
        ("convert" | "c", _) => Command::Convert,
        ("history", _) => Command::History,
        ("list", _) => Command::List,
        ("refresh", _) => Command::Refresh,
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit" | "q", _) => Command::Quit,
        _ => bail!("Unknown command '{name}', type 'help' for a list"),
    };
    Ok(command)
}

#[derive(Debug, PartialEq)]
pub enum Reply {
    Print(String),
    Quit,
}

pub fn execute(session: &mut ConverterSession, command: Command) -> Reply {
    let output = match command {
        Command::From(code) => {
            session.dispatch(Action::SetFrom(code));
            status(session.state())
        }
        Command::To(code) => {
            session.dispatch(Action::SetTo(code));
            status(session.state())
        }
        Command::Amount(amount) => {
            session.dispatch(Action::SetAmount(amount));
            format!("Amount set to {}", session.state().amount())
        }
        Command::Swap => {
            session.dispatch(Action::Reverse);
            status(session.state())
        }
        Command::Convert => {
            let before = session.state().conversions();
            session.dispatch(Action::Convert { at: Utc::now() });
            let state = session.state();
            if state.conversions() > before {
                convert::conversion_line(state)
            } else {
                status(state)
            }
        }
        Command::History => convert::history_table(session.state().history()),
        Command::List => {
            let currencies = session.state().currencies();
            if currencies.is_empty() {
                "No currencies loaded yet.".to_string()
            } else {
                currencies.join(" ")
            }
        }
        Command::Refresh => {
            session.dispatch(Action::Refresh);
            "Refreshing exchange rates...".to_string()
        }
        Command::Help => HELP.to_string(),
        Command::Quit => return Reply::Quit,
    };
    Reply::Print(output)
}

/// Notice if one is pending, otherwise the indicative rate line.
fn status(state: &ConverterState) -> String {
    match state.notice() {
        Some(notice) => ui::style_text(notice, ui::StyleType::Error),
        None => convert::rate_line(state),
    }
}

fn prompt(state: &ConverterState) {
    print!("{} {} → {} > ", state.amount(), state.from(), state.to());
    let _ = std::io::stdout().flush();
}

/// Runs an interactive converter session on stdin until `quit` or EOF.
pub async fn run(
    provider: Arc<dyn RateProvider>,
    from: &str,
    to: &str,
    amount: &str,
    history_limit: Option<usize>,
) -> Result<()> {
    let mut session =
        ConverterSession::start(provider, ConverterState::new(from, to, amount, history_limit));

    println!(
        "{}\n{}\n",
        ui::style_text("CURRENCY CONVERTER", ui::StyleType::Title),
        ui::style_text("Type 'help' for commands.", ui::StyleType::Subtle)
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt(session.state());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    prompt(session.state());
                    continue;
                }
                match parse_command(&line) {
                    Ok(command) => {
                        debug!(?command, "Executing command");
                        match execute(&mut session, command) {
                            Reply::Print(output) => println!("{output}"),
                            Reply::Quit => break,
                        }
                    }
                    Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
                }
                prompt(session.state());
            }
            Some(outcome) = session.next_outcome() => {
                let current = outcome.seq == session.state().latest_seq();
                session.apply(outcome);
                if current {
                    println!("\n{}", status(session.state()));
                    prompt(session.state());
                }
            }
        }
    }

    println!();
    Ok(())
}
