use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Targets shown for the given verbosity. Verbose runs also surface the HTTP
/// client, which is where rate fetch timeouts show up first.
pub fn log_targets(verbose: bool) -> Targets {
    if verbose {
        Targets::new()
            .with_target("xconv", LevelFilter::DEBUG)
            .with_target("reqwest", LevelFilter::INFO)
    } else {
        Targets::new().with_target("xconv", LevelFilter::OFF)
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
/// Logs go to stderr so they never mix into rendered tables.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "off" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(log_targets(verbose))
        .with(env_filter)
        .init();
}
