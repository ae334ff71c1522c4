//! Core business logic

pub mod board;
pub mod config;
pub mod converter;
pub mod history;
pub mod log;
pub mod rates;
pub mod session;

// Re-export main types for cleaner imports
pub use converter::{Action, ConverterState, RateStatus};
pub use history::{ConversionHistory, ConversionRecord};
pub use rates::{PairRate, RateFetchError, RateProvider, RateTable};
pub use session::ConverterSession;
