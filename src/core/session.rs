//! Drives a [`ConverterState`] against a live [`RateProvider`].
//!
//! Fetches run as tasks in a [`JoinSet`], so several may be in flight at
//! once. Their outcomes go through the reducer, which keeps only the one
//! matching the latest issued sequence number.

use super::converter::{Action, ConverterState, Effect, FetchOutcome};
use super::rates::RateProvider;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

pub struct ConverterSession {
    provider: Arc<dyn RateProvider>,
    state: ConverterState,
    tasks: JoinSet<FetchOutcome>,
}

impl ConverterSession {
    /// Creates the session and issues the initial fetch for the `from` currency.
    pub fn start(provider: Arc<dyn RateProvider>, state: ConverterState) -> Self {
        let mut session = ConverterSession {
            provider,
            state,
            tasks: JoinSet::new(),
        };
        session.dispatch(Action::Refresh);
        session
    }

    pub fn state(&self) -> &ConverterState {
        &self.state
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    pub fn dispatch(&mut self, action: Action) {
        let transition = self.state.clone().reduce(action);
        self.state = transition.state;
        if let Some(effect) = transition.effect {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Fetch { seq, base } => {
                debug!(seq, %base, "Spawning rate fetch");
                let provider = Arc::clone(&self.provider);
                self.tasks.spawn(async move {
                    let result = provider.fetch_rates(&base).await;
                    FetchOutcome { seq, base, result }
                });
            }
        }
    }

    /// Waits for the next fetch to report back. Returns `None` when nothing is
    /// in flight. A fetch task that panics is logged and dropped.
    pub async fn next_outcome(&mut self) -> Option<FetchOutcome> {
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(outcome) => return Some(outcome),
                Err(e) => warn!(error = %e, "Rate fetch task failed"),
            }
        }
        None
    }

    pub fn apply(&mut self, outcome: FetchOutcome) {
        self.dispatch(Action::RatesLoaded(outcome));
    }

    /// Applies outcomes until every issued fetch has reported.
    pub async fn settle(&mut self) {
        while let Some(outcome) = self.next_outcome().await {
            self.apply(outcome);
        }
    }
}
