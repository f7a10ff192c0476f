pub mod budget;
pub mod domains;
pub mod rates;
pub mod setup;
pub mod subscriptions;
pub mod summary;
pub mod ui;

use crate::core::rates::{ExchangeRateProvider, RefreshOutcome};
use crate::core::state::Tracker;

/// Refreshes the tracker's rates behind a spinner.
pub async fn fetch_rates(
    tracker: &mut Tracker,
    provider: &(dyn ExchangeRateProvider + Send + Sync),
) -> RefreshOutcome {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let outcome = tracker.refresh_rates(provider).await;
    pb.finish_and_clear();
    outcome
}
