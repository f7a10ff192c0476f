//! Exchange rate provider seam and the last-known rate table.

use crate::core::currency::{Currency, Quotes, RateTable};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RateError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Status(u16),

    #[error("Malformed rates response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for RateError {
    fn from(e: reqwest::Error) -> Self {
        RateError::Network(e.to_string())
    }
}

#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Latest quotes relative to `base`: units of each code per one `base`.
    async fn latest(&self, base: Currency) -> Result<Quotes, RateError>;
}

/// A rate fetch in flight, keyed to the currency selection that started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateRequest {
    ticket: u64,
    currency: Currency,
}

impl RateRequest {
    pub fn currency(&self) -> Currency {
        self.currency
    }
}

#[derive(Debug)]
pub enum RefreshOutcome {
    Updated(Arc<RateTable>),
    /// A newer request was started; this response was dropped.
    Superseded { requested: Currency },
    /// The fetch failed; the previous table stays in use.
    Failed(RateError),
}

/// Holds the last known rate table.
///
/// Readers take an `Arc` snapshot; a successful fetch builds a new table and
/// swaps the reference, so nobody sees a half-updated table. Only the
/// response to the most recent request is applied.
pub struct RateBook {
    current: RwLock<Arc<RateTable>>,
    quotes: RwLock<Arc<Quotes>>,
    latest: Mutex<Option<RateRequest>>,
    next_ticket: AtomicU64,
}

impl RateBook {
    pub fn new(table: RateTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
            quotes: RwLock::new(Arc::new(Quotes::new())),
            latest: Mutex::new(None),
            next_ticket: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> Arc<RateTable> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Raw quotes from the last applied fetch. Empty until one succeeds.
    pub fn quotes(&self) -> Arc<Quotes> {
        self.quotes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Registers a new request for `currency`, superseding any older one.
    pub fn begin(&self, currency: Currency) -> RateRequest {
        let request = RateRequest {
            ticket: self.next_ticket.fetch_add(1, Ordering::SeqCst),
            currency,
        };
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(request);
        debug!(?request, "Rate request started");
        request
    }

    /// Applies the response for `request` unless a newer request exists.
    pub fn complete(
        &self,
        request: RateRequest,
        result: Result<Quotes, RateError>,
    ) -> RefreshOutcome {
        // Held until the swap so a newer request cannot slip in between.
        let latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        if *latest != Some(request) {
            debug!(?request, latest = ?*latest, "Discarding stale rate response");
            return RefreshOutcome::Superseded {
                requested: request.currency,
            };
        }

        match result {
            Ok(quotes) => {
                let table = Arc::new(self.snapshot().with_quotes(&quotes));
                *self.current.write().unwrap_or_else(PoisonError::into_inner) =
                    Arc::clone(&table);
                *self.quotes.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(quotes);
                info!("Exchange rates updated for {}", request.currency);
                RefreshOutcome::Updated(table)
            }
            Err(e) => {
                warn!("Error while getting exchange rates: {}", e);
                RefreshOutcome::Failed(e)
            }
        }
    }

    /// Fetches quotes relative to the base currency on behalf of `currency`.
    pub async fn refresh(
        &self,
        provider: &(dyn ExchangeRateProvider + Send + Sync),
        currency: Currency,
    ) -> RefreshOutcome {
        let request = self.begin(currency);
        let result = provider.latest(Currency::BASE).await;
        self.complete(request, result)
    }
}

impl Default for RateBook {
    fn default() -> Self {
        Self::new(RateTable::fallback())
    }
}
