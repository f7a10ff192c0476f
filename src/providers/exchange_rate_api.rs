use crate::core::currency::{Currency, Quotes};
use crate::core::rates::{ExchangeRateProvider, RateError};
use crate::providers::util::with_retry;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

const DEFAULT_RETRIES: usize = 2;
const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Client for the exchangerate-api.com `latest` endpoint.
pub struct ExchangeRateApiProvider {
    base_url: String,
    client: reqwest::Client,
    retries: usize,
    retry_delay_ms: u64,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("subcost/1.0")
            .build()?;
        Ok(ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            retries: DEFAULT_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        })
    }

    /// Overrides how often transport errors are retried.
    pub fn with_retries(mut self, retries: usize, delay_ms: u64) -> Self {
        self.retries = retries;
        self.retry_delay_ms = delay_ms;
        self
    }
}

#[derive(Deserialize, Debug)]
struct LatestRatesResponse {
    base: Option<String>,
    rates: Option<Quotes>,
}

#[async_trait]
impl ExchangeRateProvider for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self), fields(base = %base))]
    async fn latest(&self, base: Currency) -> Result<Quotes, RateError> {
        let url = format!("{}/latest/{}", self.base_url, base.code());
        debug!("Requesting exchange rates from {}", url);

        let response = with_retry(
            || self.client.get(&url).send(),
            self.retries,
            self.retry_delay_ms,
        )
        .await?;

        if !response.status().is_success() {
            return Err(RateError::Status(response.status().as_u16()));
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| RateError::Malformed(format!("Failed to parse JSON response: {e}")))?;

        if let Some(returned) = data.base.as_deref() {
            if !returned.eq_ignore_ascii_case(base.code()) {
                return Err(RateError::Malformed(format!(
                    "Expected rates for {}, got {}",
                    base, returned
                )));
            }
        }

        let rates = data
            .rates
            .ok_or_else(|| RateError::Malformed("Response has no rates".to_string()))?;
        debug!("Received {} quotes", rates.len());
        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(status: u16, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/latest/USD"))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn provider(base_url: &str) -> ExchangeRateApiProvider {
        ExchangeRateApiProvider::new(base_url)
            .unwrap()
            .with_retries(0, 0)
    }

    #[tokio::test]
    async fn test_successful_rates_fetch() {
        let mock_response = r#"{
            "base": "USD",
            "date": "2024-05-01",
            "time_last_updated": 1714521601,
            "rates": {"USD": 1, "EUR": 0.93, "UAH": 39.6, "GBP": 0.8}
        }"#;
        let mock_server = create_mock_server(200, mock_response).await;

        let quotes = provider(&mock_server.uri())
            .latest(Currency::Usd)
            .await
            .unwrap();
        assert_eq!(quotes.len(), 4);
        assert_eq!(quotes.get("EUR"), Some(&0.93));
        assert_eq!(quotes.get("UAH"), Some(&39.6));
    }

    #[tokio::test]
    async fn test_http_error_is_reported() {
        let mock_server = create_mock_server(503, "Service Unavailable").await;

        let result = provider(&mock_server.uri()).latest(Currency::Usd).await;
        assert_eq!(result, Err(RateError::Status(503)));
    }

    #[tokio::test]
    async fn test_invalid_json_is_malformed() {
        let mock_server = create_mock_server(200, "invalid json").await;

        let result = provider(&mock_server.uri()).latest(Currency::Usd).await;
        assert!(matches!(result, Err(RateError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_missing_rates_is_malformed() {
        let mock_server = create_mock_server(200, r#"{"base": "USD"}"#).await;

        let result = provider(&mock_server.uri()).latest(Currency::Usd).await;
        assert_eq!(
            result,
            Err(RateError::Malformed("Response has no rates".to_string()))
        );
    }

    #[tokio::test]
    async fn test_wrong_base_is_malformed() {
        let mock_server =
            create_mock_server(200, r#"{"base": "EUR", "rates": {"EUR": 1}}"#).await;

        let result = provider(&mock_server.uri()).latest(Currency::Usd).await;
        assert!(matches!(result, Err(RateError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let mock_server = MockServer::start().await;
        let uri = mock_server.uri();
        drop(mock_server);

        let result = provider(&uri).latest(Currency::Usd).await;
        assert!(matches!(result, Err(RateError::Network(_))));
    }
}
