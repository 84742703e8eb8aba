use crate::domain::ports::{ConfigProvider, CurrencyApi};
use crate::utils::error::{ConverterError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Placeholder for the base code inside a rates URL template.
pub const BASE_PLACEHOLDER: &str = "{base}";

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

/// `CurrencyApi` over two public JSON endpoints.
#[derive(Debug, Clone)]
pub struct HttpCurrencyApi {
    client: Client,
    currencies_url: String,
    rates_url: String,
}

impl HttpCurrencyApi {
    pub fn new(currencies_url: &str, rates_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            currencies_url: currencies_url.to_string(),
            rates_url: rates_url.to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(
            config.currencies_url(),
            config.rates_url(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    /// `rates_url` with `{base}` replaced, or with the code appended.
    pub fn rates_endpoint(&self, base: &str) -> String {
        if self.rates_url.contains(BASE_PLACEHOLDER) {
            self.rates_url.replace(BASE_PLACEHOLDER, base)
        } else {
            format!("{}{}", self.rates_url, base)
        }
    }

    async fn get(&self, url: &str) -> Result<Response> {
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(url).send().await?;
        tracing::debug!("API response status: {}", response.status());
        Ok(response)
    }
}

fn unexpected_status(response: &Response) -> ConverterError {
    ConverterError::HttpStatusError {
        status: response.status().as_u16(),
        url: response.url().to_string(),
    }
}

#[async_trait]
impl CurrencyApi for HttpCurrencyApi {
    async fn fetch_currencies(&self) -> Result<BTreeMap<String, String>> {
        let response = self.get(&self.currencies_url).await?;
        if !response.status().is_success() {
            return Err(unexpected_status(&response));
        }
        Ok(response.json().await?)
    }

    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, f64>> {
        let response = self.get(&self.rates_endpoint(base)).await?;
        match response.status() {
            status if status.is_success() => {
                let body: RatesResponse = response.json().await?;
                Ok(body.rates)
            }
            StatusCode::NOT_FOUND => Err(ConverterError::UnsupportedCurrency {
                code: base.to_string(),
            }),
            _ => Err(unexpected_status(&response)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn api(server: &MockServer) -> HttpCurrencyApi {
        HttpCurrencyApi::new(
            &server.url("/currencies.json"),
            &server.url("/latest/"),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_currencies() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/currencies.json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "USD": "United States Dollar",
                    "GBP": "British Pound Sterling"
                }));
        });

        let currencies = api(&server).fetch_currencies().await.unwrap();

        mock.assert();
        let codes: Vec<&String> = currencies.keys().collect();
        assert_eq!(codes, vec!["GBP", "USD"]);
    }

    #[tokio::test]
    async fn test_fetch_currencies_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/currencies.json");
            then.status(500);
        });

        let err = api(&server).fetch_currencies().await.unwrap_err();
        assert!(matches!(err, ConverterError::HttpStatusError { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_fetch_rates_appends_base() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/latest/GBP");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "base": "GBP",
                    "rates": {"USD": 1.25, "EUR": 1.17}
                }));
        });

        let rates = api(&server).fetch_rates("GBP").await.unwrap();

        mock.assert();
        assert_eq!(rates.get("USD"), Some(&1.25));
        assert_eq!(rates.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_rates_not_found_names_base() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/latest/XYZ");
            then.status(404);
        });

        let err = api(&server).fetch_rates("XYZ").await.unwrap_err();
        assert!(matches!(err, ConverterError::UnsupportedCurrency { ref code } if code == "XYZ"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_api_error() {
        let api = HttpCurrencyApi::new(
            "http://127.0.0.1:9/currencies.json",
            "http://127.0.0.1:9/latest/",
            Duration::from_secs(1),
        )
        .unwrap();

        let err = api.fetch_rates("GBP").await.unwrap_err();
        assert!(matches!(err, ConverterError::ApiError(_)));
    }

    #[test]
    fn test_rates_endpoint_template() {
        let api = HttpCurrencyApi::new(
            "https://example.com/currencies.json",
            "https://example.com/rates?base={base}",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(api.rates_endpoint("EUR"), "https://example.com/rates?base=EUR");
    }
}
