use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};

/// Read-only access to the exchange-rate service.
#[async_trait]
pub trait CurrencyApi: Send + Sync {
    async fn fetch_currencies(&self) -> Result<BTreeMap<String, String>>;

    /// Multipliers from `base` to every target the service knows.
    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, f64>>;
}

pub trait ConfigProvider: Send + Sync {
    fn currencies_url(&self) -> &str;
    fn rates_url(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn default_currency(&self) -> &str;
    fn countdown_seconds(&self) -> u32;
}
