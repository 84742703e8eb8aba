pub mod toml_config;

pub const DEFAULT_CURRENCIES_URL: &str = "https://openexchangerates.org/api/currencies.json";
pub const DEFAULT_RATES_URL: &str = "https://api.exchangerate-api.com/v4/latest/";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Checks shared by every configuration source.
pub fn validate_provider<C: crate::core::ConfigProvider + ?Sized>(
    config: &C,
) -> crate::utils::error::Result<()> {
    use crate::utils::validation::{validate_currency_code, validate_range, validate_url};

    validate_url("currencies_url", config.currencies_url())?;
    validate_url("rates_url", config.rates_url())?;
    validate_currency_code("default_currency", config.default_currency())?;
    validate_range("countdown_seconds", config.countdown_seconds(), 1, 3600)?;
    validate_range("timeout_seconds", config.timeout_seconds(), 1, 300)?;
    Ok(())
}

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use super::{DEFAULT_CURRENCIES_URL, DEFAULT_RATES_URL};
    use crate::core::converter::{COUNTDOWN_SECONDS, DEFAULT_CURRENCY};
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::Validate;
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "fx-convert")]
    #[command(about = "Convert an amount between two currencies at the current rate")]
    pub struct CliConfig {
        #[arg(long, help = "Amount in the base currency, e.g. 100")]
        pub amount: Option<String>,

        #[arg(long, help = "Base currency code")]
        pub from: Option<String>,

        #[arg(long, help = "Target currency code")]
        pub to: Option<String>,

        #[arg(long, help = "Swap base and target before converting")]
        pub swap: bool,

        #[arg(long, help = "List supported currencies instead of converting")]
        pub list: bool,

        #[arg(long, help = "Filter the currency list by code")]
        pub search: Option<String>,

        #[arg(long, help = "Keep running and show the countdown until the result expires")]
        pub watch: bool,

        #[arg(long, help = "Load endpoints and converter settings from a TOML file")]
        pub config: Option<String>,

        #[arg(long, default_value = DEFAULT_CURRENCIES_URL)]
        pub currencies_url: String,

        #[arg(long, default_value = DEFAULT_RATES_URL)]
        pub rates_url: String,

        #[arg(long, default_value_t = super::DEFAULT_TIMEOUT_SECONDS)]
        pub timeout_seconds: u64,

        #[arg(long, default_value = DEFAULT_CURRENCY)]
        pub default_currency: String,

        #[arg(long, default_value_t = COUNTDOWN_SECONDS)]
        pub countdown_seconds: u32,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub log_json: bool,
    }

    impl ConfigProvider for CliConfig {
        fn currencies_url(&self) -> &str {
            &self.currencies_url
        }

        fn rates_url(&self) -> &str {
            &self.rates_url
        }

        fn timeout_seconds(&self) -> u64 {
            self.timeout_seconds
        }

        fn default_currency(&self) -> &str {
            &self.default_currency
        }

        fn countdown_seconds(&self) -> u32 {
            self.countdown_seconds
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            super::validate_provider(self)
        }
    }

}
