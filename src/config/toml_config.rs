use crate::config::{DEFAULT_CURRENCIES_URL, DEFAULT_RATES_URL, DEFAULT_TIMEOUT_SECONDS};
use crate::core::converter::{COUNTDOWN_SECONDS, DEFAULT_CURRENCY};
use crate::core::ConfigProvider;
use crate::utils::error::{ConverterError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern compiles"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_currencies_url")]
    pub currencies_url: String,
    #[serde(default = "default_rates_url")]
    pub rates_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    #[serde(default = "default_currency")]
    pub default_currency: String,
    #[serde(default = "default_countdown_seconds")]
    pub countdown_seconds: u32,
}

fn default_currencies_url() -> String {
    DEFAULT_CURRENCIES_URL.to_string()
}

fn default_rates_url() -> String {
    DEFAULT_RATES_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_countdown_seconds() -> u32 {
    COUNTDOWN_SECONDS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            currencies_url: default_currencies_url(),
            rates_url: default_rates_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
            countdown_seconds: default_countdown_seconds(),
        }
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ConverterError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ConverterError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut missing = None;
        let processed = ENV_VAR_PATTERN.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            })
        });

        match missing {
            Some(field) => Err(ConverterError::MissingConfigError { field }),
            None => Ok(processed.into_owned()),
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn currencies_url(&self) -> &str {
        &self.api.currencies_url
    }

    fn rates_url(&self) -> &str {
        &self.api.rates_url
    }

    fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds
    }

    fn default_currency(&self) -> &str {
        &self.converter.default_currency
    }

    fn countdown_seconds(&self) -> u32 {
        self.converter.countdown_seconds
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        crate::config::validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[api]
currencies_url = "https://api.example.com/currencies.json"
rates_url = "https://api.example.com/latest/{base}"
timeout_seconds = 3

[converter]
default_currency = "USD"
countdown_seconds = 30
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.currencies_url(), "https://api.example.com/currencies.json");
        assert_eq!(config.rates_url(), "https://api.example.com/latest/{base}");
        assert_eq!(config.timeout_seconds(), 3);
        assert_eq!(config.default_currency(), "USD");
        assert_eq!(config.countdown_seconds(), 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.rates_url(), DEFAULT_RATES_URL);
        assert_eq!(config.default_currency(), "GBP");
        assert_eq!(config.countdown_seconds(), 600);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FX_TEST_RATES_HOST", "https://rates.test");

        let toml_content = r#"
[api]
rates_url = "${FX_TEST_RATES_HOST}/latest/"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.rates_url(), "https://rates.test/latest/");

        std::env::remove_var("FX_TEST_RATES_HOST");
    }

    #[test]
    fn test_unset_env_var_is_reported() {
        std::env::remove_var("FX_TEST_UNSET_HOST");

        let toml_content = r#"
[api]
currencies_url = "${FX_TEST_UNSET_HOST}/currencies.json"
"#;

        let err = TomlConfig::from_toml_str(toml_content).unwrap_err();
        assert!(matches!(err, ConverterError::MissingConfigError { ref field } if field == "FX_TEST_UNSET_HOST"));
        assert_eq!(
            err.to_string(),
            "Missing required configuration: FX_TEST_UNSET_HOST"
        );
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[api]
currencies_url = "invalid-url"

[converter]
default_currency = "POUND"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml() {
        let err = TomlConfig::from_toml_str("[api\nrates_url = 1").unwrap_err();
        assert!(matches!(err, ConverterError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[converter]\ncountdown_seconds = 5\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.countdown_seconds(), 5);
    }
}
