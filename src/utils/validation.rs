use crate::utils::error::{ConverterError, Result};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Optional sign, then `digits[.digits*]` or `.digits+`. No exponent, no grouping.
static AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)$").expect("amount pattern compiles")
});

static CURRENCY_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{3}$").expect("currency code pattern compiles"));

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Whether `value` (already trimmed) is a decimal literal the converter accepts.
pub fn is_valid_amount(value: &str) -> bool {
    AMOUNT_PATTERN.is_match(value)
}

/// Parse an amount that passed [`is_valid_amount`].
pub fn parse_amount(value: &str) -> Result<f64> {
    if !is_valid_amount(value) {
        return Err(ConverterError::InvalidAmount {
            raw: value.to_string(),
        });
    }
    value.parse::<f64>().map_err(|_| ConverterError::InvalidAmount {
        raw: value.to_string(),
    })
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ConverterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ConverterError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ConverterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_currency_code(field_name: &str, code: &str) -> Result<()> {
    if !CURRENCY_CODE_PATTERN.is_match(code) {
        return Err(ConverterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: code.to_string(),
            reason: "Currency code must be three letters".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ConverterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_amounts() {
        for value in ["100", "0", "+5", "-5", "20.5", "20.", ".5", "-.5", "007"] {
            assert!(is_valid_amount(value), "{value} should be accepted");
        }
    }

    #[test]
    fn test_invalid_amounts() {
        for value in ["20.0.0", "1e5", "1,000", "abc", "12a", "+-5", "--5", ".", "+", "", " 5"] {
            assert!(!is_valid_amount(value), "{value} should be rejected");
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("20.").unwrap(), 20.0);
        assert_eq!(parse_amount("-.5").unwrap(), -0.5);
        assert!(matches!(
            parse_amount("20.0.0"),
            Err(ConverterError::InvalidAmount { raw }) if raw == "20.0.0"
        ));
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("api.rates_url", "https://example.com").is_ok());
        assert!(validate_url("api.rates_url", "http://example.com").is_ok());
        assert!(validate_url("api.rates_url", "").is_err());
        assert!(validate_url("api.rates_url", "invalid-url").is_err());
        assert!(validate_url("api.rates_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_currency_code() {
        assert!(validate_currency_code("default_currency", "GBP").is_ok());
        assert!(validate_currency_code("default_currency", "GB").is_err());
        assert!(validate_currency_code("default_currency", "GB1").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("countdown_seconds", 600u32, 1, 3600).is_ok());
        assert!(validate_range("countdown_seconds", 0u32, 1, 3600).is_err());
    }
}
