use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::utils::validation::is_valid_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurrencyRole {
    Base,
    Target,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Currency {
    pub code: String,
    pub amount: String,
    pub role: CurrencyRole,
}

impl Currency {
    pub fn empty(role: CurrencyRole) -> Self {
        Self {
            code: String::new(),
            amount: format_amount(0.0),
            role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub code: String,
    pub name: String,
    pub flag_url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountdownState {
    pub show: bool,
    pub expired: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConverterState {
    pub base_currency: Currency,
    pub target_currency: Currency,
    pub countries: Arc<Vec<Country>>,
    pub countdown: CountdownState,
}

impl Default for ConverterState {
    fn default() -> Self {
        Self {
            base_currency: Currency::empty(CurrencyRole::Base),
            target_currency: Currency::empty(CurrencyRole::Target),
            countries: Arc::default(),
            countdown: CountdownState::default(),
        }
    }
}

impl ConverterState {
    pub fn currency(&self, role: CurrencyRole) -> &Currency {
        match role {
            CurrencyRole::Base => &self.base_currency,
            CurrencyRole::Target => &self.target_currency,
        }
    }

    pub fn country(&self, code: &str) -> Option<&Country> {
        self.countries.iter().find(|c| c.code == code)
    }

    pub fn same_currency(&self) -> bool {
        self.base_currency.code == self.target_currency.code
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountInput {
    pub raw: String,
    pub valid: bool,
}

impl Default for AmountInput {
    fn default() -> Self {
        Self {
            raw: String::new(),
            valid: true,
        }
    }
}

impl AmountInput {
    /// Trim and revalidate. An empty field counts as valid but cannot be submitted.
    pub fn update(&mut self, value: &str) {
        self.raw = value.trim().to_string();
        self.valid = self.raw.is_empty() || is_valid_amount(&self.raw);
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn message(&self) -> Option<String> {
        (!self.valid).then(|| format!("{} is not a valid number", self.raw))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub base_code: String,
    pub base_amount: String,
    pub target_code: String,
    pub target_amount: String,
    pub rate: f64,
    pub converted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Conversion {
    pub fn summary(&self) -> String {
        format!(
            "{} {} is equivalent to {} {}",
            self.base_amount, self.base_code, self.target_amount, self.target_code
        )
    }
}

pub fn format_amount(amount: f64) -> String {
    // -0.0 prints as "-0.00"
    let amount = if amount == 0.0 { 0.0 } else { amount };
    format!("{:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_input_trims_and_validates() {
        let mut input = AmountInput::default();
        input.update("  100 ");
        assert_eq!(input.raw, "100");
        assert!(input.valid);
        assert_eq!(input.message(), None);

        input.update("20.0.0");
        assert!(!input.valid);
        assert_eq!(input.message().as_deref(), Some("20.0.0 is not a valid number"));

        input.update("   ");
        assert!(input.valid);
        assert!(input.is_empty());
    }

    #[test]
    fn amounts_render_with_two_decimals() {
        assert_eq!(format_amount(125.0), "125.00");
        assert_eq!(format_amount(12.3456), "12.35");
        assert_eq!(Currency::empty(CurrencyRole::Base).amount, "0.00");
    }

    #[test]
    fn negative_zero_renders_unsigned() {
        assert_eq!(format_amount(-0.0), "0.00");
        assert_eq!(format_amount(-1.5), "-1.50");
    }

    #[test]
    fn receipt_serializes_with_rfc3339_timestamps() {
        let converted_at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let conversion = Conversion {
            base_code: "GBP".to_string(),
            base_amount: "100.00".to_string(),
            target_code: "USD".to_string(),
            target_amount: "125.00".to_string(),
            rate: 1.25,
            converted_at,
            expires_at: converted_at + chrono::TimeDelta::seconds(600),
        };

        let json = serde_json::to_value(&conversion).unwrap();
        assert_eq!(json["target_amount"], "125.00");
        assert_eq!(json["rate"], 1.25);
        assert_eq!(json["expires_at"], "2024-05-01T12:10:00Z");
    }
}
