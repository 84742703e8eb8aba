use thiserror::Error;

pub const CURRENCY_NOT_SUPPORTED: &str = "This currency is not supported yet";

#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("{code} -> {}", CURRENCY_NOT_SUPPORTED)]
    UnsupportedCurrency { code: String },

    #[error("Base and target currencies must differ ({code})")]
    SameCurrency { code: String },

    #[error("{raw} is not a valid number")]
    InvalidAmount { raw: String },

    #[error("Currency list could not be loaded: {message}")]
    CurrencyListUnavailable { message: String },

    #[error("Request was cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Currency,
    Input,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ConverterError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::HttpStatusError { .. } | Self::CurrencyListUnavailable { .. } => {
                ErrorCategory::Network
            }
            Self::UnsupportedCurrency { .. } | Self::SameCurrency { .. } => ErrorCategory::Currency,
            Self::InvalidAmount { .. } => ErrorCategory::Input,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::Cancelled | Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Cancelled => ErrorSeverity::Low,
            Self::ApiError(_) | Self::HttpStatusError { .. } => ErrorSeverity::Medium,
            Self::UnsupportedCurrency { .. }
            | Self::SameCurrency { .. }
            | Self::InvalidAmount { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::High,
            Self::CurrencyListUnavailable { .. } | Self::IoError(_) | Self::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    /// The text shown to the person at the keyboard, the CLI's `alert`.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(_) | Self::HttpStatusError { .. } => {
                "The exchange-rate service could not be reached".to_string()
            }
            Self::CurrencyListUnavailable { .. } => {
                "Supported currencies could not be loaded".to_string()
            }
            Self::SameCurrency { .. } => "Base and target currencies must differ".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your connection and submit again",
            ErrorCategory::Currency => "Pick a different currency pair",
            ErrorCategory::Input => "Enter a plain decimal number such as 100 or 12.50",
            ErrorCategory::Configuration => "Fix the configuration value and run again",
            ErrorCategory::System => "Run again with --verbose for details",
        }
    }
}

pub type Result<T> = std::result::Result<T, ConverterError>;
