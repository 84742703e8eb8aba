pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::http::HttpCurrencyApi;
pub use crate::config::toml_config::TomlConfig;
pub use crate::core::converter::{Converter, ConverterSettings, Submit, Update};
pub use crate::core::reducer::{reduce, replay, Action};
pub use crate::domain::model::{Conversion, ConverterState, CurrencyRole};
pub use crate::utils::error::{ConverterError, Result};
