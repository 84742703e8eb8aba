pub mod cancel;
pub mod converter;
pub mod countdown;
pub mod dropdown;
pub mod reducer;

pub use crate::domain::model::{ConverterState, Country, Currency, CurrencyRole};
pub use crate::domain::ports::{ConfigProvider, CurrencyApi};
pub use crate::utils::error::Result;
