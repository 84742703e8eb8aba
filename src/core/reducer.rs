use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::flags::flag_url;
use crate::domain::model::{format_amount, ConverterState, Country, CurrencyRole};
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Action {
    SetCountries {
        countries: BTreeMap<String, String>,
    },
    SetBaseCurrencyCode {
        code: String,
    },
    SetTargetCurrencyCode {
        code: String,
    },
    SetBaseCurrencyAmount {
        amount: f64,
    },
    SetTargetCurrencyAmount {
        amount: f64,
    },
    SwapCurrencies,
    SetCountdownShow {
        show: bool,
    },
    SetCountdownExpired {
        expired: bool,
    },
    ResetCountdown,

    CountriesLoaded {
        countries: BTreeMap<String, String>,
        default_code: String,
    },
    CurrencySelected {
        role: CurrencyRole,
        code: String,
    },
    ConversionCompleted {
        base_amount: f64,
        target_amount: f64,
    },
    CountdownElapsed,
    SwapRequested,
    AmountEdited,

    #[serde(other)]
    Unrecognized,
}

impl Action {
    pub fn set_code(role: CurrencyRole, code: impl Into<String>) -> Self {
        let code = code.into();
        match role {
            CurrencyRole::Base => Action::SetBaseCurrencyCode { code },
            CurrencyRole::Target => Action::SetTargetCurrencyCode { code },
        }
    }
}

pub fn reduce(mut state: ConverterState, action: Action) -> ConverterState {
    match action {
        Action::SetCountries { countries } => {
            state.countries = Arc::new(build_countries(&countries));
            state
        }
        Action::SetBaseCurrencyCode { code } if !code.is_empty() => {
            state.base_currency.code = code;
            state
        }
        Action::SetTargetCurrencyCode { code } if !code.is_empty() => {
            state.target_currency.code = code;
            state
        }
        Action::SetBaseCurrencyAmount { amount } if amount.is_finite() => {
            state.base_currency.amount = format_amount(amount);
            state
        }
        Action::SetTargetCurrencyAmount { amount } if amount.is_finite() => {
            state.target_currency.amount = format_amount(amount);
            state
        }
        Action::SwapCurrencies => {
            std::mem::swap(&mut state.base_currency.code, &mut state.target_currency.code);
            state
        }
        Action::SetCountdownShow { show } => {
            state.countdown.show = show;
            state
        }
        Action::SetCountdownExpired { expired } => {
            state.countdown.expired = expired;
            state
        }
        Action::ResetCountdown => {
            state.countdown.show = false;
            state.countdown.expired = false;
            state
        }

        Action::CountriesLoaded {
            countries,
            default_code,
        } => apply_all(
            state,
            [
                Action::SetCountries { countries },
                Action::SetBaseCurrencyCode {
                    code: default_code.clone(),
                },
                Action::SetTargetCurrencyCode { code: default_code },
            ],
        ),
        Action::CurrencySelected { role, code } => apply_all(
            state,
            [
                Action::set_code(role, code),
                Action::SetCountdownShow { show: false },
            ],
        ),
        Action::ConversionCompleted {
            base_amount,
            target_amount,
        } => apply_all(
            state,
            [
                Action::SetBaseCurrencyAmount {
                    amount: base_amount,
                },
                Action::SetTargetCurrencyAmount {
                    amount: target_amount,
                },
                Action::SetCountdownShow { show: true },
                Action::SetCountdownExpired { expired: false },
            ],
        ),
        Action::CountdownElapsed => apply_all(
            state,
            [
                Action::SetCountdownShow { show: false },
                Action::SetCountdownExpired { expired: true },
            ],
        ),
        Action::SwapRequested => {
            apply_all(state, [Action::SwapCurrencies, Action::ResetCountdown])
        }
        Action::AmountEdited => reduce(state, Action::SetCountdownShow { show: false }),

        // Failed preconditions and unknown types are no-ops.
        Action::SetBaseCurrencyCode { .. }
        | Action::SetTargetCurrencyCode { .. }
        | Action::SetBaseCurrencyAmount { .. }
        | Action::SetTargetCurrencyAmount { .. }
        | Action::Unrecognized => state,
    }
}

pub fn apply_all(state: ConverterState, actions: impl IntoIterator<Item = Action>) -> ConverterState {
    actions.into_iter().fold(state, reduce)
}

/// Apply a recorded JSON array of actions on top of `state`.
pub fn replay(state: ConverterState, log: &str) -> Result<ConverterState> {
    let actions: Vec<Action> = serde_json::from_str(log)?;
    tracing::debug!(count = actions.len(), "replaying action log");
    Ok(apply_all(state, actions))
}

fn build_countries(raw: &BTreeMap<String, String>) -> Vec<Country> {
    raw.iter()
        .map(|(code, name)| Country {
            code: code.clone(),
            name: name.clone(),
            flag_url: flag_url(code),
        })
        .collect()
}
