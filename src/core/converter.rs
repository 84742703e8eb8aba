//! Owns the reducer state and every piece of in-flight work. Spawned work
//! posts an [`Event`] back; [`Converter::pump`] applies them one at a time and
//! drops events whose generation is no longer tracked.

use chrono::{TimeDelta, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::core::cancel::{cancel_pair, CancelHandle};
use crate::core::countdown::{format_clock, spawn_countdown, CountdownHandle, Tick};
use crate::core::dropdown::Dropdown;
use crate::core::reducer::{reduce, Action};
use crate::domain::model::{AmountInput, Conversion, ConverterState, CurrencyRole};
use crate::domain::ports::{ConfigProvider, CurrencyApi};
use crate::utils::error::{ConverterError, Result};
use crate::utils::validation::parse_amount;

pub const DEFAULT_CURRENCY: &str = "GBP";
pub const COUNTDOWN_SECONDS: u32 = 10 * 60;
pub const CONVERT_CAPTION: &str = "Convert";
pub const PENDING_CAPTION: &str = "Please wait..";
pub const EXPIRED_NOTICE: &str = "Expired. Try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterSettings {
    pub default_currency: String,
    pub countdown_seconds: u32,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            default_currency: DEFAULT_CURRENCY.to_string(),
            countdown_seconds: COUNTDOWN_SECONDS,
        }
    }
}

impl ConverterSettings {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            default_currency: config.default_currency().to_uppercase(),
            countdown_seconds: config.countdown_seconds(),
        }
    }
}

#[derive(Debug)]
pub enum Event {
    CurrenciesFetched {
        generation: u64,
        result: Result<BTreeMap<String, String>>,
    },
    RatesFetched {
        generation: u64,
        result: Result<HashMap<String, f64>>,
    },
    Countdown {
        generation: u64,
        tick: Tick,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    CurrenciesLoaded { count: usize },
    Converted(Conversion),
    /// The rates request failed for a reason that is logged, not alerted.
    ConversionFailed,
    CountdownTick { remaining: u32, clock: String },
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submit {
    Started,
    AlreadyPending,
    /// Empty amount, or a result that is still fresh.
    Disabled,
}

#[derive(Debug)]
struct Loading {
    generation: u64,
    _cancel: CancelHandle,
}

#[derive(Debug)]
struct PendingConversion {
    generation: u64,
    base_code: String,
    target_code: String,
    amount: f64,
    _cancel: CancelHandle,
}

pub struct Converter<A: CurrencyApi + 'static> {
    api: Arc<A>,
    settings: ConverterSettings,
    state: ConverterState,
    amount: AmountInput,
    base_picker: Dropdown,
    target_picker: Dropdown,
    loading: Option<Loading>,
    pending: Option<PendingConversion>,
    countdown: Option<CountdownHandle>,
    next_generation: u64,
    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
}

impl<A: CurrencyApi + 'static> Converter<A> {
    pub fn new(api: Arc<A>, settings: ConverterSettings) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            settings,
            state: ConverterState::default(),
            amount: AmountInput::default(),
            base_picker: Dropdown::new(CurrencyRole::Base),
            target_picker: Dropdown::new(CurrencyRole::Target),
            loading: None,
            pending: None,
            countdown: None,
            next_generation: 0,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &ConverterState {
        &self.state
    }

    pub fn amount(&self) -> &AmountInput {
        &self.amount
    }

    pub fn settings(&self) -> &ConverterSettings {
        &self.settings
    }

    pub fn dropdown(&self, role: CurrencyRole) -> &Dropdown {
        match role {
            CurrencyRole::Base => &self.base_picker,
            CurrencyRole::Target => &self.target_picker,
        }
    }

    fn dropdown_mut(&mut self, role: CurrencyRole) -> &mut Dropdown {
        match role {
            CurrencyRole::Base => &mut self.base_picker,
            CurrencyRole::Target => &mut self.target_picker,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_idle(&self) -> bool {
        self.loading.is_none() && self.pending.is_none() && self.countdown.is_none()
    }

    pub fn dispatch(&mut self, action: Action) {
        tracing::debug!(?action, "dispatch");
        self.state = reduce(std::mem::take(&mut self.state), action);
        // A hidden countdown must not keep ticking.
        if !self.state.countdown.show {
            self.countdown = None;
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    /// Start loading the currency list. Does nothing if it is loaded or loading.
    pub fn mount(&mut self) {
        if self.loading.is_some() || !self.state.countries.is_empty() {
            return;
        }
        let generation = self.next_generation();
        let (cancel, signal) = cancel_pair();
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = signal.guard(api.fetch_currencies()).await.and_then(|r| r);
            if let Err(ConverterError::Cancelled) = result {
                tracing::debug!(generation, "currency list request cancelled");
            }
            let _ = tx.send(Event::CurrenciesFetched { generation, result });
        });
        tracing::debug!(generation, "loading currency list");
        self.loading = Some(Loading {
            generation,
            _cancel: cancel,
        });
    }

    pub fn unmount(&mut self) {
        self.loading = None;
        self.pending = None;
        self.countdown = None;
    }

    pub fn set_amount(&mut self, value: &str) -> bool {
        if self.is_pending() {
            return false;
        }
        self.amount.update(value);
        if let Some(message) = self.amount.message() {
            tracing::debug!("{}", message);
        }
        self.dispatch(Action::AmountEdited);
        true
    }

    pub fn toggle_dropdown(&mut self, role: CurrencyRole) {
        let disabled = self.is_pending();
        self.dropdown_mut(role).toggle(disabled);
    }

    pub fn search(&mut self, role: CurrencyRole, text: &str) {
        self.dropdown_mut(role).set_search(text);
    }

    pub fn select(&mut self, role: CurrencyRole, code: &str) -> Result<bool> {
        if self.is_pending() {
            return Ok(false);
        }
        let country = self
            .state
            .country(code)
            .cloned()
            .ok_or_else(|| ConverterError::UnsupportedCurrency {
                code: code.to_string(),
            })?;
        let action = self.dropdown_mut(role).select(&country);
        self.dispatch(action);
        Ok(true)
    }

    /// Exchange base and target codes. Amounts stay until the next conversion.
    pub fn swap(&mut self) -> bool {
        if self.is_pending() {
            return false;
        }
        self.dispatch(Action::SwapRequested);
        true
    }

    pub fn submit_enabled(&self) -> bool {
        self.amount.valid
            && !self.amount.is_empty()
            && !self.is_pending()
            && !self.state.countdown.show
            && !self.state.same_currency()
    }

    pub fn submit_caption(&self) -> &'static str {
        if self.is_pending() {
            PENDING_CAPTION
        } else {
            CONVERT_CAPTION
        }
    }

    pub fn summary(&self) -> Option<String> {
        self.state.countdown.show.then(|| {
            format!(
                "{} {} is equivalent to {} {}",
                self.state.base_currency.amount,
                self.state.base_currency.code,
                self.state.target_currency.amount,
                self.state.target_currency.code
            )
        })
    }

    pub fn expired_notice(&self) -> Option<&'static str> {
        self.state.countdown.expired.then_some(EXPIRED_NOTICE)
    }

    pub fn submit(&mut self) -> Result<Submit> {
        if self.state.same_currency() {
            tracing::warn!(code = %self.state.base_currency.code, "base and target currencies are equal");
            return Err(ConverterError::SameCurrency {
                code: self.state.base_currency.code.clone(),
            });
        }
        if self.is_pending() {
            return Ok(Submit::AlreadyPending);
        }
        if !self.amount.valid {
            return Err(ConverterError::InvalidAmount {
                raw: self.amount.raw.clone(),
            });
        }
        if self.amount.is_empty() || self.state.countdown.show {
            return Ok(Submit::Disabled);
        }

        let amount = parse_amount(&self.amount.raw)?;
        let base_code = self.state.base_currency.code.clone();
        let target_code = self.state.target_currency.code.clone();
        let generation = self.next_generation();
        let (cancel, signal) = cancel_pair();
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let base = base_code.clone();
        tokio::spawn(async move {
            let result = signal.guard(api.fetch_rates(&base)).await.and_then(|r| r);
            if let Err(ConverterError::Cancelled) = result {
                tracing::debug!(generation, "rates request cancelled");
            }
            let _ = tx.send(Event::RatesFetched { generation, result });
        });

        tracing::info!(%base_code, %target_code, amount, "converting");
        self.pending = Some(PendingConversion {
            generation,
            base_code,
            target_code,
            amount,
            _cancel: cancel,
        });
        Ok(Submit::Started)
    }

    /// Wait for the next completion and apply it.
    pub async fn pump(&mut self) -> Option<Result<Update>> {
        loop {
            if self.is_idle() {
                return None;
            }
            let event = self.rx.recv().await?;
            if let Some(update) = self.apply(event) {
                return Some(update);
            }
        }
    }

    fn apply(&mut self, event: Event) -> Option<Result<Update>> {
        match event {
            Event::CurrenciesFetched { generation, result } => {
                if self.loading.as_ref().map(|l| l.generation) != Some(generation) {
                    return None;
                }
                self.loading = None;
                Some(self.on_currencies(result))
            }
            Event::RatesFetched { generation, result } => {
                if self.pending.as_ref().map(|p| p.generation) != Some(generation) {
                    return None;
                }
                let request = self.pending.take()?;
                Some(self.on_rates(request, result))
            }
            Event::Countdown { generation, tick } => {
                if self.countdown.as_ref().map(|c| c.generation()) != Some(generation) {
                    return None;
                }
                self.on_tick(tick)
            }
        }
    }

    fn on_currencies(&mut self, result: Result<BTreeMap<String, String>>) -> Result<Update> {
        match result {
            Ok(countries) => {
                let count = countries.len();
                self.dispatch(Action::CountriesLoaded {
                    countries,
                    default_code: self.settings.default_currency.clone(),
                });
                tracing::info!(count, "currency list loaded");
                Ok(Update::CurrenciesLoaded { count })
            }
            Err(e) => {
                tracing::error!("currency list request failed: {}", e);
                Err(ConverterError::CurrencyListUnavailable {
                    message: e.to_string(),
                })
            }
        }
    }

    fn on_rates(
        &mut self,
        request: PendingConversion,
        result: Result<HashMap<String, f64>>,
    ) -> Result<Update> {
        let rates = match result {
            Ok(rates) => rates,
            Err(e @ ConverterError::UnsupportedCurrency { .. }) => {
                tracing::warn!(base_code = %request.base_code, "base currency not supported");
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(base_code = %request.base_code, "rates request failed: {}", e);
                return Ok(Update::ConversionFailed);
            }
        };

        let Some(rate) = rates.get(&request.target_code).copied().filter(|r| r.is_finite()) else {
            tracing::warn!(target_code = %request.target_code, "target currency not supported");
            return Err(ConverterError::UnsupportedCurrency {
                code: request.target_code,
            });
        };

        let target_amount = request.amount * rate;
        self.dispatch(Action::ConversionCompleted {
            base_amount: request.amount,
            target_amount,
        });
        self.start_countdown();

        let converted_at = Utc::now();
        let conversion = Conversion {
            base_code: request.base_code,
            base_amount: self.state.base_currency.amount.clone(),
            target_code: request.target_code,
            target_amount: self.state.target_currency.amount.clone(),
            rate,
            converted_at,
            expires_at: converted_at + TimeDelta::seconds(i64::from(self.settings.countdown_seconds)),
        };
        tracing::info!("{}", conversion.summary());
        Ok(Update::Converted(conversion))
    }

    fn start_countdown(&mut self) {
        let generation = self.next_generation();
        let tx = self.tx.clone();
        self.countdown = Some(spawn_countdown(
            self.settings.countdown_seconds,
            generation,
            move |tick| tx.send(Event::Countdown { generation, tick }).is_ok(),
        ));
    }

    fn on_tick(&mut self, tick: Tick) -> Option<Result<Update>> {
        match tick {
            Tick::Running(remaining) => Some(Ok(Update::CountdownTick {
                remaining,
                clock: format_clock(remaining),
            })),
            Tick::Expired => {
                self.dispatch(Action::CountdownElapsed);
                tracing::info!("conversion expired");
                Some(Ok(Update::Expired))
            }
            Tick::Finished => None,
        }
    }
}
