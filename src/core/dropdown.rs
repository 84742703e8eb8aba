use crate::core::reducer::Action;
use crate::domain::model::{ConverterState, Country, CurrencyRole};

pub const NO_RESULTS: &str = "No results. Please try different currency";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropdown {
    role: CurrencyRole,
    search: String,
    open: bool,
}

impl Dropdown {
    pub fn new(role: CurrencyRole) -> Self {
        Self {
            role,
            search: String::new(),
            open: false,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self, disabled: bool) {
        if !disabled {
            self.open = !self.open;
        }
    }

    pub fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
    }

    /// Entries whose code contains the search text, ignoring case.
    pub fn filtered<'a>(&self, countries: &'a [Country]) -> Vec<&'a Country> {
        let needle = self.search.to_lowercase();
        countries
            .iter()
            .filter(|c| c.code.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn selected<'a>(&self, state: &'a ConverterState) -> Option<&'a Country> {
        state.country(&state.currency(self.role).code)
    }

    /// Pick `country`: close the list, clear the search, and return the
    /// transition to dispatch.
    pub fn select(&mut self, country: &Country) -> Action {
        self.open = false;
        self.search.clear();
        Action::CurrencySelected {
            role: self.role,
            code: country.code.clone(),
        }
    }

    pub fn render_rows(&self, state: &ConverterState) -> Vec<String> {
        let current = &state.currency(self.role).code;
        let rows: Vec<String> = self
            .filtered(&state.countries)
            .into_iter()
            .map(|c| {
                let marker = if &c.code == current { '*' } else { ' ' };
                format!("{} {:<4} {:<40} {}", marker, c.code, c.name, c.flag_url)
            })
            .collect();
        if rows.is_empty() {
            vec![NO_RESULTS.to_string()]
        } else {
            rows
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reducer::reduce;
    use std::collections::BTreeMap;

    fn state() -> ConverterState {
        reduce(
            ConverterState::default(),
            Action::CountriesLoaded {
                countries: BTreeMap::from([
                    ("GBP".to_string(), "British Pound Sterling".to_string()),
                    ("USD".to_string(), "United States Dollar".to_string()),
                    ("UGX".to_string(), "Ugandan Shilling".to_string()),
                ]),
                default_code: "GBP".to_string(),
            },
        )
    }

    #[test]
    fn filters_by_code_case_insensitively() {
        let state = state();
        let mut dropdown = Dropdown::new(CurrencyRole::Base);
        dropdown.set_search("u");
        let codes: Vec<&str> = dropdown
            .filtered(&state.countries)
            .iter()
            .map(|c| c.code.as_str())
            .collect();
        assert_eq!(codes, vec!["UGX", "USD"]);
    }

    #[test]
    fn name_is_not_searched() {
        let state = state();
        let mut dropdown = Dropdown::new(CurrencyRole::Base);
        dropdown.set_search("pound");
        assert!(dropdown.filtered(&state.countries).is_empty());
        assert_eq!(dropdown.render_rows(&state), vec![NO_RESULTS.to_string()]);
    }

    #[test]
    fn select_closes_clears_and_tags_role() {
        let state = state();
        let mut dropdown = Dropdown::new(CurrencyRole::Target);
        dropdown.toggle(false);
        dropdown.set_search("us");
        assert!(dropdown.is_open());

        let usd = dropdown.filtered(&state.countries)[0].clone();
        let action = dropdown.select(&usd);

        assert!(!dropdown.is_open());
        assert_eq!(dropdown.search(), "");
        assert_eq!(
            action,
            Action::CurrencySelected {
                role: CurrencyRole::Target,
                code: "USD".to_string()
            }
        );
        let state = reduce(state, action);
        assert_eq!(dropdown.selected(&state).map(|c| c.code.as_str()), Some("USD"));
    }

    #[test]
    fn disabled_dropdown_stays_closed() {
        let mut dropdown = Dropdown::new(CurrencyRole::Base);
        dropdown.toggle(true);
        assert!(!dropdown.is_open());
    }

    #[test]
    fn rows_mark_the_selected_entry() {
        let state = state();
        let dropdown = Dropdown::new(CurrencyRole::Base);
        let rows = dropdown.render_rows(&state);
        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("* GBP"));
        assert!(rows[2].starts_with("  USD"));
    }
}
