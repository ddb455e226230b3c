//! # Bank-Account Currency Priorities
//!
//! Parses the configured currency-priority specification and resolves the
//! transfer-method currency for a seller's country. The specification is a
//! semicolon-separated list of segments: a segment without a colon is the
//! global priority list, a segment of the form `COUNTRY:CUR1,CUR2` is the
//! priority list for that country (keyed by the uppercase country code).
//!
//! `"GB,CAD;US:USD;CA:CAD,USD"` ⇒ global `[GB, CAD]`, per-country
//! `{US: [USD], CA: [CAD, USD]}`. `"USD"` ⇒ global `[USD]`, no per-country
//! entries.

use std::collections::HashMap;

/// Parsed currency-priority configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyPriorityConfig {
    global: Vec<String>,
    per_country: HashMap<String, Vec<String>>,
}

impl CurrencyPriorityConfig {
    /// Parse the raw specification. Empty segments and empty currency
    /// entries are ignored.
    pub fn parse(spec: &str) -> Self {
        let mut global = Vec::new();
        let mut per_country: HashMap<String, Vec<String>> = HashMap::new();

        for segment in spec.split(';') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            match segment.split_once(':') {
                Some((country, currencies)) => {
                    per_country
                        .insert(country.trim().to_uppercase(), parse_currency_list(currencies));
                }
                None => global.extend(parse_currency_list(segment)),
            }
        }

        Self { global, per_country }
    }

    pub fn global_priority(&self) -> &[String] {
        &self.global
    }

    pub fn country_priority(&self, country: &str) -> Option<&[String]> {
        self.per_country
            .get(&country.to_uppercase())
            .map(Vec::as_slice)
    }

    /// Pick the transfer-method currency for `country` among `candidates`:
    /// first match in the country's priority list, then in the global list,
    /// then the first candidate.
    pub fn resolve(&self, country: &str, candidates: &[String]) -> Option<String> {
        if let Some(priorities) = self.country_priority(country) {
            if let Some(hit) = priorities.iter().find(|c| candidates.contains(c)) {
                return Some(hit.clone());
            }
        }
        if let Some(hit) = self.global.iter().find(|c| candidates.contains(c)) {
            return Some(hit.clone());
        }
        candidates.first().cloned()
    }
}

fn parse_currency_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|currency| !currency.is_empty())
        .map(str::to_string)
        .collect()
}
