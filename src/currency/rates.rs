use serde::{Deserialize, Serialize};

use super::CurrencyCode;
use crate::errors::CurrencyError;

/// Riel per US dollar used when no rate is configured.
pub const DEFAULT_KHR_PER_USD: f64 = 4000.0;

/// A fixed conversion between two currencies, usable in both directions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixedRate {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub rate: f64,
}

impl FixedRate {
    pub fn new(from: impl Into<String>, to: impl Into<String>, rate: f64) -> Self {
        Self {
            from: CurrencyCode::new(from),
            to: CurrencyCode::new(to),
            rate,
        }
    }

    fn apply(&self, amount: f64, from: &CurrencyCode, to: &CurrencyCode) -> Option<f64> {
        if &self.from == from && &self.to == to {
            Some(amount * self.rate)
        } else if &self.from == to && &self.to == from {
            if self.rate.abs() < f64::EPSILON {
                Some(0.0)
            } else {
                Some(amount / self.rate)
            }
        } else {
            None
        }
    }
}

/// Hard-wired rates used to bring amounts into a single base currency.
///
/// Only identity and the pairs held here convert. Anything else is
/// [`CurrencyError::UnsupportedConversion`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExchangeRates {
    rates: Vec<FixedRate>,
}

impl ExchangeRates {
    /// Table holding only the USD/KHR pair at `khr_per_usd`.
    pub fn usd_khr(khr_per_usd: f64) -> Self {
        Self {
            rates: vec![FixedRate::new("USD", "KHR", khr_per_usd)],
        }
    }

    pub fn rates(&self) -> &[FixedRate] {
        &self.rates
    }

    pub fn convert(
        &self,
        amount: f64,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<f64, CurrencyError> {
        if from == to {
            return Ok(amount);
        }
        self.rates
            .iter()
            .find_map(|rate| rate.apply(amount, from, to))
            .ok_or_else(|| CurrencyError::UnsupportedConversion {
                from: from.as_str().to_string(),
                to: to.as_str().to_string(),
            })
    }
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self::usd_khr(DEFAULT_KHR_PER_USD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(raw: &str) -> CurrencyCode {
        CurrencyCode::new(raw)
    }

    #[test]
    fn converts_both_directions() {
        let rates = ExchangeRates::default();
        assert_eq!(rates.convert(2.0, &code("USD"), &code("KHR")), Ok(8000.0));
        assert_eq!(rates.convert(4000.0, &code("KHR"), &code("USD")), Ok(1.0));
    }

    #[test]
    fn identity_needs_no_rate() {
        let rates = ExchangeRates::usd_khr(1.0);
        assert_eq!(rates.convert(7.5, &code("EUR"), &code("eur")), Ok(7.5));
    }

    #[test]
    fn unknown_pair_is_unsupported() {
        let err = ExchangeRates::default()
            .convert(10.0, &code("EUR"), &code("USD"))
            .unwrap_err();
        assert_eq!(
            err,
            CurrencyError::UnsupportedConversion {
                from: "EUR".into(),
                to: "USD".into(),
            }
        );
    }

    #[test]
    fn empty_code_never_converts() {
        let rates = ExchangeRates::default();
        assert!(rates
            .convert(10.0, &CurrencyCode::new(""), &code("USD"))
            .is_err());
    }
}
