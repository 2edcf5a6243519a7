pub mod parser;
pub mod rates;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::CurrencyError;

pub use parser::{parse_monetary, parse_with_currency};
pub use rates::{ExchangeRates, FixedRate, DEFAULT_KHR_PER_USD};

/// Base currency used by [`get_grand_total_usd`].
pub const DEFAULT_BASE_CURRENCY: &str = "USD";

const DISPLAY_PRECISION: u32 = 2;
const ZERO_AMOUNT: &str = "0.00";

/// Upper-cased currency token such as `USD` or `KHR`. May be empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_CURRENCY)
    }
}

/// An amount paired with the currency code it was written with.
#[derive(Debug, Clone, PartialEq)]
pub struct MonetaryValue {
    pub amount: f64,
    pub currency: String,
}

impl MonetaryValue {
    pub fn code(&self) -> CurrencyCode {
        CurrencyCode::new(self.currency.as_str())
    }
}

/// Rendered text plus whatever made it fall back to a zero amount.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub text: String,
    pub issues: Vec<CurrencyError>,
}

impl Rendered {
    fn clean(text: String) -> Self {
        Self {
            text,
            issues: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Rounds `magnitude` to cents, halves away from zero, on its shortest
/// decimal form so `2.675` becomes `2.68` and not `2.67`.
fn round_to_cents(magnitude: f64) -> String {
    match magnitude.to_string().parse::<Decimal>() {
        Ok(decimal) => {
            let mut rounded = decimal.round_dp_with_strategy(
                DISPLAY_PRECISION,
                RoundingStrategy::MidpointAwayFromZero,
            );
            rounded.rescale(DISPLAY_PRECISION);
            rounded.to_string()
        }
        // Huge or vanishingly small magnitudes fall outside Decimal's range.
        Err(_) => format!("{:.*}", DISPLAY_PRECISION as usize, magnitude),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx != 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Renders `value` as `1,234.50`. Non-finite values render as `0.00`.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return ZERO_AMOUNT.to_string();
    }
    let cents = round_to_cents(value.abs());
    let (whole, fraction) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{}{}.{}", sign, group_thousands(whole), fraction)
}

fn with_code(number: String, code: &str) -> String {
    format!("{} {}", number, code).trim().to_string()
}

/// Reformats a loose monetary string, reporting why it fell back to zero.
pub fn render_currency_string(raw: &str) -> Rendered {
    match parse_monetary(raw) {
        Ok(value) => Rendered::clean(with_code(format_amount(value.amount), &value.currency)),
        Err(err) => {
            let text = match &err {
                CurrencyError::InvalidNumber { currency, .. } => {
                    with_code(ZERO_AMOUNT.to_string(), currency)
                }
                _ => ZERO_AMOUNT.to_string(),
            };
            debug!(input = raw, error = %err, "currency string rendered as zero");
            Rendered {
                text,
                issues: vec![err],
            }
        }
    }
}

/// Reformats `"1234.5 USD"` as `"1,234.50 USD"`. Never fails: unparseable
/// input renders as `"0.00"`.
pub fn format_currency_string(raw: &str) -> String {
    render_currency_string(raw).text
}

/// Formats an amount as it comes out of stored report JSON.
///
/// `null`, `false` and non-scalar values render as `"0.00"`.
pub fn format_currency_json(value: &Value) -> String {
    match value {
        Value::String(raw) => format_currency_string(raw),
        Value::Number(number) => number
            .as_f64()
            .map(format_amount)
            .unwrap_or_else(|| ZERO_AMOUNT.to_string()),
        _ => ZERO_AMOUNT.to_string(),
    }
}

fn contribution(
    raw: &str,
    base: &CurrencyCode,
    rates: &ExchangeRates,
) -> Result<f64, CurrencyError> {
    let value = parse_with_currency(raw)?;
    rates.convert(value.amount, &value.code(), base)
}

/// Sums two monetary strings in `base`, reporting every dropped contribution.
pub fn render_grand_total(
    value1: &str,
    value2: &str,
    base: &str,
    rates: &ExchangeRates,
) -> Rendered {
    let base = CurrencyCode::new(base);
    let mut issues = Vec::new();
    let mut total = 0.0;
    for raw in [value1, value2] {
        match contribution(raw, &base, rates) {
            Ok(amount) => total += amount,
            Err(err) => {
                debug!(input = raw, base = base.as_str(), error = %err, "value dropped from total");
                issues.push(err);
            }
        }
    }
    if !total.is_finite() {
        issues.push(CurrencyError::NonFiniteTotal);
        total = 0.0;
    }
    Rendered {
        text: format!("{} {}", format_amount(total), base.as_str()),
        issues,
    }
}

/// Adds two monetary strings in `base` using the built-in USD/KHR rate.
///
/// Values without a currency code, or in a currency that cannot be converted
/// to `base`, contribute nothing.
pub fn get_grand_total(value1: &str, value2: &str, base: &str) -> String {
    render_grand_total(value1, value2, base, &ExchangeRates::default()).text
}

pub fn get_grand_total_usd(value1: &str, value2: &str) -> String {
    get_grand_total(value1, value2, DEFAULT_BASE_CURRENCY)
}
