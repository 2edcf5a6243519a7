//! Tokenizer for loosely formatted monetary strings such as `"1,234.5 USD"`.
//!
//! Grammar (surrounding whitespace is ignored):
//!
//! ```text
//! input    := amount ( ws* code )?
//! amount   := one or more of [0-9 , . + -]
//! code     := [A-Za-z]+
//! number   := sign? int-part ( '.' digit+ )? | sign? '.' digit+
//! int-part := digit+ ( ',' digit+ )*
//! ```
//!
//! The amount lexeme is cut first and validated against `number` afterwards,
//! so a malformed amount still reports the code that followed it.

use super::MonetaryValue;
use crate::errors::CurrencyError;

struct Tokens<'a> {
    amount: &'a str,
    code: &'a str,
}

/// Parses `<amount> [<code>]`. The code keeps the casing it was written in.
pub fn parse_monetary(raw: &str) -> Result<MonetaryValue, CurrencyError> {
    let tokens = tokenize(raw)?;
    let amount = parse_number(tokens.amount).ok_or_else(|| CurrencyError::InvalidNumber {
        lexeme: tokens.amount.to_string(),
        currency: tokens.code.to_string(),
    })?;
    Ok(MonetaryValue {
        amount,
        currency: tokens.code.to_string(),
    })
}

/// Like [`parse_monetary`] but rejects amounts without a currency code.
pub fn parse_with_currency(raw: &str) -> Result<MonetaryValue, CurrencyError> {
    let value = parse_monetary(raw)?;
    if value.currency.is_empty() {
        return Err(CurrencyError::MissingCurrency);
    }
    Ok(value)
}

fn is_amount_char(ch: char) -> bool {
    ch.is_ascii_digit() || matches!(ch, ',' | '.' | '+' | '-')
}

fn tokenize(raw: &str) -> Result<Tokens<'_>, CurrencyError> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(CurrencyError::Empty);
    }
    let amount_end = input
        .find(|ch: char| !is_amount_char(ch))
        .unwrap_or(input.len());
    if amount_end == 0 {
        return Err(CurrencyError::NoAmount);
    }
    let (amount, rest) = input.split_at(amount_end);
    let rest = rest.trim_start();
    let code_end = rest
        .find(|ch: char| !ch.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    let (code, tail) = rest.split_at(code_end);
    if !tail.is_empty() {
        return Err(CurrencyError::TrailingInput {
            rest: tail.to_string(),
        });
    }
    Ok(Tokens { amount, code })
}

fn parse_number(lexeme: &str) -> Option<f64> {
    let negative = lexeme.starts_with('-');
    let unsigned = lexeme
        .strip_prefix(|ch: char| ch == '+' || ch == '-')
        .unwrap_or(lexeme);

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let mut cleaned = String::with_capacity(unsigned.len());
    if !int_part.is_empty() {
        for group in int_part.split(',') {
            if !is_digits(group) {
                return None;
            }
            cleaned.push_str(group);
        }
    }
    match frac_part {
        Some(frac) if is_digits(frac) => {
            cleaned.push('.');
            cleaned.push_str(frac);
        }
        Some(_) => return None,
        None if int_part.is_empty() => return None,
        None => {}
    }
    if cleaned.starts_with('.') {
        cleaned.insert(0, '0');
    }

    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_amount_and_code() {
        let value = parse_monetary("1,234.5 USD").unwrap();
        assert_eq!(value.amount, 1234.5);
        assert_eq!(value.currency, "USD");

        let glued = parse_monetary("  -12khr ").unwrap();
        assert_eq!(glued.amount, -12.0);
        assert_eq!(glued.currency, "khr");
    }

    #[test]
    fn code_is_optional() {
        let value = parse_monetary("1,000").unwrap();
        assert_eq!(value.amount, 1000.0);
        assert!(value.currency.is_empty());
        assert_eq!(parse_monetary("+.5").unwrap().amount, 0.5);
    }

    #[test]
    fn malformed_amount_keeps_code() {
        let err = parse_monetary("1.2.3 USD").unwrap_err();
        assert_eq!(
            err,
            CurrencyError::InvalidNumber {
                lexeme: "1.2.3".into(),
                currency: "USD".into(),
            }
        );
        assert!(matches!(
            parse_monetary("-").unwrap_err(),
            CurrencyError::InvalidNumber { .. }
        ));
        assert!(matches!(
            parse_monetary("1,,0").unwrap_err(),
            CurrencyError::InvalidNumber { .. }
        ));
        assert!(matches!(
            parse_monetary("5.").unwrap_err(),
            CurrencyError::InvalidNumber { .. }
        ));
    }

    #[test]
    fn rejects_leading_and_trailing_text() {
        assert_eq!(parse_monetary("").unwrap_err(), CurrencyError::Empty);
        assert_eq!(parse_monetary("abc").unwrap_err(), CurrencyError::NoAmount);
        assert_eq!(parse_monetary("$10").unwrap_err(), CurrencyError::NoAmount);
        assert_eq!(
            parse_monetary("10 USD total").unwrap_err(),
            CurrencyError::TrailingInput {
                rest: " total".into()
            }
        );
        assert!(matches!(
            parse_monetary("10 US1").unwrap_err(),
            CurrencyError::TrailingInput { .. }
        ));
    }

    #[test]
    fn overflowing_amount_is_invalid() {
        let huge = format!("{} USD", "9".repeat(400));
        assert!(matches!(
            parse_monetary(&huge).unwrap_err(),
            CurrencyError::InvalidNumber { .. }
        ));
    }

    #[test]
    fn strict_variant_requires_code() {
        assert_eq!(
            parse_with_currency("10").unwrap_err(),
            CurrencyError::MissingCurrency
        );
        assert_eq!(parse_with_currency("10 eur").unwrap().currency, "eur");
    }
}
