//! Input mask for money fields.
//!
//! Users type digits only; every keystroke is re-rendered so the field always
//! shows a two-decimal amount (`1` → `0,01`, `12` → `0,12`, `1234` → `12,34`).
//! Masking works on text, so there is no length limit; converting to
//! [`Amount`] is where the `i64` bound applies.

use crate::{Amount, Currency, EngineError};

/// Renders the digits of `raw` as an amount in minor units.
///
/// Every non-digit character is dropped. Leading zeros collapse. The locale's
/// decimal separator is used and digits are never grouped. Input without any
/// digit renders as an empty string so "no value" stays distinguishable from
/// zero.
///
/// ```rust
/// use engine::mask::mask_digit_stream;
///
/// assert_eq!(mask_digit_stream("5"), "0,05");
/// assert_eq!(mask_digit_stream("100000"), "1000,00");
/// assert_eq!(mask_digit_stream("R$ 1.234,5"), "123,45");
/// assert_eq!(mask_digit_stream(""), "");
/// ```
#[must_use]
pub fn mask_digit_stream(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return String::new();
    }

    let currency = Currency::default();
    let fraction = usize::from(currency.minor_units());
    let significant = digits.trim_start_matches('0');
    let padded = format!("{significant:0>width$}", width = fraction + 1);
    let (units, cents) = padded.split_at(padded.len() - fraction);

    format!("{units}{}{cents}", currency.decimal_separator())
}

/// Converges partial or pasted input to the canonical form.
///
/// Masking is idempotent, so this is the same transform applied once more to
/// text that may have been edited outside the mask (paste, autofill).
#[must_use]
pub fn normalize(text: &str) -> String {
    mask_digit_stream(text)
}

/// Parses canonical text back into an [`Amount`].
///
/// Text that bypassed the mask is checked strictly: any symbol that is not a
/// digit, a sign or a single decimal separator is an error.
pub fn to_number(text: &str) -> Result<Amount, EngineError> {
    text.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_keystroke_streams() {
        assert_eq!(mask_digit_stream(""), "");
        assert_eq!(mask_digit_stream("abc"), "");
        assert_eq!(mask_digit_stream("0"), "0,00");
        assert_eq!(mask_digit_stream("5"), "0,05");
        assert_eq!(mask_digit_stream("50"), "0,50");
        assert_eq!(mask_digit_stream("0005"), "0,05");
        assert_eq!(mask_digit_stream("1234"), "12,34");
        assert_eq!(mask_digit_stream("100000"), "1000,00");
    }

    #[test]
    fn masking_is_idempotent() {
        for raw in ["", "7", "0,07", "12,345", "1.000,00", "abc9x9", "000000", "98765432109876543210"] {
            let once = mask_digit_stream(raw);
            assert_eq!(mask_digit_stream(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn masking_has_no_length_limit() {
        let masked = mask_digit_stream("98765432109876543210");
        assert_eq!(masked, "987654321098765432,10");
        assert!(to_number(&masked).is_err());
    }

    #[test]
    fn normalize_keeps_empty_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("12,3"), "1,23");
        assert_eq!(normalize("0,05"), "0,05");
    }

    #[test]
    fn to_number_reads_canonical_text() {
        assert_eq!(to_number("0,05").unwrap(), Amount::new(5));
        assert_eq!(to_number("1000,00").unwrap(), Amount::new(100_000));
        assert_eq!(to_number(&mask_digit_stream("4599")).unwrap(), Amount::new(4599));
    }

    #[test]
    fn to_number_rejects_unmasked_symbols() {
        assert!(matches!(
            to_number("R$ 10,00"),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(to_number("10,00 reais").is_err());
        assert!(to_number("").is_err());
    }
}
