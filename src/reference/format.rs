use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::canonical_zero;
use crate::reference::{NumberLocale, NumberStyle, ReferenceLines};

const MAX_DECIMAL_PLACES: u32 = 28;

/// Fixed-precision number formatter for reference line labels.
///
/// Rounds half to even and never emits a negative zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelFormatter {
    decimal_places: u32,
    style: NumberStyle,
    locale: NumberLocale,
}

impl LabelFormatter {
    #[must_use]
    pub fn new(decimal_places: u32, style: NumberStyle, locale: NumberLocale) -> Self {
        Self {
            decimal_places: decimal_places.min(MAX_DECIMAL_PLACES),
            style,
            locale,
        }
    }

    #[must_use]
    pub fn for_lines(lines: &ReferenceLines) -> Self {
        Self::new(lines.decimal_places, lines.number_style, lines.locale)
    }

    #[must_use]
    pub fn format(self, value: f64) -> String {
        let value = canonical_zero(value);
        let Some(mut decimal) = Decimal::from_f64_retain(value) else {
            return self.format_fallback(value);
        };
        decimal = decimal
            .round_dp_with_strategy(self.decimal_places, RoundingStrategy::MidpointNearestEven);
        if decimal.is_zero() {
            decimal.set_sign_positive(true);
        }
        decimal.rescale(self.decimal_places);
        self.localize(&decimal.to_string())
    }

    // Values outside the decimal range (or non-finite) skip exact rounding.
    fn format_fallback(self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        let precision = self.decimal_places as usize;
        self.localize(&format!("{value:.precision$}"))
    }

    fn localize(self, text: &str) -> String {
        let (group_separator, decimal_separator) = match self.locale {
            NumberLocale::EnUs => (',', '.'),
            NumberLocale::EsEs => ('.', ','),
        };
        let (sign, unsigned) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text),
        };
        let (integer, fraction) = match unsigned.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (unsigned, None),
        };

        let mut out = String::with_capacity(text.len() + integer.len() / 3);
        out.push_str(sign);
        match self.style {
            NumberStyle::Plain => out.push_str(integer),
            NumberStyle::Grouped => {
                for (position, digit) in integer.chars().enumerate() {
                    if position > 0 && (integer.len() - position) % 3 == 0 {
                        out.push(group_separator);
                    }
                    out.push(digit);
                }
            }
        }
        if let Some(fraction) = fraction {
            out.push(decimal_separator);
            out.push_str(fraction);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::LabelFormatter;
    use crate::reference::{NumberLocale, NumberStyle};

    #[test]
    fn rounds_half_to_even_with_fixed_places() {
        let formatter = LabelFormatter::new(0, NumberStyle::Plain, NumberLocale::EnUs);
        assert_eq!(formatter.format(2.5), "2");
        assert_eq!(formatter.format(3.5), "4");
        assert_eq!(formatter.format(100.0), "100");

        let formatter = LabelFormatter::new(2, NumberStyle::Plain, NumberLocale::EnUs);
        assert_eq!(formatter.format(7.0), "7.00");
        assert_eq!(formatter.format(0.125), "0.12");
    }

    #[test]
    fn never_prints_negative_zero() {
        let formatter = LabelFormatter::new(0, NumberStyle::Plain, NumberLocale::EnUs);
        assert_eq!(formatter.format(-0.0), "0");
        assert_eq!(formatter.format(-0.4), "0");
        assert_eq!(formatter.format(-1.0), "-1");
    }

    #[test]
    fn groups_digits_per_locale() {
        let en = LabelFormatter::new(1, NumberStyle::Grouped, NumberLocale::EnUs);
        assert_eq!(en.format(1234.5), "1,234.5");
        assert_eq!(en.format(-1234567.0), "-1,234,567.0");
        assert_eq!(en.format(999.0), "999.0");

        let es = LabelFormatter::new(1, NumberStyle::Grouped, NumberLocale::EsEs);
        assert_eq!(es.format(1234.5), "1.234,5");
        let plain = LabelFormatter::new(1, NumberStyle::Plain, NumberLocale::EsEs);
        assert_eq!(plain.format(1234.5), "1234,5");
    }
}
