//! Numeral-plus-unit conversion into the base unit.
//!
//! A length is written as a numeral (sign, digits, decimal point) directly
//! followed by an optional lowercase unit: `10`, `2.5cm`, `-1m`.

use crate::errors::UnitError;
use crate::log::trace;
use crate::types::{Length, Unit};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Stage {
    Numeral,
    Unit,
}

fn is_numeral_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '.')
}

/// Split a length literal into its numeral and unit suffix.
///
/// Only checks which characters may appear where; the numeral itself is
/// validated by `to_base_unit`.
pub fn split_length(input: &str) -> Result<(&str, &str), UnitError> {
    let mut stage = Stage::Numeral;
    let mut unit_start = input.len();

    for (i, c) in input.char_indices() {
        match stage {
            Stage::Numeral => {
                if is_numeral_char(c) {
                    continue;
                }
                if c.is_ascii_lowercase() {
                    stage = Stage::Unit;
                    unit_start = i;
                } else {
                    return Err(UnitError::InvalidNumeralChar {
                        input: input.to_string(),
                        found: c,
                    });
                }
            }
            Stage::Unit => {
                if !c.is_ascii_lowercase() {
                    return Err(UnitError::InvalidUnitChar {
                        input: input.to_string(),
                        found: c,
                    });
                }
            }
        }
    }

    Ok(input.split_at(unit_start))
}

/// Convert a length literal to whole millimetres, truncating toward zero.
pub fn to_base_unit(input: &str) -> Result<Length, UnitError> {
    let (numeral, suffix) = split_length(input)?;
    if numeral.is_empty() {
        return Err(UnitError::MissingNumeral {
            input: input.to_string(),
        });
    }

    let value: f64 = numeral.parse().map_err(|_| UnitError::MalformedNumeral {
        numeral: numeral.to_string(),
    })?;
    let unit = Unit::from_suffix(suffix).ok_or_else(|| UnitError::UnknownUnit {
        unit: suffix.to_string(),
    })?;

    let scaled = (value * unit.scale()).trunc();
    // i64::MAX is not exactly representable; the cast would saturate silently.
    // i64::MIN is excluded so every length can be negated.
    if !scaled.is_finite() || scaled >= i64::MAX as f64 || scaled <= i64::MIN as f64 {
        return Err(UnitError::OutOfRange {
            input: input.to_string(),
        });
    }

    let length = Length(scaled as i64);
    trace!(input, numeral, unit = unit.suffix(), mm = length.raw(), "converted length");
    Ok(length)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mm(input: &str) -> i64 {
        to_base_unit(input).unwrap().raw()
    }

    #[test]
    fn converts_supported_units() {
        assert_eq!(mm("10mm"), 10);
        assert_eq!(mm("1cm"), 10);
        assert_eq!(mm("1m"), 1000);
        assert_eq!(mm("42"), 42);
    }

    #[test]
    fn fractional_values_truncate_toward_zero() {
        assert_eq!(mm("2.5cm"), 25);
        assert_eq!(mm("1.25cm"), 12);
        assert_eq!(mm("0.9"), 0);
        assert_eq!(mm("-0.9"), 0);
        assert_eq!(mm("-1.29cm"), -12);
        assert_eq!(mm("0.0015m"), 1);
    }

    #[test]
    fn signs_are_accepted() {
        assert_eq!(mm("-5cm"), -50);
        assert_eq!(mm("+3m"), 3000);
        assert_eq!(mm(".5m"), 500);
    }

    #[test]
    fn unknown_unit_is_rejected() {
        assert_eq!(
            to_base_unit("10xyz"),
            Err(UnitError::UnknownUnit {
                unit: "xyz".to_string()
            })
        );
        assert!(matches!(
            to_base_unit("3in"),
            Err(UnitError::UnknownUnit { .. })
        ));
    }

    #[test]
    fn digit_after_unit_is_rejected() {
        assert_eq!(
            to_base_unit("10cm5"),
            Err(UnitError::InvalidUnitChar {
                input: "10cm5".to_string(),
                found: '5'
            })
        );
    }

    #[test]
    fn uppercase_and_symbols_are_rejected() {
        assert!(matches!(
            to_base_unit("10CM"),
            Err(UnitError::InvalidNumeralChar { found: 'C', .. })
        ));
        assert!(matches!(
            to_base_unit("1_000"),
            Err(UnitError::InvalidNumeralChar { found: '_', .. })
        ));
    }

    #[test]
    fn letter_before_digits_is_rejected() {
        assert!(matches!(
            to_base_unit("mm"),
            Err(UnitError::MissingNumeral { .. })
        ));
        assert!(matches!(to_base_unit(""), Err(UnitError::MissingNumeral { .. })));
    }

    #[test]
    fn malformed_numerals_are_rejected() {
        for input in ["1.2.3", "--1", "1-2cm", "."] {
            assert!(
                matches!(to_base_unit(input), Err(UnitError::MalformedNumeral { .. })),
                "{input} should be malformed"
            );
        }
    }

    #[test]
    fn huge_values_are_out_of_range() {
        assert!(matches!(
            to_base_unit("99999999999999999999m"),
            Err(UnitError::OutOfRange { .. })
        ));
    }

    #[test]
    fn most_negative_i64_is_out_of_range() {
        assert_eq!(
            to_base_unit("-9223372036854775808"),
            Err(UnitError::OutOfRange {
                input: "-9223372036854775808".to_string()
            })
        );
        assert_eq!(mm("-9000000000000000m"), -9_000_000_000_000_000_000);
    }

    #[test]
    fn split_keeps_suffix() {
        assert_eq!(split_length("2.5cm").unwrap(), ("2.5", "cm"));
        assert_eq!(split_length("7").unwrap(), ("7", ""));
    }
}
