//! Scalar text codec.
//!
//! Conversions between the text found in SO documents and numbers. Parsing
//! follows `atof`/`atoi`: the longest numeric prefix is used and malformed
//! input yields zero instead of an error.
//!
//! Missing values use a reserved NaN payload (the R `NA_real_` pattern), so a
//! column can distinguish "not available" from "not a number".

/// Bit pattern reserved for "not available"
pub const NA_BITS: u64 = 0x7FF0_0000_0000_07A2;

/// The "not available" sentinel
#[inline]
pub fn na() -> f64 {
    f64::from_bits(NA_BITS)
}

/// True only for the exact NA bit pattern
#[inline]
pub fn is_na(x: f64) -> bool {
    x.to_bits() == NA_BITS
}

/// True for NaN values other than the NA sentinel
#[inline]
pub fn is_nan_not_na(x: f64) -> bool {
    x.is_nan() && !is_na(x)
}

/// Format a double the way C's `%f` does: six decimals, `nan`/`inf` otherwise.
pub fn double_to_string(x: f64) -> String {
    if x.is_nan() {
        if x.is_sign_negative() {
            "-nan".to_string()
        } else {
            "nan".to_string()
        }
    } else if x.is_infinite() {
        if x > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        }
    } else {
        format!("{:.6}", x)
    }
}

/// Parse the longest numeric prefix of `s`, like C's `atof`. Returns 0.0 when
/// no prefix is numeric.
pub fn string_to_double(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }

    let rest = &bytes[end..];
    for word in ["infinity", "inf", "nan"] {
        if rest.len() >= word.len() && rest[..word.len()].eq_ignore_ascii_case(word.as_bytes()) {
            return s[..end + word.len()].parse().unwrap_or(0.0);
        }
    }

    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - digits_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return 0.0;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(0.0)
}

/// Format an integer in base 10
pub fn int_to_string(x: i64) -> String {
    x.to_string()
}

/// Parse the longest integer prefix of `s`, like C's `atoi`. Saturates on
/// overflow and returns 0 when no digits are present.
pub fn string_to_int(s: &str) -> i64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut idx = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            idx += 1;
            true
        }
        Some(b'+') => {
            idx += 1;
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        let digit = (bytes[idx] - b'0') as i64;
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
        idx += 1;
    }
    value
}

/// Parse a boolean cell of an external file (`True`, `true`, `1`)
pub fn string_to_bool(s: &str) -> bool {
    let s = s.trim();
    s.eq_ignore_ascii_case("true") || s == "1"
}

/// Text used for booleans in external files
pub fn bool_to_string(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_to_string_matches_printf() {
        assert_eq!(double_to_string(60.3), "60.300000");
        assert_eq!(double_to_string(1.0), "1.000000");
        assert_eq!(double_to_string(-0.5), "-0.500000");
        assert_eq!(double_to_string(1e20), "100000000000000000000.000000");
        assert_eq!(double_to_string(1e-7), "0.000000");
        assert_eq!(double_to_string(f64::INFINITY), "inf");
        assert_eq!(double_to_string(f64::NEG_INFINITY), "-inf");
        assert_eq!(double_to_string(f64::NAN), "nan");
    }

    #[test]
    fn test_string_to_double_is_permissive() {
        assert_eq!(string_to_double("72.3"), 72.3);
        assert_eq!(string_to_double("  -1.5e2xyz"), -150.0);
        assert_eq!(string_to_double("3."), 3.0);
        assert_eq!(string_to_double(".25"), 0.25);
        assert_eq!(string_to_double("1e"), 1.0);
        assert_eq!(string_to_double("abc"), 0.0);
        assert_eq!(string_to_double(""), 0.0);
        assert_eq!(string_to_double("-"), 0.0);
        assert_eq!(string_to_double("ééé"), 0.0);
        assert_eq!(string_to_double("."), 0.0);
        assert!(string_to_double("inf").is_infinite());
        assert_eq!(string_to_double("-Infinity"), f64::NEG_INFINITY);
        assert!(string_to_double("nan").is_nan());
    }

    #[test]
    fn test_string_to_int_is_permissive() {
        assert_eq!(string_to_int("42"), 42);
        assert_eq!(string_to_int(" -17abc"), -17);
        assert_eq!(string_to_int("+8"), 8);
        assert_eq!(string_to_int("x1"), 0);
        assert_eq!(string_to_int("3.9"), 3);
        assert_eq!(string_to_int("99999999999999999999999"), i64::MAX);
        assert_eq!(int_to_string(-12), "-12");
    }

    #[test]
    fn test_na_is_distinct_from_nan() {
        let missing = na();
        assert!(missing.is_nan());
        assert!(is_na(missing));
        assert!(!is_nan_not_na(missing));

        let nan = f64::NAN;
        assert!(!is_na(nan));
        assert!(is_nan_not_na(nan));

        assert!(!is_na(1954.0));
        assert!(!is_na(0.0));
    }

    #[test]
    fn test_booleans() {
        assert!(string_to_bool("True"));
        assert!(string_to_bool("true"));
        assert!(string_to_bool("1"));
        assert!(!string_to_bool("False"));
        assert!(!string_to_bool(""));
        assert_eq!(bool_to_string(true), "True");
        assert_eq!(bool_to_string(false), "False");
    }
}
