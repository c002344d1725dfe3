//! Numeric literal conversion and float text layout.
use crate::error::{Error, Result};

/// Exponent at which float output switches to scientific form, as with `%.16g`.
const FIXED_MAX_EXPONENT: i32 = 16;
const FIXED_MIN_EXPONENT: i32 = -4;

pub fn is_hex(token: &str) -> bool {
    token.starts_with("0x") || token.starts_with("0X")
}

/// A decimal token carrying a fraction or exponent.
pub fn is_float(token: &str) -> bool {
    !is_hex(token) && token.bytes().any(|b| matches!(b, b'.' | b'e' | b'E'))
}

/// Hex literals are read as `u64` and reinterpreted, so `0xFFFFFFFFFFFFFFFF`
/// is `-1`.
pub fn parse_integer(token: &str) -> Result<i64> {
    let malformed = || Error::MalformedNumber(token.to_owned());
    if is_hex(token) {
        return u64::from_str_radix(&token[2..], 16)
            .map(|bits| bits as i64)
            .map_err(|_| malformed());
    }
    token.parse::<i64>().map_err(|_| malformed())
}

pub fn parse_float(token: &str) -> Result<f64> {
    if is_hex(token) {
        return parse_integer(token).map(|value| value as f64);
    }
    token
        .parse::<f64>()
        .map_err(|_| Error::MalformedNumber(token.to_owned()))
}

/// Writes the shortest digits that read back to the same double, laid out
/// like C's `%.16g`: `1500`, `0.1`, `1e+20`, `1.5e-07`. Non-finite values
/// have no JSON form and are written as `null`.
pub fn write_float(out: &mut String, value: f64) {
    if !value.is_finite() {
        out.push_str("null");
        return;
    }
    if value == 0.0 {
        out.push_str(if value.is_sign_negative() { "-0" } else { "0" });
        return;
    }

    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let (negative, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if negative {
        out.push('-');
    }
    if !(FIXED_MIN_EXPONENT..FIXED_MAX_EXPONENT).contains(&exponent) {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push('e');
        out.push(if exponent < 0 { '-' } else { '+' });
        out.push_str(&format!("{:02}", exponent.unsigned_abs()));
    } else if exponent >= 0 {
        let whole = exponent as usize + 1;
        if digits.len() <= whole {
            out.push_str(&digits);
            out.extend(std::iter::repeat_n('0', whole - digits.len()));
        } else {
            out.push_str(&digits[..whole]);
            out.push('.');
            out.push_str(&digits[whole..]);
        }
    } else {
        out.push_str("0.");
        out.extend(std::iter::repeat_n('0', (-exponent - 1) as usize));
        out.push_str(&digits);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn float_text(value: f64) -> String {
        let mut out = String::new();
        write_float(&mut out, value);
        out
    }

    #[rstest]
    #[case(1500.0, "1500")]
    #[case(0.1, "0.1")]
    #[case(-2.5, "-2.5")]
    #[case(1.0, "1")]
    #[case(0.0, "0")]
    #[case(1e20, "1e+20")]
    #[case(1.5e-7, "1.5e-07")]
    #[case(0.0001, "0.0001")]
    #[case(123456789.125, "123456789.125")]
    #[case(1e16, "1e+16")]
    #[case(1e15, "1000000000000000")]
    #[case(0.30000000000000004, "0.30000000000000004")]
    #[case(f64::NAN, "null")]
    #[case(f64::INFINITY, "null")]
    fn float_layout(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(float_text(value), expected);
    }

    #[rstest]
    #[case(1.0 / 3.0)]
    #[case(f64::MAX)]
    #[case(f64::MIN_POSITIVE)]
    #[case(-123.456e-200)]
    #[case(6.02214076e23)]
    fn float_text_reads_back(#[case] value: f64) {
        assert_eq!(parse_float(&float_text(value)), Ok(value));
    }

    #[test]
    fn integers() {
        assert_eq!(parse_integer("0x1F"), Ok(31));
        assert_eq!(parse_integer("0XfF"), Ok(255));
        assert_eq!(parse_integer("-42"), Ok(-42));
        assert_eq!(parse_integer("+7"), Ok(7));
        assert_eq!(parse_integer("0xFFFFFFFFFFFFFFFF"), Ok(-1));
        assert!(matches!(parse_integer("9223372036854775808"), Err(Error::MalformedNumber(_))));
        assert!(matches!(parse_integer("0x"), Err(Error::MalformedNumber(_))));
    }

    #[test]
    fn float_detection() {
        assert!(is_float("1.5"));
        assert!(is_float("1e3"));
        assert!(!is_float("15"));
        assert!(!is_float("0xE"));
    }
}
