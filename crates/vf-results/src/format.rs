//! printf-style number formatting for the monitor log columns.
//!
//! The log is read by existing post-processing scripts, so numbers keep the
//! `%g` and `%.Ne` shapes: a signed exponent of at least two digits and no
//! trailing zeros for `%g`.

/// `%.{precision}e`, e.g. `c_exp(1.5e-5, 5) == "1.50000e-05"`.
pub fn c_exp(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }
    let raw = format!("{value:.precision$e}");
    let (mantissa, exponent) = split_exponent(&raw);
    format!("{mantissa}{}", c_exponent(exponent))
}

/// `%g` with the default six significant digits.
pub fn c_general(value: f64) -> String {
    const PRECISION: i32 = 6;

    if !value.is_finite() {
        return non_finite(value);
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Decimal exponent after rounding to the requested significant digits.
    let raw = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exponent) = split_exponent(&raw);

    if exponent < -4 || exponent >= PRECISION {
        format!("{}{}", strip_zeros(mantissa), c_exponent(exponent))
    } else {
        let decimals = (PRECISION - 1 - exponent) as usize;
        strip_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn non_finite(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value > 0.0 {
        "inf".to_string()
    } else {
        "-inf".to_string()
    }
}

fn split_exponent(raw: &str) -> (&str, i32) {
    match raw.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or(0)),
        None => (raw, 0),
    }
}

fn c_exponent(exponent: i32) -> String {
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("e{sign}{:02}", exponent.abs())
}

fn strip_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exp_matches_printf() {
        assert_eq!(c_exp(1.5e-5, 5), "1.50000e-05");
        assert_eq!(c_exp(0.0, 5), "0.00000e+00");
        assert_eq!(c_exp(-2.25, 5), "-2.25000e+00");
        assert_eq!(c_exp(1e30, 1), "1.0e+30");
        assert_eq!(c_exp(1e-100, 2), "1.00e-100");
        assert_eq!(c_exp(9.999996, 5), "1.00000e+01");
    }

    #[test]
    fn general_matches_printf() {
        assert_eq!(c_general(0.0), "0");
        assert_eq!(c_general(1.0), "1");
        assert_eq!(c_general(0.01), "0.01");
        assert_eq!(c_general(1e-4), "0.0001");
        assert_eq!(c_general(1e-5), "1e-05");
        assert_eq!(c_general(2.5e-5), "2.5e-05");
        assert_eq!(c_general(123456.0), "123456");
        assert_eq!(c_general(1234567.0), "1.23457e+06");
        assert_eq!(c_general(1e30), "1e+30");
        assert_eq!(c_general(0.123456789), "0.123457");
        assert_eq!(c_general(-3.5), "-3.5");
        assert_eq!(c_general(999999.5), "1e+06");
        assert_eq!(c_general(200.0), "200");
    }

    #[test]
    fn non_finite_values() {
        assert_eq!(c_general(f64::INFINITY), "inf");
        assert_eq!(c_general(f64::NEG_INFINITY), "-inf");
        assert_eq!(c_general(f64::NAN), "nan");
        assert_eq!(c_exp(f64::NAN, 5), "nan");
    }
}
