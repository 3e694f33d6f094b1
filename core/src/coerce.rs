//! Loose scalar coercion for feed fields.
//!
//! The feeds are inconsistent about how numbers are written (`"612"`,
//! `"8.0467"`, `""`, or a missing node), so projection never fails on a
//! field: it reads the longest numeric prefix and falls back to zero.

/// Coerce text to an integer.
///
/// Reads the longest numeric prefix after leading whitespace. A prefix with
/// a fraction or exponent is truncated toward zero, so `"12.9"` is `12` and
/// `"1e3"` is `1000`. Text without a numeric prefix is `0`.
pub fn to_int(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (int_end, float_end) = numeric_prefix(trimmed);
    if float_end == 0 {
        return 0;
    }
    if float_end == int_end {
        if let Ok(value) = trimmed[..int_end].parse::<i64>() {
            return value;
        }
    }
    // `as` saturates on overflow.
    to_float(trimmed) as i64
}

/// Coerce text to a float.
///
/// Reads the longest decimal prefix (sign, digits, fraction, exponent)
/// after leading whitespace. Text without a numeric prefix is `0.0`.
pub fn to_float(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let (_, end) = numeric_prefix(trimmed);
    if end == 0 {
        return 0.0;
    }
    trimmed[..end].parse::<f64>().unwrap_or(0.0)
}

/// Returns the byte length of the integer prefix and of the full decimal
/// prefix of `s`. Both are zero when `s` does not start with a number.
fn numeric_prefix(s: &str) -> (usize, usize) {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i = 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;
    let int_end = if int_digits > 0 { i } else { 0 };

    let mut frac_digits = 0;
    if i < bytes.len() && bytes[i] == b'.' {
        let mut j = i + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        frac_digits = j - i - 1;
        if int_digits > 0 || frac_digits > 0 {
            i = j;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return (0, 0);
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    (int_end, i)
}
