//! Default row ordering: integers first by value, then everything else as
//! case-insensitive text

use std::cmp::Ordering;

/// Compare two cell strings the way list views sort by default
///
/// Complete integer literals (decimal, `0x` hex or leading-`0` octal,
/// optional sign and leading whitespace) sort before everything else and
/// compare numerically among themselves; two zero-valued literals compare
/// as text. Everything else compares as ASCII case-insensitive bytes. An
/// empty string counts as the integer 0.
///
/// The order is total, so a column mixing numbers and text stays safe to
/// hand to `sort_by`.
pub fn compare_cells(a: &str, b: &str) -> Ordering {
    match (parse_int_literal(a), parse_int_literal(b)) {
        (Some(x), Some(y)) if x != 0 || y != 0 => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => compare_ignore_ascii_case(a, b),
    }
}

/// Byte-wise comparison after ASCII lowercasing
pub fn compare_ignore_ascii_case(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

/// Parse a whole string as an integer literal with automatic base
///
/// Returns `None` unless the entire string is consumed. Values beyond the
/// `i64` range saturate.
pub fn parse_int_literal(s: &str) -> Option<i64> {
    let s = s.trim_start();
    if s.is_empty() {
        return Some(0);
    }
    let (negative, rest) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, digits) = if let Some(hex) = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
    {
        (16, hex)
    } else if rest.len() > 1 && rest.starts_with('0') {
        (8, &rest[1..])
    } else {
        (10, rest)
    };
    if digits.is_empty() {
        return None;
    }

    let mut value: i64 = 0;
    for c in digits.chars() {
        let d = c.to_digit(radix)? as i64;
        value = value.saturating_mul(radix as i64).saturating_add(d);
    }
    Some(if negative { -value } else { value })
}
