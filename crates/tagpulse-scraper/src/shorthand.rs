//! Normalization of human-shorthand post counts ("1.2M", "850K", "1,234").
//!
//! Parsing is decimal-aware: the mantissa is interpreted as a decimal number
//! and multiplied by the suffix power of ten, then rounded to the nearest
//! integer. A literal digit-splice substitution (drop the dot, expand the
//! suffix to zeros) would turn "1.2M" into 12,000,000; this module yields
//! 1,200,000, which is what the rendered shorthand means.

/// Parses a shorthand count token into an integer.
///
/// Accepted shapes, after stripping `,` thousands separators:
/// `digits`, `digits.digits`, either followed by an optional `K`/`M`/`B`
/// suffix (case-insensitive). Anything else returns `None`.
#[must_use]
pub fn parse_shorthand_count(token: &str) -> Option<u64> {
    let cleaned = token.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }

    let (mantissa_str, multiplier) = match cleaned.as_bytes()[cleaned.len() - 1] {
        b'k' | b'K' => (&cleaned[..cleaned.len() - 1], 1_000_u64),
        b'm' | b'M' => (&cleaned[..cleaned.len() - 1], 1_000_000),
        b'b' | b'B' => (&cleaned[..cleaned.len() - 1], 1_000_000_000),
        _ => (cleaned.as_str(), 1),
    };

    if mantissa_str.is_empty() || !is_decimal_number(mantissa_str) {
        return None;
    }

    // The mantissa of a rendered shorthand is tiny (a few digits plus at
    // most a few decimals), so f64 holds it exactly enough for rounding.
    let mantissa: f64 = mantissa_str.parse().ok()?;
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = (mantissa * multiplier as f64).round() as u64;
    Some(count)
}

/// `digits` or `digits.digits`; nothing else.
fn is_decimal_number(s: &str) -> bool {
    let mut parts = s.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next();

    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    all_digits(int_part) && frac_part.is_none_or(all_digits)
}
